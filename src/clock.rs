//! Time sources for generated transactions.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::constants::MAX_LOOKBACK_MINUTES;

/// Simulated clock owned by the caller and advanced explicitly between events.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: DateTime<Utc>,
}

impl SimClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        SimClock { now: start }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Move the clock forward by `seconds`; negative values are ignored.
    pub fn advance(&mut self, seconds: i64) {
        if seconds > 0 {
            self.now += Duration::seconds(seconds);
        }
    }

    /// Advance by a uniform draw from `min..=max` seconds.
    pub fn advance_between<R: Rng + ?Sized>(&mut self, rng: &mut R, min: i64, max: i64) {
        let seconds = rng.gen_range(min..=max);
        self.advance(seconds);
    }

    pub fn reset(&mut self, start: DateTime<Utc>) {
        self.now = start;
    }
}

/// A point up to `MAX_LOOKBACK_MINUTES` before `anchor`, whole minutes.
pub fn recent_timestamp<R: Rng + ?Sized>(rng: &mut R, anchor: DateTime<Utc>) -> DateTime<Utc> {
    anchor - Duration::minutes(rng.gen_range(0..=MAX_LOOKBACK_MINUTES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::simulation_start;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_advance_is_monotonic() {
        let mut clock = SimClock::new(simulation_start());
        let start = clock.now();
        clock.advance(30);
        assert_eq!((clock.now() - start).num_seconds(), 30);
        clock.advance(-10);
        assert_eq!((clock.now() - start).num_seconds(), 30);
    }

    #[test]
    fn test_advance_between_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut clock = SimClock::new(simulation_start());
        for _ in 0..100 {
            let before = clock.now();
            clock.advance_between(&mut rng, 10, 45);
            let step = (clock.now() - before).num_seconds();
            assert!((10..=45).contains(&step));
        }
        clock.reset(simulation_start());
        assert_eq!(clock.now(), simulation_start());
    }

    #[test]
    fn test_recent_timestamp_window() {
        let mut rng = StdRng::seed_from_u64(5);
        let anchor = simulation_start();
        for _ in 0..200 {
            let ts = recent_timestamp(&mut rng, anchor);
            assert!(ts <= anchor);
            assert!(anchor - ts <= Duration::minutes(MAX_LOOKBACK_MINUTES));
        }
    }
}
