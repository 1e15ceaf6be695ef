//! Behavioral dataset: wash trading, peel chains, layering, sandwiches, pumps,
//! Benford violations and a heavy-tailed baseline, all on one simulated clock.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::clock::SimClock;
use crate::constants::BEHAVIORAL_POOLS;
use crate::events::Direction;
use crate::ids;
use crate::transaction::BehavioralTransaction;

pub const NORMAL_AMOUNT_MIN: u64 = 100_000_000;
pub const NORMAL_AMOUNT_MAX: u64 = 100_000_000_000;
const PARETO_ALPHA: f64 = 1.5;
const PARETO_SCALE: f64 = 500_000_000.0;
const MEAN_INTERARRIVAL_SECS: f64 = 30.0;
const MIN_INTERARRIVAL_SECS: f64 = 5.0;

/// Round sizes fake traders gravitate to.
pub const ROUND_AMOUNTS: [u64; 6] = [
    1_000_000_000,
    2_000_000_000,
    5_000_000_000,
    10_000_000_000,
    20_000_000_000,
    50_000_000_000,
];

/// Pareto(alpha) draw with scale 1, by inverse CDF.
pub fn pareto<R: Rng + ?Sized>(rng: &mut R, alpha: f64) -> f64 {
    let u: f64 = rng.gen();
    1.0 / (1.0 - u).powf(1.0 / alpha)
}

/// Exponential draw with the given mean, by inverse CDF.
pub fn exponential<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> f64 {
    let u: f64 = rng.gen();
    -(1.0 - u).ln() * mean
}

/// `base` moved by up to `base / divisor` in either direction.
fn jitter<R: Rng + ?Sized>(rng: &mut R, base: u64, divisor: u64) -> u64 {
    let spread = (base / divisor) as i64;
    (base as i64 + rng.gen_range(-spread..=spread)).max(0) as u64
}

fn scaled(amount: u64, factor: f64) -> u64 {
    (amount as f64 * factor) as u64
}

/// Generator state for one behavioral run.
pub struct BehavioralGenerator {
    rng: StdRng,
    clock: SimClock,
}

impl BehavioralGenerator {
    pub fn new(rng: StdRng, clock: SimClock) -> Self {
        BehavioralGenerator { rng, clock }
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    /// Advance the clock by a uniform gap in `min..=max` seconds.
    pub fn pause(&mut self, min: i64, max: i64) {
        self.clock.advance_between(&mut self.rng, min, max);
    }

    fn trade(
        &mut self,
        sender: &str,
        pool_id: &str,
        amount_in: u64,
        direction: Direction,
        price_impact: Option<u64>,
    ) -> BehavioralTransaction {
        let now = self.clock.now();
        BehavioralTransaction::swap(&mut self.rng, now, sender, pool_id, amount_in, direction, price_impact)
    }

    fn pool_from(&mut self, pools: &[String]) -> String {
        pools
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| BEHAVIORAL_POOLS[0].clone())
    }

    fn liquid_pool(&mut self) -> String {
        self.pool_from(&BEHAVIORAL_POOLS[..3])
    }

    fn any_pool(&mut self) -> String {
        self.pool_from(&BEHAVIORAL_POOLS)
    }

    /// One address alternating buy and sell on a single pool.
    pub fn self_wash_trading(&mut self, num_cycles: usize) -> Vec<BehavioralTransaction> {
        let sender = ids::seeded_id("self_wash_trader");
        let pool = self.liquid_pool();
        let base_amount = self.rng.gen_range(2_000_000_000..=5_000_000_000);

        let mut txs = Vec::with_capacity(num_cycles * 2);
        for _ in 0..num_cycles {
            for direction in [Direction::SwapAToB, Direction::SwapBToA] {
                let amount = jitter(&mut self.rng, base_amount, 20);
                txs.push(self.trade(&sender, &pool, amount, direction, None));
                self.pause(10, 45);
            }
        }
        txs
    }

    /// Address pairs closing buy/sell cycles between themselves.
    pub fn coordinated_wash_trading(&mut self, num_pairs: usize, txs_per_pair: usize) -> Vec<BehavioralTransaction> {
        let pool = self.liquid_pool();
        let mut txs = Vec::with_capacity(num_pairs * txs_per_pair * 2);

        for pair_idx in 0..num_pairs {
            let buyer = ids::seeded_id(&format!("coord_wash_a_{}", pair_idx));
            let seller = ids::seeded_id(&format!("coord_wash_b_{}", pair_idx));
            let base_amount = self.rng.gen_range(3_000_000_000..=8_000_000_000);

            for _ in 0..txs_per_pair {
                let amount = jitter(&mut self.rng, base_amount, 15);
                txs.push(self.trade(&buyer, &pool, amount, Direction::SwapAToB, None));
                self.pause(15, 40);

                let amount = jitter(&mut self.rng, base_amount, 15);
                txs.push(self.trade(&seller, &pool, amount, Direction::SwapBToA, None));
                self.pause(15, 40);
            }

            self.pause(60, 180);
        }
        txs
    }

    /// A large balance forwarded hop by hop, each hop peeling off 5-25% and
    /// losing a 0.5-2% fee on the way.
    ///
    /// Hop amounts strictly decrease only while they stay positive. Floor
    /// rounding drives small balances to zero within a few hops, so
    /// `initial_amount` should be many orders of magnitude above the chain
    /// length; the default draws 80B-150B.
    pub fn peel_chain(&mut self, chain_length: usize, initial_amount: Option<u64>) -> Vec<BehavioralTransaction> {
        let mut amount = match initial_amount {
            Some(amount) => amount,
            None => self.rng.gen_range(80_000_000_000..=150_000_000_000),
        };

        let mut txs = Vec::with_capacity(chain_length);
        for hop in 0..chain_length {
            let tag: u32 = self.rng.gen_range(1000..=9999);
            let sender = ids::seeded_id(&format!("peel_{}_{}", hop, tag));
            let pool = self.any_pool();

            let peel_ratio = self.rng.gen_range(0.05..0.25);
            let peeled = scaled(amount, peel_ratio);
            let remaining = amount - peeled;

            txs.push(self.trade(&sender, &pool, remaining, Direction::SwapAToB, None));
            let fee_factor = self.rng.gen_range(0.98..0.995);
            amount = scaled(remaining, fee_factor);

            self.pause(120, 480);
        }
        txs
    }

    /// One address rotating through every pool with alternating direction.
    pub fn layering_activity(&mut self, num_swaps: usize) -> Vec<BehavioralTransaction> {
        let sender = ids::seeded_id("layering_actor");
        let mut amount = self.rng.gen_range(20_000_000_000..=50_000_000_000);

        let mut txs = Vec::with_capacity(num_swaps);
        for i in 0..num_swaps {
            let pool = BEHAVIORAL_POOLS[i % BEHAVIORAL_POOLS.len()].clone();
            txs.push(self.trade(&sender, &pool, amount, Direction::alternate(i), None));
            let slippage = self.rng.gen_range(0.985..0.995);
            amount = scaled(amount, slippage);
            self.pause(30, 120);
        }
        txs
    }

    /// Front-run, victim, back-run within a few seconds on a liquid pool.
    pub fn sandwich_attack(&mut self) -> Vec<BehavioralTransaction> {
        let attacker = ids::seeded_id("sandwich_attacker");
        let victim = ids::seeded_id("sandwich_victim");
        let pool = self.liquid_pool();

        let front_amount = self.rng.gen_range(5_000_000_000..=15_000_000_000);
        let front = self.trade(&attacker, &pool, front_amount, Direction::SwapAToB, Some(scaled(front_amount, 0.005)));
        self.pause(2, 5);

        // The victim trades bigger and eats more slippage
        let victim_amount = self.rng.gen_range(10_000_000_000..=30_000_000_000);
        let victim_tx = self.trade(&victim, &pool, victim_amount, Direction::SwapAToB, Some(scaled(victim_amount, 0.008)));
        self.pause(2, 5);

        let back_amount = scaled(front_amount, 1.02);
        let back = self.trade(&attacker, &pool, back_amount, Direction::SwapBToA, Some(scaled(back_amount, 0.004)));
        self.pause(30, 60);

        vec![front, victim_tx, back]
    }

    /// A fixed crew buying a thin pool in rapid, reshuffled rounds.
    pub fn coordinated_pump(&mut self, num_addresses: usize, txs_per_address: usize) -> Vec<BehavioralTransaction> {
        let thin_pools = &BEHAVIORAL_POOLS[BEHAVIORAL_POOLS.len().saturating_sub(2)..];
        let pool = self.pool_from(thin_pools);

        let mut addresses: Vec<String> = (0..num_addresses)
            .map(|i| ids::seeded_id(&format!("pump_{}", i)))
            .collect();
        let base_amount = self.rng.gen_range(5_000_000_000..=12_000_000_000);

        let mut txs = Vec::with_capacity(num_addresses * txs_per_address);
        for _ in 0..txs_per_address {
            addresses.shuffle(&mut self.rng);
            for sender in addresses.clone() {
                let amount = jitter(&mut self.rng, base_amount, 10);
                txs.push(self.trade(&sender, &pool, amount, Direction::SwapAToB, Some(scaled(amount, 0.01))));
                self.pause(5, 20);
            }
            self.pause(30, 90);
        }
        txs
    }

    /// Trades clustered within 1% of round numbers.
    pub fn benford_violation_trades(&mut self, count: usize) -> Vec<BehavioralTransaction> {
        let sender = ids::seeded_id("benford_violator");
        let pool = self.any_pool();

        let mut txs = Vec::with_capacity(count);
        for _ in 0..count {
            let base = ROUND_AMOUNTS.choose(&mut self.rng).copied().unwrap_or(ROUND_AMOUNTS[0]);
            let amount = jitter(&mut self.rng, base, 100);
            let direction = Direction::random(&mut self.rng);
            txs.push(self.trade(&sender, &pool, amount, direction, None));
            self.pause(20, 60);
        }
        txs
    }

    /// Single organic trade with a heavy-tailed size from a fresh address.
    pub fn normal_trade(&mut self) -> BehavioralTransaction {
        let sender = ids::address(&mut self.rng, None);
        let pool = self.any_pool();

        let raw = pareto(&mut self.rng, PARETO_ALPHA) * PARETO_SCALE;
        let amount = (raw as u64).clamp(NORMAL_AMOUNT_MIN, NORMAL_AMOUNT_MAX);
        let direction = Direction::random(&mut self.rng);

        self.trade(&sender, &pool, amount, direction, None)
    }

    /// `count` organic trades with exponential gaps (mean 30s, 5s floor).
    pub fn normal_trading_batch(&mut self, count: usize) -> Vec<BehavioralTransaction> {
        let mut txs = Vec::with_capacity(count);
        for _ in 0..count {
            txs.push(self.normal_trade());
            let gap = exponential(&mut self.rng, MEAN_INTERARRIVAL_SECS) + MIN_INTERARRIVAL_SECS;
            self.clock.advance(gap as i64);
        }
        txs
    }
}
