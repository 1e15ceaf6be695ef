//! Dataset assembly from a declarative pattern table.
//!
//! Each `PatternSpec` names a generator, its target share of the dataset and how
//! many transactions one run produces. Run counts are truncated, so the realized
//! total can fall short of the requested one for small targets.

use log::{debug, info, warn};
use rand::seq::SliceRandom;

use crate::behavioral::BehavioralGenerator;
use crate::constants::simulation_start;
use crate::defi::DefiGenerator;
use crate::transaction::{BehavioralTransaction, DefiTransaction, Timestamped};

/// Hooks the assembler needs from a generator between pattern runs.
pub trait DatasetGenerator {
    type Record: Timestamped;

    /// Called once before any pattern runs.
    fn begin(&mut self) {}

    /// Idle time inserted before a run; generators without a clock ignore it.
    fn pause(&mut self, _min_secs: i64, _max_secs: i64) {}

    /// Mix records before the final stable sort.
    fn mix(&mut self, _records: &mut [Self::Record]) {}
}

pub struct PatternSpec<G: DatasetGenerator> {
    pub name: &'static str,
    /// Fraction of the requested total, in [0, 1].
    pub share: f64,
    pub txs_per_run: usize,
    /// Uniform idle gap in seconds before each run.
    pub lead_in: Option<(i64, i64)>,
    pub generate: fn(&mut G) -> Vec<G::Record>,
}

impl<G: DatasetGenerator> PatternSpec<G> {
    /// Number of runs for `total`: floor(total * share / txs_per_run).
    pub fn runs_for(&self, total: usize) -> usize {
        if self.txs_per_run == 0 {
            return 0;
        }
        (total as f64 * self.share / self.txs_per_run as f64) as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPattern {
    pub name: &'static str,
    pub runs: usize,
    pub expected_txs: usize,
}

pub fn plan<G: DatasetGenerator>(table: &[PatternSpec<G>], total: usize) -> Vec<PlannedPattern> {
    table
        .iter()
        .map(|spec| {
            let runs = spec.runs_for(total);
            PlannedPattern {
                name: spec.name,
                runs,
                expected_txs: runs * spec.txs_per_run,
            }
        })
        .collect()
}

/// Run every pattern in `table` for `total` requested transactions and return
/// the records sorted by timestamp (stable).
pub fn assemble<G: DatasetGenerator>(
    generator: &mut G,
    table: &[PatternSpec<G>],
    total: usize,
) -> Vec<G::Record> {
    let planned = plan(table, total);

    info!("Generating {} transactions...", total);
    for entry in &planned {
        info!("  - {}: {} runs ({} txs)", entry.name, entry.runs, entry.expected_txs);
    }

    generator.begin();

    let mut records: Vec<G::Record> = Vec::with_capacity(planned.iter().map(|p| p.expected_txs).sum());
    for (spec, entry) in table.iter().zip(&planned) {
        if entry.runs == 0 {
            if spec.share > 0.0 {
                warn!("{} gets no runs at total {} (share {:.0}%)", spec.name, total, spec.share * 100.0);
            }
            continue;
        }

        info!("Generating {}...", spec.name);
        for _ in 0..entry.runs {
            if let Some((min, max)) = spec.lead_in {
                generator.pause(min, max);
            }
            records.extend((spec.generate)(generator));
        }
        debug!("{} done, {} records so far", spec.name, records.len());
    }

    generator.mix(&mut records);
    records.sort_by_key(|r| r.timestamp());

    info!("Generated {} transactions", records.len());
    records
}

impl DatasetGenerator for DefiGenerator {
    type Record = DefiTransaction;

    fn mix(&mut self, records: &mut [DefiTransaction]) {
        records.shuffle(self.rng());
    }
}

impl DatasetGenerator for BehavioralGenerator {
    type Record = BehavioralTransaction;

    fn begin(&mut self) {
        self.clock_mut().reset(simulation_start());
    }

    fn pause(&mut self, min_secs: i64, max_secs: i64) {
        BehavioralGenerator::pause(self, min_secs, max_secs);
    }
}

fn one<T>(record: T) -> Vec<T> {
    vec![record]
}

/// Pattern mix of the attack-tagged defi dataset.
pub fn defi_table() -> Vec<PatternSpec<DefiGenerator>> {
    vec![
        PatternSpec { name: "normal swaps", share: 0.60, txs_per_run: 1, lead_in: None, generate: |g| one(g.normal_swap()) },
        PatternSpec { name: "flash loan attacks", share: 0.10, txs_per_run: 1, lead_in: None, generate: |g| one(g.flash_loan_attack()) },
        PatternSpec { name: "price manipulations", share: 0.08, txs_per_run: 1, lead_in: None, generate: |g| one(g.price_manipulation()) },
        PatternSpec { name: "sandwich attacks", share: 0.05, txs_per_run: 3, lead_in: None, generate: |g| g.sandwich_sequence() },
        PatternSpec { name: "liquidity operations", share: 0.15, txs_per_run: 1, lead_in: None, generate: |g| one(g.liquidity_operation()) },
        PatternSpec { name: "lending operations", share: 0.02, txs_per_run: 1, lead_in: None, generate: |g| one(g.lending_operation()) },
    ]
}

/// Pattern mix of the behavioral dataset.
pub fn behavioral_table() -> Vec<PatternSpec<BehavioralGenerator>> {
    vec![
        PatternSpec { name: "normal trading", share: 0.50, txs_per_run: 1, lead_in: None, generate: |g| g.normal_trading_batch(1) },
        PatternSpec { name: "self wash trading", share: 0.12, txs_per_run: 30, lead_in: Some((300, 900)), generate: |g| g.self_wash_trading(15) },
        PatternSpec { name: "coordinated wash trading", share: 0.10, txs_per_run: 60, lead_in: Some((300, 900)), generate: |g| g.coordinated_wash_trading(3, 10) },
        PatternSpec { name: "peel chain laundering", share: 0.08, txs_per_run: 6, lead_in: Some((600, 1800)), generate: |g| g.peel_chain(6, None) },
        PatternSpec { name: "layering activity", share: 0.05, txs_per_run: 8, lead_in: Some((300, 900)), generate: |g| g.layering_activity(8) },
        PatternSpec { name: "sandwich attacks", share: 0.08, txs_per_run: 3, lead_in: Some((60, 300)), generate: |g| g.sandwich_attack() },
        PatternSpec { name: "coordinated pump", share: 0.05, txs_per_run: 20, lead_in: Some((600, 1800)), generate: |g| g.coordinated_pump(5, 4) },
        PatternSpec { name: "Benford violations", share: 0.02, txs_per_run: 50, lead_in: Some((300, 900)), generate: |g| g.benford_violation_trades(50) },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defi_plan_matches_truncation() {
        let planned = plan(&defi_table(), 1500);
        let runs: Vec<usize> = planned.iter().map(|p| p.runs).collect();
        assert_eq!(runs, vec![900, 150, 120, 25, 225, 30]);
        let total: usize = planned.iter().map(|p| p.expected_txs).sum();
        assert_eq!(total, 900 + 150 + 120 + 75 + 225 + 30);
    }

    #[test]
    fn test_behavioral_plan_matches_truncation() {
        let planned = plan(&behavioral_table(), 2000);
        let runs: Vec<usize> = planned.iter().map(|p| p.runs).collect();
        assert_eq!(runs, vec![1000, 8, 3, 26, 12, 53, 5, 0]);
    }

    #[test]
    fn test_shares_sum_to_one() {
        let defi: f64 = defi_table().iter().map(|s| s.share).sum();
        let behavioral: f64 = behavioral_table().iter().map(|s| s.share).sum();
        assert!((defi - 1.0).abs() < 1e-9);
        assert!((behavioral - 1.0).abs() < 1e-9);
    }
}
