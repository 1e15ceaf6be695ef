//! Summary statistics printed after a generation run.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::error::Result;
use crate::transaction::{AttackType, BehavioralTransaction, DefiTransaction};

const SAMPLE_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct DefiStats {
    pub total: usize,
    pub by_attack: Vec<(AttackType, usize)>,
    pub normal: usize,
}

pub fn defi_stats(txs: &[DefiTransaction]) -> DefiStats {
    let by_attack = AttackType::ALL
        .iter()
        .map(|&kind| (kind, txs.iter().filter(|tx| tx.attack_type == Some(kind)).count()))
        .collect();

    DefiStats {
        total: txs.len(),
        by_attack,
        normal: txs.iter().filter(|tx| tx.attack_type.is_none()).count(),
    }
}

/// Pretty JSON of the first attack transaction, cut to a short preview.
pub fn sample_attack(txs: &[DefiTransaction]) -> Result<Option<String>> {
    let sample = match txs.iter().find(|tx| tx.attack_type.is_some()) {
        Some(tx) => tx,
        None => return Ok(None),
    };
    let text = serde_json::to_string_pretty(sample)?;
    let preview: String = text.chars().take(SAMPLE_PREVIEW_CHARS).collect();
    Ok(Some(format!("{}...", preview)))
}

pub fn display_defi_stats(stats: &DefiStats, sample: Option<&str>) {
    println!("\n{}", "Dataset Statistics:".bold());
    println!("  Total transactions: {}", stats.total);
    for (kind, count) in &stats.by_attack {
        println!("  {:<20}: {}", kind.label(), count);
    }
    println!("  Normal transactions: {}", stats.normal);

    if let Some(sample) = sample {
        println!("\n{}", "Sample attack transaction:".bold());
        println!("{}", sample);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BehavioralStats {
    pub total: usize,
    pub unique_senders: usize,
    pub unique_pools: usize,
    /// (function name, count), most frequent first.
    pub directions: Vec<(String, usize)>,
    pub amount_min: u64,
    pub amount_max: u64,
    pub amount_avg: f64,
    pub top_senders: Vec<(String, usize)>,
    pub pool_activity: Vec<(String, usize)>,
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

/// Counts sorted by frequency, ties broken by key for stable output.
fn ranked(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub fn behavioral_stats(txs: &[BehavioralTransaction]) -> BehavioralStats {
    let mut senders: HashMap<String, usize> = HashMap::new();
    let mut pools: HashMap<String, usize> = HashMap::new();
    let mut directions: HashMap<String, usize> = HashMap::new();
    let mut amounts: Vec<u64> = Vec::with_capacity(txs.len());

    for tx in txs {
        *senders.entry(tx.sender.clone()).or_insert(0) += 1;
        if let Some(function) = tx.functions.first() {
            *directions.entry(function.clone()).or_insert(0) += 1;
        }
        if let Some(swap) = tx.primary_swap() {
            *pools.entry(swap.pool_id.clone()).or_insert(0) += 1;
            amounts.push(swap.amount_in);
        }
    }

    let amount_avg = if amounts.is_empty() {
        0.0
    } else {
        amounts.iter().map(|&a| a as f64).sum::<f64>() / amounts.len() as f64
    };

    let first = txs.iter().map(|tx| tx.timestamp_ms).min();
    let last = txs.iter().map(|tx| tx.timestamp_ms).max();

    let unique_senders = senders.len();
    let unique_pools = pools.len();
    let mut top_senders = ranked(senders);
    top_senders.truncate(5);

    BehavioralStats {
        total: txs.len(),
        unique_senders,
        unique_pools,
        directions: ranked(directions),
        amount_min: amounts.iter().copied().min().unwrap_or(0),
        amount_max: amounts.iter().copied().max().unwrap_or(0),
        amount_avg,
        top_senders,
        pool_activity: ranked(pools),
        time_range: first.zip(last),
    }
}

fn truncated(s: &str, n: usize) -> &str {
    s.get(..n).unwrap_or(s)
}

pub fn display_behavioral_stats(stats: &BehavioralStats) {
    println!("\n{}", "=== Dataset Statistics ===".bold());
    println!("Total transactions: {}", stats.total);
    println!("Unique senders: {}", stats.unique_senders);
    println!("Unique pools: {}", stats.unique_pools);

    println!("\n{}", "Direction distribution:".cyan());
    for (direction, count) in &stats.directions {
        let pct = if stats.total == 0 { 0.0 } else { *count as f64 / stats.total as f64 * 100.0 };
        println!("  {}: {} ({:.1}%)", direction, count, pct);
    }

    println!("\n{}", "Amount statistics:".cyan());
    println!("  Min: {}", stats.amount_min);
    println!("  Max: {}", stats.amount_max);
    println!("  Avg: {:.0}", stats.amount_avg);

    println!("\n{}", "Top 5 most active senders:".cyan());
    for (sender, count) in &stats.top_senders {
        println!("  {}...: {} txs", truncated(sender, 16), count);
    }

    println!("\n{}", "Pool activity:".cyan());
    for (pool, count) in &stats.pool_activity {
        println!("  {}...: {} txs", truncated(pool, 30), count);
    }

    if let Some((first, last)) = stats.time_range {
        println!("\nTime range: {} to {}", first.to_rfc3339(), last.to_rfc3339());
    }
}
