use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use defi_fixtures::amm;
use defi_fixtures::assembler::{assemble, behavioral_table, defi_table};
use defi_fixtures::behavioral::BehavioralGenerator;
use defi_fixtures::clock::SimClock;
use defi_fixtures::constants::simulation_start;
use defi_fixtures::defi::DefiGenerator;
use defi_fixtures::events::Direction;
use defi_fixtures::transaction::{AttackType, Timestamped};

fn behavioral(seed: u64) -> BehavioralGenerator {
    BehavioralGenerator::new(StdRng::seed_from_u64(seed), SimClock::new(simulation_start()))
}

fn defi(seed: u64) -> DefiGenerator {
    let anchor = Utc.with_ymd_and_hms(2025, 12, 7, 12, 0, 0).unwrap();
    DefiGenerator::new(StdRng::seed_from_u64(seed), anchor)
}

#[test]
fn peel_chain_amounts_strictly_decrease() {
    let mut generator = behavioral(11);
    let chain = generator.peel_chain(6, Some(100_000_000_000));
    assert_eq!(chain.len(), 6);

    let amounts: Vec<u64> = chain
        .iter()
        .map(|tx| tx.primary_swap().unwrap().amount_in)
        .collect();
    assert!(amounts[0] < 100_000_000_000);
    assert!(amounts.windows(2).all(|w| w[1] < w[0]), "{:?}", amounts);

    // Every hop comes from a different address
    let mut senders: Vec<&str> = chain.iter().map(|tx| tx.sender.as_str()).collect();
    senders.sort();
    senders.dedup();
    assert_eq!(senders.len(), 6);
}

#[test]
fn behavioral_sandwich_is_ordered_and_closed_by_attacker() {
    let mut generator = behavioral(12);
    let txs = generator.sandwich_attack();
    assert_eq!(txs.len(), 3);

    assert!(txs[0].timestamp_ms < txs[1].timestamp_ms);
    assert!(txs[1].timestamp_ms < txs[2].timestamp_ms);
    assert_eq!(txs[0].sender, txs[2].sender);
    assert_ne!(txs[0].sender, txs[1].sender);

    assert_eq!(txs[0].functions[0], Direction::SwapAToB.function_name());
    assert_eq!(txs[2].functions[0], Direction::SwapBToA.function_name());

    let pools: Vec<&str> = txs.iter().map(|tx| tx.primary_swap().unwrap().pool_id.as_str()).collect();
    assert!(pools.iter().all(|p| *p == pools[0]));
}

#[test]
fn defi_sandwich_back_run_sells_front_run_output() {
    let mut generator = defi(13);
    let txs = generator.sandwich_sequence();
    assert_eq!(txs.len(), 3);

    let front = txs[0].swaps().next().unwrap();
    let back = txs[2].swaps().next().unwrap();
    assert_eq!(back.amount_in, front.amount_out);
    assert!(front.token_in);
    assert!(!back.token_in);

    assert!(txs.iter().all(|tx| tx.checkpoint == txs[0].checkpoint));
    assert_eq!(txs[1].timestamp_ms - txs[0].timestamp_ms, 5_000);
    assert_eq!(txs[2].timestamp_ms - txs[1].timestamp_ms, 3_000);

    let tags: Vec<Option<AttackType>> = txs.iter().map(|tx| tx.attack_type).collect();
    assert_eq!(tags, vec![None, None, Some(AttackType::Sandwich)]);
}

#[test]
fn flash_loan_is_bracketed_by_loan_events() {
    let mut generator = defi(14);
    let tx = generator.flash_loan_attack();
    assert_eq!(tx.attack_type, Some(AttackType::FlashLoan));

    let kinds: Vec<&str> = tx.events.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds.first(), Some(&"FlashLoanTaken"));
    assert_eq!(kinds.last(), Some(&"FlashLoanRepaid"));
    let swaps = tx.swaps().count();
    assert!((3..=6).contains(&swaps));
    assert_eq!(kinds.len(), swaps + 2);
}

#[test]
fn assembled_defi_dataset_is_sorted() {
    let mut generator = defi(15);
    let txs = assemble(&mut generator, &defi_table(), 300);
    // 180 + 30 + 24 + 5 runs of 3 + 45 + 6
    assert_eq!(txs.len(), 300);
    assert!(txs.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
    assert!(txs.iter().all(|tx| !tx.events.is_empty()));
}

#[test]
fn assembled_behavioral_dataset_is_sorted() {
    let mut generator = behavioral(16);
    let txs = assemble(&mut generator, &behavioral_table(), 400);
    assert!(!txs.is_empty());
    assert!(txs.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));
    assert!(txs[0].timestamp_ms >= simulation_start());
    // The clock only moves forward, so it ends past every emitted record
    assert!(generator.clock().now() >= txs[txs.len() - 1].timestamp_ms);
}

#[test]
fn same_seed_gives_same_dataset() {
    let a = assemble(&mut behavioral(99), &behavioral_table(), 250);
    let b = assemble(&mut behavioral(99), &behavioral_table(), 250);
    assert_eq!(a, b);

    let c = assemble(&mut defi(99), &defi_table(), 250);
    let d = assemble(&mut defi(99), &defi_table(), 250);
    assert_eq!(c, d);
}

#[test]
fn amm_reference_quote() {
    let out = amm::amount_out_default(1_000_000, 10_000_000_000, 10_000_000_000);
    assert_eq!(out, 996_900);
    assert!(out < 1_000_000);
}
