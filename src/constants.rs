//! Fixed identifiers and tuning constants shared by both generators.
//!
//! The hex ids below are the objects of the reference deployment the fixtures
//! imitate; everything else is derived from them at first use.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;

use crate::ids::seeded_id;

pub const PACKAGE_ID: &str = "0x0a78ed73edcaca699f8ffead05a9626aadd6edb30d49523574c8016806b0530e";

// Pools
pub const FLASH_LOAN_POOL_USDC: &str = "0xd8c8d2282cc2b2990b4e39709684ef9cfd9fe18a56167d0e32134d90d1e6892b";
pub const DEX_POOL_USDC_USDT: &str = "0xcd7c37355a73ace339b03847c860a43797a06cd675f051831562e39e2d4ba14e";
pub const DEX_POOL_USDT_WETH: &str = "0x14a22a54906f8efb546c5f01bcf0220cebbf3b36fc6a124edcefe01977eaed84";
pub const DEX_POOL_WETH_USDC: &str = "0x9e8326e5cf8b5ccb07f9c8bd39f4a9f95bc7b51f8ea8d70fdea0eb3f4ad92314";

// Lending markets
pub const MARKET_USDC: &str = "0x889c24bf63b0d35f44518aea42dac181849f7945d61de20bc86bdbb81da19fd2";
pub const MARKET_WETH: &str = "0x7b9b4f5b6f49d891cf591b029cefee678c6f7b97813b93ce1cf4de607cc5f119";

/// The three DEX pools swaps are routed through.
pub const DEX_POOLS: [&str; 3] = [DEX_POOL_USDC_USDT, DEX_POOL_USDT_WETH, DEX_POOL_WETH_USDC];

/// Known MEV bot addresses used as attackers.
pub const MEV_BOTS: [&str; 5] = [
    "0x1a2b3c4d5e6f7890abcdef1234567890abcdef12",
    "0x9876543210fedcba0987654321fedcba09876543",
    "0xdeadbeefcafebabe1234567890abcdef12345678",
    "0x7777777777777777777777777777777777777777",
    "0x8888888888888888888888888888888888888888",
];

/// Pools used by the behavioral generator: the deployed ones plus three hashed fakes.
///
/// Order matters: the first three are the liquid pools, the last two the thin ones
/// targeted by pumps.
pub static BEHAVIORAL_POOLS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut pools: Vec<String> = vec![
        DEX_POOL_USDC_USDT.to_string(),
        FLASH_LOAN_POOL_USDC.to_string(),
        DEX_POOL_USDT_WETH.to_string(),
        DEX_POOL_WETH_USDC.to_string(),
    ];
    for seed in ["sui_usdc_pool_1", "sui_usdt_pool_1", "usdc_weth_pool_1"] {
        pools.push(seeded_id(seed));
    }
    pools
});

/// Number of randomly generated regular traders in the defi dataset.
pub const NORMAL_USER_COUNT: usize = 50;
/// Number of randomly generated liquidity providers in the defi dataset.
pub const LP_PROVIDER_COUNT: usize = 20;

// AMM parameters
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const SWAP_FEE_BPS: u64 = 30;
pub const FLASH_LOAN_FEE_BPS: u64 = 9;
pub const SUPPLY_EXCHANGE_RATE: u64 = 50;
pub const COLLATERAL_RATIO_PCT: u64 = 150;

pub const CHECKPOINT_MIN: u64 = 10_000_000;
pub const CHECKPOINT_MAX: u64 = 12_000_000;

pub const GAS_USED_MIN: u64 = 1_000_000;
pub const GAS_USED_MAX: u64 = 5_000_000;

pub const EXECUTION_SUCCESS: &str = "success";
pub const DEX_MODULE: &str = "simple_dex";

/// Wall-clock lookback for defi timestamps, in minutes.
pub const MAX_LOOKBACK_MINUTES: i64 = 10_000;

pub const DEFAULT_DEFI_COUNT: usize = 1500;
pub const DEFAULT_BEHAVIORAL_COUNT: usize = 2000;
pub const DEFAULT_INDEX_NAME: &str = "sui-transactions";

/// Start of the behavioral simulated clock.
pub fn simulation_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 7, 10, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}
