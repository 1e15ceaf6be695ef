//! On-chain event records and their builders.
//!
//! `DefiEvent` is the flat, `type`-tagged schema used by the defi dataset.
//! `MoveEvent` is the Move-style envelope (`<package>::simple_dex::SwapExecuted`)
//! used by the behavioral dataset.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::amm;
use crate::constants::{
    COLLATERAL_RATIO_PCT, DEX_MODULE, FLASH_LOAN_FEE_BPS, SUPPLY_EXCHANGE_RATE, SWAP_FEE_BPS,
};
use crate::ids;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DefiEvent {
    SwapExecuted(SwapExecuted),
    FlashLoanTaken(FlashLoan),
    FlashLoanRepaid(FlashLoan),
    #[serde(rename = "TWAPUpdated")]
    TwapUpdated(TwapUpdated),
    PriceDeviationDetected(PriceDeviationDetected),
    LiquidityAdded(LiquidityAdded),
    LiquidityRemoved(LiquidityRemoved),
    SupplyEvent(SupplyEvent),
    BorrowEvent(BorrowEvent),
    RepayEvent(RepayEvent),
}

impl DefiEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DefiEvent::SwapExecuted(_) => "SwapExecuted",
            DefiEvent::FlashLoanTaken(_) => "FlashLoanTaken",
            DefiEvent::FlashLoanRepaid(_) => "FlashLoanRepaid",
            DefiEvent::TwapUpdated(_) => "TWAPUpdated",
            DefiEvent::PriceDeviationDetected(_) => "PriceDeviationDetected",
            DefiEvent::LiquidityAdded(_) => "LiquidityAdded",
            DefiEvent::LiquidityRemoved(_) => "LiquidityRemoved",
            DefiEvent::SupplyEvent(_) => "SupplyEvent",
            DefiEvent::BorrowEvent(_) => "BorrowEvent",
            DefiEvent::RepayEvent(_) => "RepayEvent",
        }
    }

    pub fn as_swap(&self) -> Option<&SwapExecuted> {
        match self {
            DefiEvent::SwapExecuted(swap) => Some(swap),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwapExecuted {
    pub pool_id: String,
    pub sender: String,
    pub token_in: bool,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub price_impact: u64,
    pub timestamp: DateTime<Utc>,
}

impl SwapExecuted {
    /// Quote a swap against the pool's current reserves.
    ///
    /// `token_in` selects the direction: true sells token A into the pool, so
    /// `reserve_a` is the input side.
    pub fn new(
        pool_id: &str,
        sender: &str,
        amount_in: u64,
        reserve_a: u64,
        reserve_b: u64,
        token_in: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (reserve_in, reserve_out) = if token_in {
            (reserve_a, reserve_b)
        } else {
            (reserve_b, reserve_a)
        };

        SwapExecuted {
            pool_id: pool_id.to_string(),
            sender: sender.to_string(),
            token_in,
            amount_in,
            amount_out: amm::amount_out(amount_in, reserve_in, reserve_out, SWAP_FEE_BPS),
            fee_amount: amm::fee(amount_in, SWAP_FEE_BPS),
            reserve_a,
            reserve_b,
            price_impact: amm::price_impact(amount_in, reserve_in, reserve_out),
            timestamp,
        }
    }

    /// Pool reserves (a, b) once this swap has settled.
    pub fn reserves_after(&self) -> (u64, u64) {
        if self.token_in {
            (
                self.reserve_a.saturating_add(self.amount_in),
                self.reserve_b.saturating_sub(self.amount_out),
            )
        } else {
            (
                self.reserve_a.saturating_sub(self.amount_out),
                self.reserve_b.saturating_add(self.amount_in),
            )
        }
    }
}

impl From<SwapExecuted> for DefiEvent {
    fn from(swap: SwapExecuted) -> Self {
        DefiEvent::SwapExecuted(swap)
    }
}

/// Body shared by `FlashLoanTaken` and `FlashLoanRepaid`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlashLoan {
    pub pool_id: String,
    pub borrower: String,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: DateTime<Utc>,
}

impl FlashLoan {
    fn new(pool_id: &str, borrower: &str, amount: u64, timestamp: DateTime<Utc>) -> Self {
        FlashLoan {
            pool_id: pool_id.to_string(),
            borrower: borrower.to_string(),
            amount,
            fee: amm::fee(amount, FLASH_LOAN_FEE_BPS),
            timestamp,
        }
    }
}

pub fn flash_loan_taken(pool_id: &str, borrower: &str, amount: u64, timestamp: DateTime<Utc>) -> DefiEvent {
    DefiEvent::FlashLoanTaken(FlashLoan::new(pool_id, borrower, amount, timestamp))
}

pub fn flash_loan_repaid(pool_id: &str, borrower: &str, amount: u64, timestamp: DateTime<Utc>) -> DefiEvent {
    DefiEvent::FlashLoanRepaid(FlashLoan::new(pool_id, borrower, amount, timestamp))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TwapUpdated {
    pub pool_id: String,
    pub twap_price_a: u64,
    pub spot_price_a: u64,
    pub price_deviation: u64,
    pub timestamp: DateTime<Utc>,
}

pub fn twap_updated(pool_id: &str, twap_price: u64, spot_price: u64, timestamp: DateTime<Utc>) -> DefiEvent {
    DefiEvent::TwapUpdated(TwapUpdated {
        pool_id: pool_id.to_string(),
        twap_price_a: twap_price,
        spot_price_a: spot_price,
        price_deviation: amm::deviation_bps(twap_price, spot_price),
        timestamp,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceDeviationDetected {
    pub pool_id: String,
    pub twap_price: u64,
    pub spot_price: u64,
    pub deviation_bps: u64,
    pub timestamp: DateTime<Utc>,
}

pub fn price_deviation_detected(
    pool_id: &str,
    twap_price: u64,
    spot_price: u64,
    timestamp: DateTime<Utc>,
) -> DefiEvent {
    DefiEvent::PriceDeviationDetected(PriceDeviationDetected {
        pool_id: pool_id.to_string(),
        twap_price,
        spot_price,
        deviation_bps: amm::deviation_bps(twap_price, spot_price),
        timestamp,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiquidityAdded {
    pub pool_id: String,
    pub provider: String,
    pub amount_a: u64,
    pub amount_b: u64,
    pub liquidity_minted: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRemoved {
    pub pool_id: String,
    pub provider: String,
    pub amount_a: u64,
    pub amount_b: u64,
    pub liquidity_burned: u64,
    pub timestamp: DateTime<Utc>,
}

/// LP tokens for a paired deposit: the geometric mean of both legs.
pub fn liquidity_for(amount_a: u64, amount_b: u64) -> u64 {
    ((amount_a as f64) * (amount_b as f64)).sqrt() as u64
}

pub fn liquidity_added(
    pool_id: &str,
    provider: &str,
    amount_a: u64,
    amount_b: u64,
    timestamp: DateTime<Utc>,
) -> DefiEvent {
    DefiEvent::LiquidityAdded(LiquidityAdded {
        pool_id: pool_id.to_string(),
        provider: provider.to_string(),
        amount_a,
        amount_b,
        liquidity_minted: liquidity_for(amount_a, amount_b),
        timestamp,
    })
}

pub fn liquidity_removed(
    pool_id: &str,
    provider: &str,
    amount_a: u64,
    amount_b: u64,
    timestamp: DateTime<Utc>,
) -> DefiEvent {
    DefiEvent::LiquidityRemoved(LiquidityRemoved {
        pool_id: pool_id.to_string(),
        provider: provider.to_string(),
        amount_a,
        amount_b,
        liquidity_burned: liquidity_for(amount_a, amount_b),
        timestamp,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupplyEvent {
    pub market_id: String,
    pub supplier: String,
    pub amount: u64,
    pub c_tokens_minted: u64,
    pub exchange_rate: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorrowEvent {
    pub market_id: String,
    pub borrower: String,
    pub position_id: String,
    pub borrow_amount: u64,
    pub collateral_value: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepayEvent {
    pub market_id: String,
    pub borrower: String,
    pub position_id: String,
    pub repay_amount: u64,
    pub remaining_debt: u64,
    pub timestamp: DateTime<Utc>,
}

pub fn supply(market_id: &str, supplier: &str, amount: u64, timestamp: DateTime<Utc>) -> DefiEvent {
    DefiEvent::SupplyEvent(SupplyEvent {
        market_id: market_id.to_string(),
        supplier: supplier.to_string(),
        amount,
        c_tokens_minted: amount.saturating_mul(SUPPLY_EXCHANGE_RATE),
        exchange_rate: SUPPLY_EXCHANGE_RATE,
        timestamp,
    })
}

pub fn borrow<R: Rng + ?Sized>(
    rng: &mut R,
    market_id: &str,
    borrower: &str,
    amount: u64,
    timestamp: DateTime<Utc>,
) -> DefiEvent {
    DefiEvent::BorrowEvent(BorrowEvent {
        market_id: market_id.to_string(),
        borrower: borrower.to_string(),
        position_id: ids::position_id(rng),
        borrow_amount: amount,
        collateral_value: (amount as u128 * COLLATERAL_RATIO_PCT as u128 / 100) as u64,
        timestamp,
    })
}

pub fn repay<R: Rng + ?Sized>(
    rng: &mut R,
    market_id: &str,
    borrower: &str,
    amount: u64,
    timestamp: DateTime<Utc>,
) -> DefiEvent {
    DefiEvent::RepayEvent(RepayEvent {
        market_id: market_id.to_string(),
        borrower: borrower.to_string(),
        position_id: ids::position_id(rng),
        repay_amount: amount,
        remaining_debt: rng.gen_range(0..=amount / 2),
        timestamp,
    })
}

/// Swap direction on a two-token pool, named after the entry function called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    SwapAToB,
    SwapBToA,
}

impl Direction {
    pub fn function_name(self) -> &'static str {
        match self {
            Direction::SwapAToB => "swap_a_to_b",
            Direction::SwapBToA => "swap_b_to_a",
        }
    }

    pub fn is_a_to_b(self) -> bool {
        self == Direction::SwapAToB
    }

    pub fn alternate(index: usize) -> Self {
        if index % 2 == 0 {
            Direction::SwapAToB
        } else {
            Direction::SwapBToA
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Direction::SwapAToB
        } else {
            Direction::SwapBToA
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwapData {
    pub pool_id: String,
    pub sender: String,
    pub amount_in: u64,
    pub amount_out: u64,
    pub token_in: bool,
    pub price_impact: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub package: String,
    pub module: String,
    pub sender: String,
    pub event_data: SwapData,
}

/// Simulated price impact: 0.3% of the amount, jittered by up to a tenth of itself.
pub fn simulated_impact<R: Rng + ?Sized>(rng: &mut R, amount_in: u64) -> u64 {
    let base = (amount_in as f64 * 0.003) as i64;
    let jitter = base / 10;
    (base + rng.gen_range(-jitter..=jitter)).max(0) as u64
}

/// Behavioral swap event; `amount_out` loses a 0.1%-0.5% slippage.
pub fn move_swap<R: Rng + ?Sized>(
    rng: &mut R,
    package: &str,
    pool_id: &str,
    sender: &str,
    amount_in: u64,
    direction: Direction,
    price_impact: Option<u64>,
) -> MoveEvent {
    let price_impact = price_impact.unwrap_or_else(|| simulated_impact(rng, amount_in));
    let slippage = rng.gen_range(0.001..0.005);
    let amount_out = (amount_in as f64 * (1.0 - slippage)) as u64;

    MoveEvent {
        event_type: format!("{}::{}::SwapExecuted", package, DEX_MODULE),
        package: package.to_string(),
        module: DEX_MODULE.to_string(),
        sender: sender.to_string(),
        event_data: SwapData {
            pool_id: pool_id.to_string(),
            sender: sender.to_string(),
            amount_in,
            amount_out,
            token_in: direction.is_a_to_b(),
            price_impact,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{simulation_start, DEX_POOL_USDC_USDT, PACKAGE_ID};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_swap_event_uses_amm_math() {
        let ts = simulation_start();
        let swap = SwapExecuted::new(DEX_POOL_USDC_USDT, "0xabc", 1_000_000, 10_000_000_000, 20_000_000_000, true, ts);
        assert_eq!(swap.amount_out, amm::amount_out(1_000_000, 10_000_000_000, 20_000_000_000, 30));
        assert_eq!(swap.fee_amount, 3_000);
        assert_eq!(swap.price_impact, amm::price_impact(1_000_000, 10_000_000_000, 20_000_000_000));

        let reverse = SwapExecuted::new(DEX_POOL_USDC_USDT, "0xabc", 1_000_000, 10_000_000_000, 20_000_000_000, false, ts);
        assert_eq!(reverse.amount_out, amm::amount_out(1_000_000, 20_000_000_000, 10_000_000_000, 30));
    }

    #[test]
    fn test_reserves_after() {
        let ts = simulation_start();
        let swap = SwapExecuted::new("p", "s", 5_000, 100_000, 100_000, true, ts);
        assert_eq!(swap.reserves_after(), (105_000, 100_000 - swap.amount_out));
        let back = SwapExecuted::new("p", "s", 5_000, 100_000, 100_000, false, ts);
        assert_eq!(back.reserves_after(), (100_000 - back.amount_out, 105_000));
    }

    #[test]
    fn test_event_tagging() {
        let ts = simulation_start();
        let event = flash_loan_taken("pool", "bot", 100_000_000_000, ts);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "FlashLoanTaken");
        assert_eq!(json["fee"], 90_000_000u64);
        assert_eq!(json["timestamp"], "2025-12-07T10:00:00Z");

        let twap = serde_json::to_value(twap_updated("pool", 1_000, 1_250, ts)).unwrap();
        assert_eq!(twap["type"], "TWAPUpdated");
        assert_eq!(twap["price_deviation"], 2_500);
    }

    #[test]
    fn test_liquidity_field_names() {
        let ts = simulation_start();
        let added = serde_json::to_value(liquidity_added("pool", "lp", 400, 900, ts)).unwrap();
        assert_eq!(added["liquidity_minted"], 600);
        let removed = serde_json::to_value(liquidity_removed("pool", "lp", 400, 900, ts)).unwrap();
        assert_eq!(removed["liquidity_burned"], 600);
        assert!(removed.get("liquidity_minted").is_none());
    }

    #[test]
    fn test_lending_ratios() {
        let mut rng = StdRng::seed_from_u64(9);
        let ts = simulation_start();
        match supply("m", "u", 2_000, ts) {
            DefiEvent::SupplyEvent(e) => {
                assert_eq!(e.c_tokens_minted, 100_000);
                assert_eq!(e.exchange_rate, 50);
            }
            other => panic!("unexpected {:?}", other),
        }
        match borrow(&mut rng, "m", "u", 2_000, ts) {
            DefiEvent::BorrowEvent(e) => {
                assert_eq!(e.collateral_value, 3_000);
                assert_eq!(e.position_id.len(), 42);
            }
            other => panic!("unexpected {:?}", other),
        }
        match repay(&mut rng, "m", "u", 2_000, ts) {
            DefiEvent::RepayEvent(e) => assert!(e.remaining_debt <= 1_000),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_move_swap_envelope() {
        let mut rng = StdRng::seed_from_u64(2);
        let event = move_swap(&mut rng, PACKAGE_ID, "pool", "sender", 1_000_000_000, Direction::SwapBToA, None);
        assert_eq!(event.event_type, format!("{}::simple_dex::SwapExecuted", PACKAGE_ID));
        assert!(!event.event_data.token_in);
        assert!(event.event_data.amount_out < 1_000_000_000);
        assert!(event.event_data.amount_out >= 995_000_000);
        assert!((2_700_000..=3_300_000).contains(&event.event_data.price_impact));

        let fixed = move_swap(&mut rng, PACKAGE_ID, "pool", "sender", 10, Direction::SwapAToB, Some(42));
        assert_eq!(fixed.event_data.price_impact, 42);
        assert!(fixed.event_data.token_in);
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(Direction::alternate(0), Direction::SwapAToB);
        assert_eq!(Direction::alternate(3), Direction::SwapBToA);
        assert_eq!(Direction::SwapBToA.function_name(), "swap_b_to_a");
    }
}
