//! Constant product (x * y = k) swap math in integer base units.
//!
//! Intermediates are widened to u128; `amount_in * 10000 * reserve_out` overflows
//! u64 for flash-loan sized trades. Quotes whose numerator leaves u128 (18-decimal
//! amounts against 18-decimal reserves) are finished in U256.

use primitive_types::U256;

use crate::constants::{BPS_DENOMINATOR, SWAP_FEE_BPS};

/// Price impact of a trade in basis points, capped at 10000 (100%).
///
/// `_reserve_out` is unused; the impact depends on the input side only.
pub fn price_impact(amount_in: u64, reserve_in: u64, _reserve_out: u64) -> u64 {
    if reserve_in == 0 {
        return 0;
    }

    let amount_in = amount_in as u128;
    let impact = amount_in * BPS_DENOMINATOR as u128 / (reserve_in as u128 + amount_in);
    impact.min(BPS_DENOMINATOR as u128) as u64
}

/// Output amount of a swap after the `fee_rate_bps` fee.
pub fn amount_out(amount_in: u64, reserve_in: u64, reserve_out: u64, fee_rate_bps: u64) -> u64 {
    if reserve_in == 0 || reserve_out == 0 {
        return 0;
    }

    let fee_rate = fee_rate_bps.min(BPS_DENOMINATOR) as u128;
    let amount_in_with_fee = amount_in as u128 * (BPS_DENOMINATOR as u128 - fee_rate);
    let denominator = reserve_in as u128 * BPS_DENOMINATOR as u128 + amount_in_with_fee;

    if denominator == 0 {
        return 0;
    }

    // Strictly below reserve_out, so the narrowing cannot truncate
    match amount_in_with_fee.checked_mul(reserve_out as u128) {
        Some(numerator) => (numerator / denominator) as u64,
        None => {
            let numerator = U256::from(amount_in_with_fee) * U256::from(reserve_out);
            (numerator / U256::from(denominator)).low_u64()
        }
    }
}

/// `amount_out` at the standard 0.3% pool fee.
pub fn amount_out_default(amount_in: u64, reserve_in: u64, reserve_out: u64) -> u64 {
    amount_out(amount_in, reserve_in, reserve_out, SWAP_FEE_BPS)
}

/// Fee charged on `amount` at `fee_bps`.
pub fn fee(amount: u64, fee_bps: u64) -> u64 {
    (amount as u128 * fee_bps as u128 / BPS_DENOMINATOR as u128) as u64
}

/// Relative distance between spot and TWAP in basis points, 0 without a TWAP.
pub fn deviation_bps(twap_price: u64, spot_price: u64) -> u64 {
    if twap_price == 0 {
        return 0;
    }
    (twap_price.abs_diff(spot_price) as u128 * BPS_DENOMINATOR as u128 / twap_price as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_out_reference_value() {
        let expected = (1_000_000u128 * 9970 * 10_000_000_000)
            / (10_000_000_000u128 * 10000 + 1_000_000 * 9970);
        assert_eq!(
            amount_out(1_000_000, 10_000_000_000, 10_000_000_000, 30),
            expected as u64
        );
        assert_eq!(expected, 996_900);
    }

    #[test]
    fn test_amount_out_zero_reserves() {
        assert_eq!(amount_out(1_000, 0, 1_000_000, 30), 0);
        assert_eq!(amount_out(1_000, 1_000_000, 0, 30), 0);
        assert_eq!(amount_out(0, 1_000_000, 1_000_000, 30), 0);
    }

    #[test]
    fn test_amount_out_cannot_drain_pool() {
        let reserve_out = 50_000_000_000;
        for amount_in in [1, 1_000, 500_000_000_000, u64::MAX / 4] {
            assert!(amount_out(amount_in, 1_000, reserve_out, 30) < reserve_out);
        }
        // A zero fee still leaves something in the pool
        assert!(amount_out(u64::MAX, 1, reserve_out, 0) < reserve_out);
    }

    #[test]
    fn test_amount_out_wide_inputs() {
        let one_token = 1_000_000_000_000_000_000u64;
        assert_eq!(amount_out(one_token, one_token, one_token, 30), 499_248_873_309_964_947);

        let max = amount_out(u64::MAX, 1, u64::MAX, 30);
        assert_eq!(max, 18_446_744_073_709_551_613);
        assert!(max < u64::MAX);

        let half = u64::MAX / 2;
        assert_eq!(amount_out(half, 1 << 40, half, 30), 9_223_370_934_034_819_628);
        assert!(amount_out(half, 1 << 40, half, 0) < half);
    }

    #[test]
    fn test_price_impact_bounds_and_monotonicity() {
        let reserve = 10_000_000_000;
        let mut last = 0;
        for amount_in in (0..40).map(|i| i * 1_000_000_000u64) {
            let impact = price_impact(amount_in, reserve, reserve);
            assert!(impact <= 10_000);
            assert!(impact >= last);
            last = impact;
        }
        assert_eq!(price_impact(u64::MAX, 1, 1), 9_999);
        assert_eq!(price_impact(5, 0, 100), 0);
    }

    #[test]
    fn test_price_impact_half_pool() {
        // Adding the full reserve again moves price by half
        assert_eq!(price_impact(1_000, 1_000, 1_000), 5_000);
        assert_eq!(price_impact(1_000, 1_000, 1), price_impact(1_000, 1_000, u64::MAX));
    }

    #[test]
    fn test_fees_and_deviation() {
        assert_eq!(fee(10_000_000, 30), 30_000);
        assert_eq!(fee(10_000_000, 9), 9_000);
        assert_eq!(deviation_bps(1_000_000_000, 1_200_000_000), 2_000);
        assert_eq!(deviation_bps(1_000_000_000, 800_000_000), 2_000);
        assert_eq!(deviation_bps(0, 5), 0);
    }
}
