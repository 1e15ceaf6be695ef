//! Attack-tagged DeFi dataset: swaps, flash loans, price manipulation,
//! sandwiches, liquidity and lending.
//!
//! Timestamps are scattered over the week before a fixed wall-clock anchor, so
//! only the sandwich sequence carries an internal ordering.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::clock::recent_timestamp;
use crate::constants::{
    DEX_POOLS, DEX_POOL_USDC_USDT, DEX_POOL_USDT_WETH, DEX_POOL_WETH_USDC, FLASH_LOAN_POOL_USDC,
    LP_PROVIDER_COUNT, MARKET_USDC, MARKET_WETH, MEV_BOTS, NORMAL_USER_COUNT,
};
use crate::events::{self, DefiEvent, SwapExecuted};
use crate::ids;
use crate::transaction::{AttackType, DefiTransaction};

/// Reference TWAP the manipulation pattern deviates from.
const BASE_TWAP_PRICE: u64 = 1_000_000_000;

/// Address books for the defi dataset.
#[derive(Debug, Clone)]
pub struct Actors {
    pub normal_users: Vec<String>,
    pub lp_providers: Vec<String>,
}

impl Actors {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Actors {
            normal_users: (0..NORMAL_USER_COUNT).map(|_| ids::random_short_address(rng)).collect(),
            lp_providers: (0..LP_PROVIDER_COUNT).map(|_| ids::random_short_address(rng)).collect(),
        }
    }
}

/// Generator state for one defi run: RNG, wall-clock anchor and address books.
pub struct DefiGenerator {
    rng: StdRng,
    anchor: DateTime<Utc>,
    actors: Actors,
}

impl DefiGenerator {
    pub fn new(mut rng: StdRng, anchor: DateTime<Utc>) -> Self {
        let actors = Actors::generate(&mut rng);
        DefiGenerator { rng, anchor, actors }
    }

    pub fn actors(&self) -> &Actors {
        &self.actors
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    fn timestamp(&mut self) -> DateTime<Utc> {
        recent_timestamp(&mut self.rng, self.anchor)
    }

    fn pick(rng: &mut StdRng, items: &[&'static str]) -> &'static str {
        items.choose(rng).copied().unwrap_or(DEX_POOL_USDC_USDT)
    }

    fn normal_user(&mut self) -> String {
        self.actors
            .normal_users
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| ids::random_short_address(&mut self.rng))
    }

    fn attacker(&mut self) -> &'static str {
        MEV_BOTS.choose(&mut self.rng).copied().unwrap_or(MEV_BOTS[0])
    }

    /// A small-to-medium swap by a regular trader.
    pub fn normal_swap(&mut self) -> DefiTransaction {
        let pool_id = Self::pick(&mut self.rng, &DEX_POOLS);
        let sender = self.normal_user();

        let amount_in = self.rng.gen_range(100_000_000..=5_000_000_000);
        let reserve_a = self.rng.gen_range(10_000_000_000..=100_000_000_000);
        let reserve_b = self.rng.gen_range(10_000_000_000..=100_000_000_000);
        let timestamp = self.timestamp();

        let swap = SwapExecuted::new(pool_id, &sender, amount_in, reserve_a, reserve_b, true, timestamp);
        let checkpoint = ids::checkpoint(&mut self.rng);
        DefiTransaction::new(&mut self.rng, checkpoint, &sender, timestamp, vec![swap.into()])
    }

    /// Borrow, route the funds through 3-6 chained swaps, repay with profit.
    pub fn flash_loan_attack(&mut self) -> DefiTransaction {
        let attacker = self.attacker();
        let timestamp = self.timestamp();
        let loan_amount: u64 = self.rng.gen_range(50_000_000_000..=500_000_000_000);

        let mut events = vec![events::flash_loan_taken(FLASH_LOAN_POOL_USDC, attacker, loan_amount, timestamp)];

        let num_swaps: usize = self.rng.gen_range(3..=6);
        let reserve_a = self.rng.gen_range(50_000_000_000..=200_000_000_000);
        let reserve_b = self.rng.gen_range(50_000_000_000..=200_000_000_000);

        let mut current_amount = loan_amount;
        for i in 0..num_swaps {
            let pool_id = DEX_POOLS[i % DEX_POOLS.len()];
            let swap_amount = current_amount / (num_swaps - i) as u64;
            let swap = SwapExecuted::new(pool_id, attacker, swap_amount, reserve_a, reserve_b, i % 2 == 0, timestamp);
            // Each leg trades what the previous one produced
            current_amount = swap.amount_out;
            events.push(swap.into());
        }

        let profit_pct: u64 = self.rng.gen_range(1..=5);
        let repay_amount = loan_amount + loan_amount * profit_pct / 100;
        events.push(events::flash_loan_repaid(FLASH_LOAN_POOL_USDC, attacker, repay_amount, timestamp));

        let checkpoint = ids::checkpoint(&mut self.rng);
        DefiTransaction::new(&mut self.rng, checkpoint, attacker, timestamp, events)
            .tagged(AttackType::FlashLoan)
    }

    /// One swap of 20-40% of the pool, the resulting TWAP divergence, and an
    /// optional tail of pump swaps.
    pub fn price_manipulation(&mut self) -> DefiTransaction {
        let attacker = self.attacker();
        let timestamp = self.timestamp();
        let pool_id = Self::pick(&mut self.rng, &[DEX_POOL_USDC_USDT, DEX_POOL_USDT_WETH]);

        let reserve_a: u64 = self.rng.gen_range(30_000_000_000..=100_000_000_000);
        let reserve_b: u64 = self.rng.gen_range(30_000_000_000..=100_000_000_000);
        let amount_in = reserve_a * self.rng.gen_range(20..=40) / 100;

        let mut events: Vec<DefiEvent> = vec![
            SwapExecuted::new(pool_id, attacker, amount_in, reserve_a, reserve_b, true, timestamp).into(),
        ];

        let spot_price = BASE_TWAP_PRICE + BASE_TWAP_PRICE * self.rng.gen_range(15..=30) / 100;
        events.push(events::twap_updated(pool_id, BASE_TWAP_PRICE, spot_price, timestamp));
        events.push(events::price_deviation_detected(pool_id, BASE_TWAP_PRICE, spot_price, timestamp));

        if self.rng.gen_bool(0.5) {
            let pumps = self.rng.gen_range(1..=3);
            for _ in 0..pumps {
                let pump = SwapExecuted::new(pool_id, attacker, amount_in / 3, reserve_a, reserve_b, true, timestamp);
                events.push(pump.into());
            }
        }

        let checkpoint = ids::checkpoint(&mut self.rng);
        DefiTransaction::new(&mut self.rng, checkpoint, attacker, timestamp, events)
            .tagged(AttackType::PriceManipulation)
    }

    /// Front-run, victim and back-run as three transactions on one checkpoint.
    ///
    /// Reserves are carried forward between the swaps so each quote reflects the
    /// trades before it. Only the back-run carries the `sandwich` tag.
    pub fn sandwich_sequence(&mut self) -> Vec<DefiTransaction> {
        let attacker = self.attacker();
        let victim = self.normal_user();
        let pool_id = Self::pick(&mut self.rng, &[DEX_POOL_USDC_USDT, DEX_POOL_WETH_USDC]);

        let base_timestamp = self.timestamp();
        let checkpoint = ids::checkpoint(&mut self.rng);

        let reserve_a = self.rng.gen_range(50_000_000_000..=200_000_000_000);
        let reserve_b = self.rng.gen_range(50_000_000_000..=200_000_000_000);

        // Attacker buys token B ahead of the victim
        let front_amount = self.rng.gen_range(5_000_000_000..=20_000_000_000);
        let front = SwapExecuted::new(pool_id, attacker, front_amount, reserve_a, reserve_b, true, base_timestamp);
        let (reserve_a, reserve_b) = front.reserves_after();

        let victim_timestamp = base_timestamp + Duration::seconds(5);
        let victim_amount = self.rng.gen_range(20_000_000_000..=100_000_000_000);
        let victim_swap = SwapExecuted::new(pool_id, &victim, victim_amount, reserve_a, reserve_b, true, victim_timestamp);
        let (reserve_a, reserve_b) = victim_swap.reserves_after();

        // Attacker sells exactly what the front-run bought
        let back_timestamp = victim_timestamp + Duration::seconds(3);
        let back = SwapExecuted::new(pool_id, attacker, front.amount_out, reserve_a, reserve_b, false, back_timestamp);

        vec![
            DefiTransaction::new(&mut self.rng, checkpoint, attacker, base_timestamp, vec![front.into()]),
            DefiTransaction::new(&mut self.rng, checkpoint, &victim, victim_timestamp, vec![victim_swap.into()]),
            DefiTransaction::new(&mut self.rng, checkpoint, attacker, back_timestamp, vec![back.into()])
                .tagged(AttackType::Sandwich),
        ]
    }

    /// Add or remove a paired deposit.
    pub fn liquidity_operation(&mut self) -> DefiTransaction {
        let provider = self
            .actors
            .lp_providers
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| ids::random_short_address(&mut self.rng));
        let pool_id = Self::pick(&mut self.rng, &DEX_POOLS);
        let timestamp = self.timestamp();

        let add = self.rng.gen_bool(0.5);
        let amount_a = self.rng.gen_range(10_000_000_000..=100_000_000_000);
        let amount_b = self.rng.gen_range(10_000_000_000..=100_000_000_000);

        let event = if add {
            events::liquidity_added(pool_id, &provider, amount_a, amount_b, timestamp)
        } else {
            events::liquidity_removed(pool_id, &provider, amount_a, amount_b, timestamp)
        };

        let checkpoint = ids::checkpoint(&mut self.rng);
        DefiTransaction::new(&mut self.rng, checkpoint, &provider, timestamp, vec![event])
    }

    /// Supply, borrow or repay on one of the lending markets.
    pub fn lending_operation(&mut self) -> DefiTransaction {
        let population = self.actors.normal_users.len() + self.actors.lp_providers.len();
        let user = if population == 0 {
            ids::random_short_address(&mut self.rng)
        } else {
            let idx = self.rng.gen_range(0..population);
            self.actors
                .normal_users
                .iter()
                .chain(self.actors.lp_providers.iter())
                .nth(idx)
                .cloned()
                .unwrap_or_default()
        };
        let market_id = Self::pick(&mut self.rng, &[MARKET_USDC, MARKET_WETH]);
        let timestamp = self.timestamp();
        let amount = self.rng.gen_range(1_000_000_000..=50_000_000_000);

        let event = match self.rng.gen_range(0..3) {
            0 => events::supply(market_id, &user, amount, timestamp),
            1 => events::borrow(&mut self.rng, market_id, &user, amount, timestamp),
            _ => events::repay(&mut self.rng, market_id, &user, amount, timestamp),
        };

        let checkpoint = ids::checkpoint(&mut self.rng);
        DefiTransaction::new(&mut self.rng, checkpoint, &user, timestamp, vec![event])
    }
}
