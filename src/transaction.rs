//! Transaction records emitted by the generators.

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DEX_MODULE, EXECUTION_SUCCESS, GAS_USED_MAX, GAS_USED_MIN, PACKAGE_ID};
use crate::events::{DefiEvent, Direction, MoveEvent};
use crate::ids;

/// Label carried by attack transactions of the defi dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    FlashLoan,
    PriceManipulation,
    Sandwich,
}

impl AttackType {
    pub const ALL: [AttackType; 3] = [
        AttackType::FlashLoan,
        AttackType::PriceManipulation,
        AttackType::Sandwich,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AttackType::FlashLoan => "flash_loan",
            AttackType::PriceManipulation => "price_manipulation",
            AttackType::Sandwich => "sandwich",
        }
    }
}

/// Record ordering key shared by both datasets.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefiTransaction {
    pub tx_digest: String,
    pub checkpoint: u64,
    pub sender: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub execution_status: String,
    pub events: Vec<DefiEvent>,
    pub package_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<AttackType>,
}

impl DefiTransaction {
    /// Wrap `events` in a successful transaction with a fresh digest.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        checkpoint: u64,
        sender: &str,
        timestamp: DateTime<Utc>,
        events: Vec<DefiEvent>,
    ) -> Self {
        DefiTransaction {
            tx_digest: ids::random_digest(rng),
            checkpoint,
            sender: sender.to_string(),
            timestamp_ms: timestamp.timestamp_millis(),
            execution_status: EXECUTION_SUCCESS.to_string(),
            events,
            package_id: PACKAGE_ID.to_string(),
            attack_type: None,
        }
    }

    pub fn tagged(mut self, attack_type: AttackType) -> Self {
        self.attack_type = Some(attack_type);
        self
    }

    /// Swap events in emission order.
    pub fn swaps(&self) -> impl Iterator<Item = &crate::events::SwapExecuted> {
        self.events.iter().filter_map(DefiEvent::as_swap)
    }
}

impl Timestamped for DefiTransaction {
    fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_ms)
            .single()
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehavioralTransaction {
    pub tx_digest: String,
    pub checkpoint: u64,
    /// ISO-8601 UTC instant; the document store maps this field as a date.
    pub timestamp_ms: DateTime<Utc>,
    pub sender: String,
    pub execution_status: String,
    pub gas_used: u64,
    pub modules: Vec<String>,
    pub functions: Vec<String>,
    pub events: Vec<MoveEvent>,
}

impl BehavioralTransaction {
    /// Single DEX swap at `timestamp`.
    pub fn swap<R: Rng + ?Sized>(
        rng: &mut R,
        timestamp: DateTime<Utc>,
        sender: &str,
        pool_id: &str,
        amount_in: u64,
        direction: Direction,
        price_impact: Option<u64>,
    ) -> Self {
        let event = crate::events::move_swap(
            rng,
            PACKAGE_ID,
            pool_id,
            sender,
            amount_in,
            direction,
            price_impact,
        );

        BehavioralTransaction {
            tx_digest: ids::float_digest(rng),
            checkpoint: ids::checkpoint(rng),
            timestamp_ms: timestamp,
            sender: sender.to_string(),
            execution_status: EXECUTION_SUCCESS.to_string(),
            gas_used: rng.gen_range(GAS_USED_MIN..=GAS_USED_MAX),
            modules: vec![DEX_MODULE.to_string()],
            functions: vec![direction.function_name().to_string()],
            events: vec![event],
        }
    }

    /// The swap payload of the first event.
    pub fn primary_swap(&self) -> Option<&crate::events::SwapData> {
        self.events.first().map(|e| &e.event_data)
    }
}

impl Timestamped for BehavioralTransaction {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp_ms
    }
}
