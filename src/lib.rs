//! Synthetic DeFi transaction fixtures for detector testing.
//!
//! Two generators share the same building blocks: `defi` produces attack-tagged
//! transactions with protocol events, `behavioral` produces Move-style swap
//! transactions that encode behavioral patterns through timing and amounts.

pub mod amm;
pub mod assembler;
pub mod behavioral;
pub mod cli;
pub mod clock;
pub mod constants;
pub mod defi;
pub mod error;
pub mod events;
pub mod ids;
pub mod output;
pub mod stats;
pub mod transaction;

pub use error::{FixtureError, Result};
