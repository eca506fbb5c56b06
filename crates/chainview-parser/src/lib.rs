//! chainview-parser — pure, stateless parsing of raw chain data.
//!
//! Everything in this crate is side-effect-free and deterministic: the same
//! block input always yields the same command sequence, so callers may
//! pre-parse blocks concurrently ahead of projection application.

pub mod address;
pub mod block_events;
pub mod error;
pub mod transaction;
pub mod tx_hash;

pub use block_events::parse_begin_block_events_commands;
pub use error::ParseError;
pub use transaction::{parse_transaction_commands, TxDecoder};
pub use tx_hash::tx_hash;
