//! ChainView projections.
//!
//! A projection consumes the ordered, height-tagged event stream and
//! materializes one family of read-optimized views. Each handled height is
//! one database transaction: view writes plus the watermark advance commit
//! together or not at all, so a crash or validation rejection leaves the
//! projection exactly at its previous height.
//!
//! Seven projections ship here:
//!
//! | projection        | views                                            |
//! |-------------------|--------------------------------------------------|
//! | [`block`]         | `view_blocks`                                    |
//! | [`transaction`]   | `view_transactions`                              |
//! | [`validator`]     | `view_validators`                                |
//! | [`validator_stats`] | `view_validator_stats`                         |
//! | [`account`]       | `view_accounts`                                  |
//! | [`account_message`] | `view_account_messages`                        |
//! | [`crossfire`]     | `view_crossfire_*` (campaign state machine)      |
//!
//! Projections are independent: each keeps its own watermark, and an error
//! in one never blocks the others.

pub mod account;
pub mod account_message;
pub mod block;
pub mod crossfire;
pub mod error;
pub mod projection;
pub mod transaction;
pub mod validator;
pub mod validator_stats;

pub use account::AccountProjection;
pub use account_message::AccountMessageProjection;
pub use block::BlockProjection;
pub use crossfire::config::CrossfireConfig;
pub use crossfire::CrossfireProjection;
pub use error::ProjectionError;
pub use projection::{Projection, ProjectionRuntime};
pub use transaction::TransactionProjection;
pub use validator::ValidatorProjection;
pub use validator_stats::ValidatorStatsProjection;
