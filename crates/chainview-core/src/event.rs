//! Events — immutable, versioned facts that projections replay.
//!
//! Every variant is tagged `{name, version, block_height}` and must
//! round-trip byte-for-byte through the [`crate::EventRegistry`]. The
//! closed enum replaces the dynamic type-switch dispatch of older designs:
//! adding an event kind fails to compile until every dispatch site handles
//! it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CreateTransactionParams, ValidatorDescription};

/// Event name constants, used by `Projection::events_to_listen` and the
/// registry so a rename is a single-site change.
pub mod names {
    pub const BLOCK_CREATED: &str = "BlockCreated";
    pub const TRANSACTION_CREATED: &str = "TransactionCreated";
    pub const TRANSACTION_FAILED: &str = "TransactionFailed";
    pub const VALIDATOR_CREATED: &str = "ValidatorCreated";
    pub const VOTE_CAST: &str = "VoteCast";
    pub const SOFTWARE_UPGRADE_PROPOSAL_SUBMITTED: &str = "SoftwareUpgradeProposalSubmitted";
    pub const BLOCK_PROPOSER_REWARDED: &str = "BlockProposerRewarded";
    pub const BLOCK_REWARDED: &str = "BlockRewarded";
    pub const BLOCK_COMMISSIONED: &str = "BlockCommissioned";
    pub const VALIDATOR_SLASHED: &str = "ValidatorSlashed";
    pub const VALIDATOR_JAILED: &str = "ValidatorJailed";
    pub const ACCOUNT_TRANSFERRED: &str = "AccountTransferred";
    pub const COINS_MINTED: &str = "CoinsMinted";
}

// ─── Payloads ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCreated {
    pub block_height: i64,
    pub block_hash: String,
    pub block_time: DateTime<Utc>,
    pub tx_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCreated {
    pub block_height: i64,
    pub params: CreateTransactionParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorCreated {
    pub block_height: i64,
    /// Operator (valoper) address.
    pub validator_address: String,
    pub delegator_address: String,
    /// base64-encoded Tendermint consensus public key.
    pub tendermint_pubkey: String,
    pub description: ValidatorDescription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCast {
    pub block_height: i64,
    pub voter: String,
    pub proposal_id: String,
    pub option: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareUpgradeProposalSubmitted {
    pub block_height: i64,
    pub proposer_address: String,
    pub maybe_proposal_id: Option<String>,
    pub plan_name: String,
    /// Target upgrade height announced by the proposal.
    pub plan_height: i64,
    pub plan_time: DateTime<Utc>,
}

/// Shared payload of the three per-block payout events. They are distinct
/// event kinds — a proposer reward and an ordinary reward for the same
/// validator are separate payouts and are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayout {
    pub block_height: i64,
    pub validator: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSlashed {
    pub block_height: i64,
    pub consensus_node_address: String,
    pub slashed_power: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorJailed {
    pub block_height: i64,
    pub consensus_node_address: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTransferred {
    pub block_height: i64,
    pub recipient: String,
    pub sender: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinsMinted {
    pub block_height: i64,
    pub bonded_ratio: String,
    pub inflation: String,
    pub annual_provisions: String,
    pub amount: String,
}

// ─── Event ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    BlockCreated(BlockCreated),
    TransactionCreated(TransactionCreated),
    TransactionFailed(TransactionCreated),
    ValidatorCreated(ValidatorCreated),
    VoteCast(VoteCast),
    SoftwareUpgradeProposalSubmitted(SoftwareUpgradeProposalSubmitted),
    BlockProposerRewarded(BlockPayout),
    BlockRewarded(BlockPayout),
    BlockCommissioned(BlockPayout),
    ValidatorSlashed(ValidatorSlashed),
    ValidatorJailed(ValidatorJailed),
    AccountTransferred(AccountTransferred),
    CoinsMinted(CoinsMinted),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BlockCreated(_) => names::BLOCK_CREATED,
            Self::TransactionCreated(_) => names::TRANSACTION_CREATED,
            Self::TransactionFailed(_) => names::TRANSACTION_FAILED,
            Self::ValidatorCreated(_) => names::VALIDATOR_CREATED,
            Self::VoteCast(_) => names::VOTE_CAST,
            Self::SoftwareUpgradeProposalSubmitted(_) => {
                names::SOFTWARE_UPGRADE_PROPOSAL_SUBMITTED
            }
            Self::BlockProposerRewarded(_) => names::BLOCK_PROPOSER_REWARDED,
            Self::BlockRewarded(_) => names::BLOCK_REWARDED,
            Self::BlockCommissioned(_) => names::BLOCK_COMMISSIONED,
            Self::ValidatorSlashed(_) => names::VALIDATOR_SLASHED,
            Self::ValidatorJailed(_) => names::VALIDATOR_JAILED,
            Self::AccountTransferred(_) => names::ACCOUNT_TRANSFERRED,
            Self::CoinsMinted(_) => names::COINS_MINTED,
        }
    }

    /// Payload schema version. All current variants are v1; a breaking
    /// payload change registers the new shape under a bumped version.
    pub fn version(&self) -> u32 {
        1
    }

    pub fn block_height(&self) -> i64 {
        match self {
            Self::BlockCreated(p) => p.block_height,
            Self::TransactionCreated(p) | Self::TransactionFailed(p) => p.block_height,
            Self::ValidatorCreated(p) => p.block_height,
            Self::VoteCast(p) => p.block_height,
            Self::SoftwareUpgradeProposalSubmitted(p) => p.block_height,
            Self::BlockProposerRewarded(p)
            | Self::BlockRewarded(p)
            | Self::BlockCommissioned(p) => p.block_height,
            Self::ValidatorSlashed(p) => p.block_height,
            Self::ValidatorJailed(p) => p.block_height,
            Self::AccountTransferred(p) => p.block_height,
            Self::CoinsMinted(p) => p.block_height,
        }
    }
}
