//! Commands — intents derived from raw chain data.
//!
//! A command is produced only by the parsers and is immutable once
//! constructed. Business-rule validation (external) turns commands into
//! events. The closed enum forces an exhaustive match at every dispatch
//! site, so adding a command kind is a compile-time-checked change.

use serde::{Deserialize, Serialize};

use crate::model::{
    AccountTransferParams, CreateTransactionParams, MintParams, SlashValidatorParams,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    CreateAccountTransfer {
        block_height: i64,
        params: AccountTransferParams,
    },
    CreateMint {
        block_height: i64,
        params: MintParams,
    },
    CreateBlockProposerReward {
        block_height: i64,
        validator: String,
        amount: String,
    },
    CreateBlockCommission {
        block_height: i64,
        validator: String,
        amount: String,
    },
    CreateBlockReward {
        block_height: i64,
        validator: String,
        amount: String,
    },
    SlashValidator {
        block_height: i64,
        params: SlashValidatorParams,
    },
    JailValidator {
        block_height: i64,
        consensus_node_address: String,
        reason: String,
    },
    CreateTransaction {
        block_height: i64,
        params: CreateTransactionParams,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAccountTransfer { .. } => "CreateAccountTransfer",
            Self::CreateMint { .. } => "CreateMint",
            Self::CreateBlockProposerReward { .. } => "CreateBlockProposerReward",
            Self::CreateBlockCommission { .. } => "CreateBlockCommission",
            Self::CreateBlockReward { .. } => "CreateBlockReward",
            Self::SlashValidator { .. } => "SlashValidator",
            Self::JailValidator { .. } => "JailValidator",
            Self::CreateTransaction { .. } => "CreateTransaction",
        }
    }

    /// The block height this command originates from.
    pub fn block_height(&self) -> i64 {
        match self {
            Self::CreateAccountTransfer { block_height, .. }
            | Self::CreateMint { block_height, .. }
            | Self::CreateBlockProposerReward { block_height, .. }
            | Self::CreateBlockCommission { block_height, .. }
            | Self::CreateBlockReward { block_height, .. }
            | Self::SlashValidator { block_height, .. }
            | Self::JailValidator { block_height, .. }
            | Self::CreateTransaction { block_height, .. } => *block_height,
        }
    }
}
