//! Raw chain-data input types.
//!
//! These mirror what the chain-data source (RPC client, external) delivers
//! per height: a block, its per-transaction results, and the begin-block
//! event list. The indexing core only ever reads these structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Block ────────────────────────────────────────────────────────────────────

/// A block as fetched from the chain-data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: i64,
    pub hash: String,
    pub time: DateTime<Utc>,
    /// Raw transactions, base64-encoded as delivered by the node.
    pub raw_txs: Vec<String>,
}

/// Per-height execution results: begin-block events plus one result per
/// transaction, index-matched against `Block::raw_txs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockResults {
    pub height: i64,
    pub begin_block_events: Vec<BlockEvent>,
    pub txs_results: Vec<TxResult>,
}

/// An ABCI-style event: a type tag and an ordered list of key/value
/// attributes. Attributes are looked up by key within one event, never by
/// position across events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockEvent {
    pub event_type: String,
    pub attributes: Vec<EventAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

impl BlockEvent {
    /// Look up an attribute value by key within this event's group.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Execution result of a single transaction.
///
/// `log` holds the structured per-message log of a successful transaction;
/// it is empty for a failed one (`code != 0`), in which case `raw_log`
/// carries the node's unstructured error string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxResult {
    pub code: i64,
    pub log: Vec<serde_json::Value>,
    pub raw_log: String,
    pub gas_wanted: String,
    pub gas_used: String,
}

// ─── Decoded transaction body ─────────────────────────────────────────────────

/// A structured transaction as returned by the transaction decoder
/// (external collaborator). The hash is never derived from this — only
/// from the raw bytes — so decoder schema evolution cannot change hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedTx {
    pub body: TxBody,
    pub auth_info: TxAuthInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxBody {
    pub messages: Vec<TxMessage>,
    pub memo: String,
    /// Numeric string as encoded on chain; parsed by the transaction parser.
    pub timeout_height: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxMessage {
    pub type_url: String,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxAuthInfo {
    pub fee: TxFee,
    pub signer_infos: Vec<TxSigner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxFee {
    pub amount: String,
    pub payer: String,
    pub granter: String,
}

/// A transaction signer. Campaign tx-volume counters only consider
/// single-key signers; multisig signers are recorded but not counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxSigner {
    Single {
        /// base64-encoded public key.
        pubkey: String,
    },
    Multi {
        pubkeys: Vec<String>,
        threshold: u32,
    },
}

// ─── Shared command/event params ──────────────────────────────────────────────

/// Parameters of a parsed transaction, shared by the `CreateTransaction`
/// command and the `TransactionCreated`/`TransactionFailed` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionParams {
    pub tx_hash: String,
    pub code: i64,
    pub log: String,
    pub msg_count: usize,
    pub fee: String,
    pub fee_payer: String,
    pub fee_granter: String,
    pub gas_wanted: i64,
    pub gas_used: i64,
    pub memo: String,
    pub timeout_height: i64,
    pub senders: Vec<TxSigner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTransferParams {
    pub recipient: String,
    pub sender: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintParams {
    pub bonded_ratio: String,
    pub inflation: String,
    pub annual_provisions: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashValidatorParams {
    pub consensus_node_address: String,
    pub slashed_power: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescription {
    pub moniker: String,
    pub identity: String,
    pub website: String,
    pub security_contact: String,
    pub details: String,
}
