//! Per-transaction command parsing.
//!
//! Pairs each raw transaction with its index-matched execution result and
//! the externally decoded body, emitting one `CreateTransaction` command
//! per transaction.

use chainview_core::model::{Block, BlockResults, CreateTransactionParams, DecodedTx};
use chainview_core::Command;

use crate::error::ParseError;
use crate::tx_hash::tx_hash;

/// Decodes one raw transaction's bytes into a structured body.
///
/// Implemented by the chain-specific byte decoder (external collaborator).
pub trait TxDecoder {
    fn decode(&self, base64_raw_tx: &str) -> Result<DecodedTx, ParseError>;
}

/// Parse a block's transactions into `CreateTransaction` commands, one per
/// index of `block.raw_txs` / `block_results.txs_results`.
///
/// The `log` field carries the JSON-encoded structured per-message log for
/// a successful transaction; for a failed one (empty structured log) it
/// falls back to the node's raw log string verbatim. Numeric string fields
/// (`gas_wanted`, `gas_used`, `timeout_height`) that fail to parse reject
/// the transaction with a propagated error — the caller decides whether to
/// abort the batch.
///
/// # Panics
///
/// Panics if the decoder rejects a transaction's bytes, or if the results
/// list does not pair up with the raw transaction list: the chain delivers
/// decodable transactions with one result per transaction, so either
/// failure is an upstream contract violation.
pub fn parse_transaction_commands(
    decoder: &dyn TxDecoder,
    block: &Block,
    block_results: &BlockResults,
) -> Result<Vec<Command>, ParseError> {
    if block.raw_txs.len() != block_results.txs_results.len() {
        panic!(
            "transaction result count mismatch at height {}: {} raw txs, {} results",
            block_results.height,
            block.raw_txs.len(),
            block_results.txs_results.len()
        );
    }

    let block_height = block_results.height;
    let mut commands = Vec::with_capacity(block_results.txs_results.len());

    for (i, raw_tx) in block.raw_txs.iter().enumerate() {
        let tx_result = &block_results.txs_results[i];
        let tx = decoder
            .decode(raw_tx)
            .unwrap_or_else(|e| panic!("error decoding transaction at index {i}: {e}"));

        let log = if tx_result.log.is_empty() {
            // failed transaction: only the unstructured raw log exists
            tx_result.raw_log.clone()
        } else {
            serde_json::to_string(&tx_result.log)
                .map_err(|e| ParseError::Other(format!("error encoding result log: {e}")))?
        };

        let gas_wanted = parse_i64("gas_wanted", &tx_result.gas_wanted)?;
        let gas_used = parse_i64("gas_used", &tx_result.gas_used)?;
        let timeout_height = parse_i64("timeout_height", &tx.body.timeout_height)?;

        commands.push(Command::CreateTransaction {
            block_height,
            params: CreateTransactionParams {
                tx_hash: tx_hash(raw_tx),
                code: tx_result.code,
                log,
                msg_count: tx.body.messages.len(),
                fee: tx.auth_info.fee.amount.clone(),
                fee_payer: tx.auth_info.fee.payer.clone(),
                fee_granter: tx.auth_info.fee.granter.clone(),
                gas_wanted,
                gas_used,
                memo: tx.body.memo.clone(),
                timeout_height,
                senders: tx.auth_info.signer_infos.clone(),
            },
        });
    }

    Ok(commands)
}

fn parse_i64(field: &str, value: &str) -> Result<i64, ParseError> {
    value.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}
