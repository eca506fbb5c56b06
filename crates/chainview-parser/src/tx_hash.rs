//! Canonical transaction hashing.

use base64::Engine;
use sha2::{Digest, Sha256};

/// Compute a transaction's canonical hash from its raw base64-encoded
/// bytes: SHA-256 of the decoded bytes, rendered as uppercase hex.
///
/// The hash is taken over the raw bytes, never the decoded body, so it is
/// stable across decoder schema changes.
///
/// # Panics
///
/// Panics if `base64_raw_tx` is not valid base64. Chain-data sources only
/// deliver valid encodings; malformed input here is an upstream contract
/// violation, not a recoverable business error.
pub fn tx_hash(base64_raw_tx: &str) -> String {
    let tx_bytes = base64::engine::general_purpose::STANDARD
        .decode(base64_raw_tx)
        .unwrap_or_else(|e| panic!("invalid raw transaction {base64_raw_tx}: {e}"));
    let digest = Sha256::digest(&tx_bytes);
    hex::encode_upper(digest)
}
