//! Error types for the parsing pipeline.
//!
//! Parsing is pure, so a parse error has no side effects to undo: it
//! propagates to the caller of the batch, which decides whether to abort.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("event '{event_type}' is missing required attribute '{key}'")]
    MissingAttribute { event_type: String, key: String },

    #[error("invalid numeric field '{field}': {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("malformed public key: {reason}")]
    MalformedPubKey { reason: String },

    #[error("malformed address '{address}': {reason}")]
    MalformedAddress { address: String, reason: String },

    #[error("{0}")]
    Other(String),
}
