//! Error types for the event registry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown event '{name}' v{version}")]
    UnknownEvent { name: String, version: u32 },

    #[error("event '{name}' v{version} already registered")]
    AlreadyRegistered { name: String, version: u32 },

    #[error("malformed event payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("event payload encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}
