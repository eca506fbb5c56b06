//! Projection error type.

use thiserror::Error;

use chainview_parser::ParseError;
use chainview_storage::StorageError;

/// Errors surfaced while materializing events into views.
///
/// Any error returned from `handle_events` drops the in-flight database
/// transaction, so the height's view writes and its watermark advance are
/// rolled back together and the height is retried verbatim.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// View store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Raw database failure outside the store primitives.
    #[error("database error: {0}")]
    Database(String),

    /// A domain rule rejected the event (campaign rule violation,
    /// out-of-range value). The height rolls back.
    #[error("validation error: {0}")]
    Validation(String),

    /// Address derivation failed on event data.
    #[error(transparent)]
    Address(#[from] ParseError),
}

impl From<sqlx::Error> for ProjectionError {
    fn from(e: sqlx::Error) -> Self {
        ProjectionError::Database(e.to_string())
    }
}
