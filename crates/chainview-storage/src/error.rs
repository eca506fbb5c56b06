//! Storage error type.

use thiserror::Error;

/// Errors surfaced by the view store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying database failure (connection, constraint, malformed SQL).
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}
