//! Generic key/value counter view.
//!
//! Several projections keep aggregate numbers (activity tallies, campaign
//! stats) in narrow two-column tables. [`CounterView`] wraps one such table
//! and exposes the three operations they all need: overwrite, atomic
//! increment, and point lookup.

use sqlx::{Row, SqliteConnection};

use crate::error::StorageError;

/// A key/value counter table. The table must have `key TEXT PRIMARY KEY`
/// and `value INTEGER NOT NULL` columns.
#[derive(Debug, Clone, Copy)]
pub struct CounterView {
    table: &'static str,
}

impl CounterView {
    /// Bind this view to a table created by the schema bootstrap.
    pub const fn new(table: &'static str) -> Self {
        Self { table }
    }

    /// Set `key` to `value`, overwriting any previous value.
    pub async fn set(
        &self,
        conn: &mut SqliteConnection,
        key: &str,
        value: i64,
    ) -> Result<(), StorageError> {
        let sql = format!(
            "INSERT INTO {} (key, value) VALUES (?, ?)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
            self.table
        );
        sqlx::query(&sql).bind(key).bind(value).execute(conn).await?;
        Ok(())
    }

    /// Add `delta` to `key`. A key that has never been written counts from
    /// zero, so the first increment stores `delta` itself.
    pub async fn increment(
        &self,
        conn: &mut SqliteConnection,
        key: &str,
        delta: i64,
    ) -> Result<(), StorageError> {
        let sql = format!(
            "INSERT INTO {} (key, value) VALUES (?, ?)
             ON CONFLICT (key) DO UPDATE SET value = value + excluded.value",
            self.table
        );
        sqlx::query(&sql).bind(key).bind(delta).execute(conn).await?;
        Ok(())
    }

    /// Current value of `key`, or `None` if it has never been written.
    pub async fn find_by(
        &self,
        conn: &mut SqliteConnection,
        key: &str,
    ) -> Result<Option<i64>, StorageError> {
        let sql = format!("SELECT value FROM {} WHERE key = ?", self.table);
        let row = sqlx::query(&sql).bind(key).fetch_optional(conn).await?;
        Ok(row.map(|r| r.get::<i64, _>("value")))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
