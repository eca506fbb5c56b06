//! SQLite backend for the ChainView view store.
//!
//! Owns the connection pool and bootstraps the view table schema. Uses
//! `sqlx` with WAL mode for concurrent read performance.
//!
//! # Usage
//! ```rust,no_run
//! use chainview_storage::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // File-backed (persistent)
//! let store = SqliteStore::open("./chainview.db").await?;
//!
//! // In-memory (tests / ephemeral)
//! let store = SqliteStore::in_memory().await?;
//! # Ok(())
//! # }
//! ```

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StorageError;

/// SQLite-backed view store shared by all projections.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at `path`.
    ///
    /// The path may be a plain file path (`"./chainview.db"`) or a full
    /// SQLite URL (`"sqlite:./chainview.db?mode=rwc"`).
    pub async fn open(path: &str) -> Result<Self, StorageError> {
        let url = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite:{path}?mode=rwc")
        };

        let pool = SqlitePool::connect(&url)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory SQLite database.
    ///
    /// All data is lost when the pool is dropped. Ideal for tests. The pool
    /// is capped to a single connection so every caller sees the same
    /// in-memory database.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// The underlying connection pool. Projections use this to `begin()`
    /// their per-height transactions.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the view tables and enable WAL mode.
    async fn init_schema(&self) -> Result<(), StorageError> {
        // WAL mode — better concurrent read throughput
        sqlx::query("PRAGMA journal_mode=WAL;")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        for ddl in SCHEMA {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        debug!("view store schema initialized");
        Ok(())
    }
}

/// DDL for every view table. All statements are idempotent.
const SCHEMA: &[&str] = &[
    // Per-projection watermark: the height whose events have been fully
    // materialized into that projection's views.
    "CREATE TABLE IF NOT EXISTS projection_last_handled_heights (
        projection_id       TEXT    NOT NULL,
        last_handled_height INTEGER NOT NULL,
        PRIMARY KEY (projection_id)
    );",
    // Block view
    "CREATE TABLE IF NOT EXISTS view_blocks (
        height   INTEGER NOT NULL,
        hash     TEXT    NOT NULL,
        time     TEXT    NOT NULL,
        tx_count INTEGER NOT NULL,
        PRIMARY KEY (height)
    );",
    // Transaction view
    "CREATE TABLE IF NOT EXISTS view_transactions (
        tx_hash        TEXT    NOT NULL,
        block_height   INTEGER NOT NULL,
        success        INTEGER NOT NULL,
        code           INTEGER NOT NULL,
        log            TEXT    NOT NULL,
        fee            TEXT    NOT NULL,
        fee_payer      TEXT    NOT NULL,
        fee_granter    TEXT    NOT NULL,
        gas_wanted     INTEGER NOT NULL,
        gas_used       INTEGER NOT NULL,
        memo           TEXT    NOT NULL,
        timeout_height INTEGER NOT NULL,
        msg_count      INTEGER NOT NULL,
        PRIMARY KEY (tx_hash)
    );",
    "CREATE INDEX IF NOT EXISTS idx_view_transactions_height
        ON view_transactions (block_height);",
    // Validator view
    "CREATE TABLE IF NOT EXISTS view_validators (
        operator_address       TEXT    NOT NULL,
        consensus_node_address TEXT    NOT NULL,
        initial_delegator      TEXT    NOT NULL,
        status                 TEXT    NOT NULL,
        jailed                 INTEGER NOT NULL,
        joined_at_block_height INTEGER NOT NULL,
        joined_at_block_time   TEXT    NOT NULL,
        moniker                TEXT    NOT NULL,
        identity               TEXT    NOT NULL,
        website                TEXT    NOT NULL,
        security_contact       TEXT    NOT NULL,
        details                TEXT    NOT NULL,
        last_slashed_amount    TEXT,
        last_slash_reason      TEXT,
        PRIMARY KEY (operator_address, consensus_node_address)
    );",
    "CREATE INDEX IF NOT EXISTS idx_view_validators_consensus
        ON view_validators (consensus_node_address);",
    // Validator activity counters
    "CREATE TABLE IF NOT EXISTS view_validator_stats (
        key   TEXT    NOT NULL,
        value INTEGER NOT NULL,
        PRIMARY KEY (key)
    );",
    // Account view
    "CREATE TABLE IF NOT EXISTS view_accounts (
        address            TEXT    NOT NULL,
        first_seen_height  INTEGER NOT NULL,
        first_seen_time    TEXT    NOT NULL,
        last_active_height INTEGER NOT NULL,
        PRIMARY KEY (address)
    );",
    // Account-to-transaction association
    "CREATE TABLE IF NOT EXISTS view_account_messages (
        account      TEXT    NOT NULL,
        tx_hash      TEXT    NOT NULL,
        block_height INTEGER NOT NULL,
        PRIMARY KEY (account, tx_hash)
    );",
    "CREATE INDEX IF NOT EXISTS idx_view_account_messages_height
        ON view_account_messages (block_height);",
    // Crossfire participant registry with per-task completion status
    "CREATE TABLE IF NOT EXISTS view_crossfire_validators (
        operator_address            TEXT    NOT NULL,
        consensus_node_address      TEXT    NOT NULL,
        initial_delegator           TEXT    NOT NULL,
        registered_at_block_height  INTEGER NOT NULL,
        joined_at_block_height      INTEGER NOT NULL,
        joined_at_block_time        TEXT    NOT NULL,
        moniker                     TEXT    NOT NULL,
        task_phase1_node_setup      INTEGER NOT NULL,
        task_phase2_keep_node_active INTEGER NOT NULL,
        task_phase2_proposal_vote   INTEGER NOT NULL,
        task_phase2_network_upgrade INTEGER NOT NULL,
        PRIMARY KEY (operator_address)
    );",
    // Campaign-wide counters
    "CREATE TABLE IF NOT EXISTS view_crossfire_chain_stats (
        key   TEXT    NOT NULL,
        value INTEGER NOT NULL,
        PRIMARY KEY (key)
    );",
    // Per-participant campaign counters
    "CREATE TABLE IF NOT EXISTS view_crossfire_validators_stats (
        key   TEXT    NOT NULL,
        value INTEGER NOT NULL,
        PRIMARY KEY (key)
    );",
];

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn schema_bootstrap_is_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();
        // Running the DDL a second time must be a no-op
        store.init_schema().await.unwrap();
    }

    #[tokio::test]
    async fn all_view_tables_exist() {
        let store = SqliteStore::in_memory().await.unwrap();

        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(store.pool())
        .await
        .unwrap();

        let names: Vec<String> = rows.iter().map(|r| r.get("name")).collect();
        for expected in [
            "projection_last_handled_heights",
            "view_blocks",
            "view_transactions",
            "view_validators",
            "view_validator_stats",
            "view_accounts",
            "view_account_messages",
            "view_crossfire_validators",
            "view_crossfire_chain_stats",
            "view_crossfire_validators_stats",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing table {expected}");
        }
    }
}
