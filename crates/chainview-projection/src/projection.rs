//! The projection contract and its shared runtime.
//!
//! A projection consumes the ordered event stream and materializes views.
//! Each implementation declares the event names it listens to, and handles
//! one height per `handle_events` call: all view writes for that height plus
//! the watermark advance happen inside a single SQLite transaction. An error
//! drops the transaction, sqlx rolls it back, and the watermark stays where
//! it was — the scheduler retries the same height later.
//!
//! [`ProjectionRuntime`] carries the pool and the watermark bookkeeping so
//! concrete projections hold it as a field instead of inheriting from a base
//! type.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use chainview_core::Event;
use chainview_storage::watermark;

use crate::error::ProjectionError;

/// A view-materializing consumer of the event stream.
#[async_trait]
pub trait Projection: Send + Sync {
    /// Stable identifier, used as the watermark key.
    fn id(&self) -> &'static str;

    /// Event names this projection reacts to. Events outside this set are
    /// skipped without error.
    fn events_to_listen(&self) -> &'static [&'static str];

    /// Idempotent startup hook: register the watermark row, warm caches.
    async fn on_init(&self) -> Result<(), ProjectionError>;

    /// Apply all of `height`'s events and advance the watermark, atomically.
    async fn handle_events(&self, height: i64, events: &[Event]) -> Result<(), ProjectionError>;
}

/// Shared plumbing held by every concrete projection: the pool plus
/// watermark reads and writes keyed by the projection id.
pub struct ProjectionRuntime {
    pool: SqlitePool,
    projection_id: &'static str,
}

impl ProjectionRuntime {
    pub fn new(pool: SqlitePool, projection_id: &'static str) -> Self {
        Self { pool, projection_id }
    }

    pub fn id(&self) -> &'static str {
        self.projection_id
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Ensure the watermark row exists, starting at height 0. Safe to call
    /// on every process start.
    pub async fn ensure_registered(&self) -> Result<(), ProjectionError> {
        let mut conn = self.pool.acquire().await?;
        watermark::register_projection(&mut conn, self.projection_id).await?;
        debug!(projection = self.projection_id, "projection registered");
        Ok(())
    }

    /// The last height this projection has fully handled.
    pub async fn last_handled_height(&self) -> Result<Option<i64>, ProjectionError> {
        let mut conn = self.pool.acquire().await?;
        Ok(watermark::last_handled_height(&mut conn, self.projection_id).await?)
    }

    /// Whether `height` is at or below the watermark. Replayed heights are
    /// skipped so at-most-once application holds even for counter views.
    pub async fn already_handled(&self, height: i64) -> Result<bool, ProjectionError> {
        Ok(self.last_handled_height().await?.is_some_and(|h| h >= height))
    }

    /// Begin the per-height transaction.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, ProjectionError> {
        Ok(self.pool.begin().await?)
    }

    /// Advance the watermark inside the caller's transaction, then commit.
    /// Dropping `tx` before this point rolls everything back.
    pub async fn commit_at(
        &self,
        mut tx: Transaction<'static, Sqlite>,
        height: i64,
    ) -> Result<(), ProjectionError> {
        watermark::update_last_handled_height(&mut tx, self.projection_id, height).await?;
        tx.commit().await?;
        debug!(projection = self.projection_id, height, "height committed");
        Ok(())
    }
}
