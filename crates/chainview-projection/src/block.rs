//! Block projection: one `view_blocks` row per `BlockCreated` event.

use async_trait::async_trait;
use sqlx::SqlitePool;

use chainview_core::event::names;
use chainview_core::Event;

use crate::error::ProjectionError;
use crate::projection::{Projection, ProjectionRuntime};

pub struct BlockProjection {
    runtime: ProjectionRuntime,
}

impl BlockProjection {
    pub fn new(pool: SqlitePool) -> Self {
        Self { runtime: ProjectionRuntime::new(pool, "block") }
    }
}

#[async_trait]
impl Projection for BlockProjection {
    fn id(&self) -> &'static str {
        self.runtime.id()
    }

    fn events_to_listen(&self) -> &'static [&'static str] {
        &[names::BLOCK_CREATED]
    }

    async fn on_init(&self) -> Result<(), ProjectionError> {
        self.runtime.ensure_registered().await
    }

    async fn handle_events(&self, height: i64, events: &[Event]) -> Result<(), ProjectionError> {
        if self.runtime.already_handled(height).await? {
            return Ok(());
        }

        let mut tx = self.runtime.begin().await?;
        for event in events {
            if let Event::BlockCreated(block) = event {
                sqlx::query(
                    "INSERT OR REPLACE INTO view_blocks (height, hash, time, tx_count)
                     VALUES (?, ?, ?, ?)",
                )
                .bind(block.block_height)
                .bind(&block.block_hash)
                .bind(block.block_time)
                .bind(block.tx_count)
                .execute(&mut *tx)
                .await?;
            }
        }
        self.runtime.commit_at(tx, height).await
    }
}
