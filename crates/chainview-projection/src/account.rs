//! Account projection: `view_accounts` rows from transfer activity.
//!
//! Both sides of every `AccountTransferred` event are recorded. A first
//! sighting pins `first_seen_height`/`first_seen_time`; later activity only
//! bumps `last_active_height`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use chainview_core::event::names;
use chainview_core::Event;

use crate::error::ProjectionError;
use crate::projection::{Projection, ProjectionRuntime};

pub struct AccountProjection {
    runtime: ProjectionRuntime,
}

impl AccountProjection {
    pub fn new(pool: SqlitePool) -> Self {
        Self { runtime: ProjectionRuntime::new(pool, "account") }
    }
}

async fn touch_account(
    conn: &mut SqliteConnection,
    address: &str,
    height: i64,
    time: DateTime<Utc>,
) -> Result<(), ProjectionError> {
    sqlx::query(
        "INSERT INTO view_accounts (address, first_seen_height, first_seen_time, last_active_height)
         VALUES (?, ?, ?, ?)
         ON CONFLICT (address) DO UPDATE SET
             last_active_height = excluded.last_active_height",
    )
    .bind(address)
    .bind(height)
    .bind(time)
    .bind(height)
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl Projection for AccountProjection {
    fn id(&self) -> &'static str {
        self.runtime.id()
    }

    fn events_to_listen(&self) -> &'static [&'static str] {
        &[names::BLOCK_CREATED, names::ACCOUNT_TRANSFERRED]
    }

    async fn on_init(&self) -> Result<(), ProjectionError> {
        self.runtime.ensure_registered().await
    }

    async fn handle_events(&self, height: i64, events: &[Event]) -> Result<(), ProjectionError> {
        if self.runtime.already_handled(height).await? {
            return Ok(());
        }

        let block_time = events.iter().find_map(|e| match e {
            Event::BlockCreated(b) => Some(b.block_time),
            _ => None,
        });

        let mut tx = self.runtime.begin().await?;
        for event in events {
            if let Event::AccountTransferred(transfer) = event {
                let time = block_time.ok_or_else(|| {
                    ProjectionError::Validation(
                        "batch carries AccountTransferred without BlockCreated".into(),
                    )
                })?;
                touch_account(&mut tx, &transfer.sender, transfer.block_height, time).await?;
                touch_account(&mut tx, &transfer.recipient, transfer.block_height, time).await?;
            }
        }
        self.runtime.commit_at(tx, height).await
    }
}
