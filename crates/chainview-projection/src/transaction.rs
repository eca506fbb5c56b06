//! Transaction projection: `view_transactions` rows from
//! `TransactionCreated` and `TransactionFailed` events.

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

use chainview_core::event::names;
use chainview_core::model::CreateTransactionParams;
use chainview_core::Event;

use crate::error::ProjectionError;
use crate::projection::{Projection, ProjectionRuntime};

pub struct TransactionProjection {
    runtime: ProjectionRuntime,
}

impl TransactionProjection {
    pub fn new(pool: SqlitePool) -> Self {
        Self { runtime: ProjectionRuntime::new(pool, "transaction") }
    }

    async fn upsert(
        conn: &mut SqliteConnection,
        height: i64,
        params: &CreateTransactionParams,
        success: bool,
    ) -> Result<(), ProjectionError> {
        sqlx::query(
            "INSERT OR REPLACE INTO view_transactions
             (tx_hash, block_height, success, code, log, fee, fee_payer, fee_granter,
              gas_wanted, gas_used, memo, timeout_height, msg_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&params.tx_hash)
        .bind(height)
        .bind(success)
        .bind(params.code)
        .bind(&params.log)
        .bind(&params.fee)
        .bind(&params.fee_payer)
        .bind(&params.fee_granter)
        .bind(params.gas_wanted)
        .bind(params.gas_used)
        .bind(&params.memo)
        .bind(params.timeout_height)
        .bind(params.msg_count as i64)
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Projection for TransactionProjection {
    fn id(&self) -> &'static str {
        self.runtime.id()
    }

    fn events_to_listen(&self) -> &'static [&'static str] {
        &[names::TRANSACTION_CREATED, names::TRANSACTION_FAILED]
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
            match event {
                Event::TransactionCreated(created) => {
                    Self::upsert(&mut tx, created.block_height, &created.params, true).await?;
                }
                Event::TransactionFailed(failed) => {
                    Self::upsert(&mut tx, failed.block_height, &failed.params, false).await?;
                }
                _ => {}
            }
        }
        self.runtime.commit_at(tx, height).await
    }
}
