//! Account-message projection: associates accounts with the transactions
//! they signed.
//!
//! One `view_account_messages` row per single-key signer of every
//! `TransactionCreated` event. Multisig signers are skipped; there is no
//! single account to attribute the message to.

use async_trait::async_trait;
use sqlx::SqlitePool;

use chainview_core::event::names;
use chainview_core::model::TxSigner;
use chainview_core::Event;
use chainview_parser::address;

use crate::error::ProjectionError;
use crate::projection::{Projection, ProjectionRuntime};

pub struct AccountMessageProjection {
    runtime: ProjectionRuntime,
    /// bech32 prefix for account addresses, e.g. `"cro"`.
    account_prefix: String,
}

impl AccountMessageProjection {
    pub fn new(pool: SqlitePool, account_prefix: impl Into<String>) -> Self {
        Self {
            runtime: ProjectionRuntime::new(pool, "account_message"),
            account_prefix: account_prefix.into(),
        }
    }

    fn signer_address(&self, pubkey: &str) -> Result<String, ProjectionError> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(pubkey)
            .map_err(|e| ProjectionError::Validation(format!("malformed signer pubkey: {e}")))?;
        Ok(address::account_address(&self.account_prefix, &bytes)?)
    }
}

#[async_trait]
impl Projection for AccountMessageProjection {
    fn id(&self) -> &'static str {
        self.runtime.id()
    }

    fn events_to_listen(&self) -> &'static [&'static str] {
        &[names::TRANSACTION_CREATED]
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
            let Event::TransactionCreated(created) = event else {
                continue;
            };
            for sender in &created.params.senders {
                let TxSigner::Single { pubkey } = sender else {
                    continue;
                };
                let account = self.signer_address(pubkey)?;
                sqlx::query(
                    "INSERT OR REPLACE INTO view_account_messages (account, tx_hash, block_height)
                     VALUES (?, ?, ?)",
                )
                .bind(&account)
                .bind(&created.params.tx_hash)
                .bind(created.block_height)
                .execute(&mut *tx)
                .await?;
            }
        }
        self.runtime.commit_at(tx, height).await
    }
}
