//! Validator projection: the `view_validators` registry.
//!
//! `ValidatorCreated` upserts the row, preserving the original joined
//! height/time when an operator re-registers. `ValidatorSlashed` records the
//! slash on the row; `ValidatorJailed` flips the jailed flag. Both are
//! keyed by consensus node address and are no-ops when no row matches.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use chainview_core::event::{names, ValidatorCreated};
use chainview_core::Event;
use chainview_parser::address;

use crate::error::ProjectionError;
use crate::projection::{Projection, ProjectionRuntime};

pub struct ValidatorProjection {
    runtime: ProjectionRuntime,
    /// bech32 prefix for consensus node addresses, e.g. `"crocnclcons"`.
    consensus_prefix: String,
}

impl ValidatorProjection {
    pub fn new(pool: SqlitePool, consensus_prefix: impl Into<String>) -> Self {
        Self {
            runtime: ProjectionRuntime::new(pool, "validator"),
            consensus_prefix: consensus_prefix.into(),
        }
    }

    async fn apply_created(
        &self,
        conn: &mut SqliteConnection,
        block_time: Option<DateTime<Utc>>,
        created: &ValidatorCreated,
    ) -> Result<(), ProjectionError> {
        let pubkey = base64_decode(&created.tendermint_pubkey)?;
        let consensus = address::consensus_address(&self.consensus_prefix, &pubkey)?;

        let joined = last_joined(conn, &created.validator_address, &consensus).await?;
        let (joined_height, joined_time) = match joined {
            Some(prior) => prior,
            None => {
                let time = block_time.ok_or_else(|| {
                    ProjectionError::Validation(
                        "batch carries ValidatorCreated without BlockCreated".into(),
                    )
                })?;
                (created.block_height, time)
            }
        };

        sqlx::query(
            "INSERT INTO view_validators
             (operator_address, consensus_node_address, initial_delegator, status, jailed,
              joined_at_block_height, joined_at_block_time,
              moniker, identity, website, security_contact, details)
             VALUES (?, ?, ?, 'unbonded', 0, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (operator_address, consensus_node_address) DO UPDATE SET
                 initial_delegator = excluded.initial_delegator,
                 moniker           = excluded.moniker,
                 identity          = excluded.identity,
                 website           = excluded.website,
                 security_contact  = excluded.security_contact,
                 details           = excluded.details",
        )
        .bind(&created.validator_address)
        .bind(&consensus)
        .bind(&created.delegator_address)
        .bind(joined_height)
        .bind(joined_time)
        .bind(&created.description.moniker)
        .bind(&created.description.identity)
        .bind(&created.description.website)
        .bind(&created.description.security_contact)
        .bind(&created.description.details)
        .execute(conn)
        .await?;

        debug!(
            operator = %created.validator_address,
            consensus = %consensus,
            "validator upserted"
        );
        Ok(())
    }
}

/// The prior row's joined height and time, so re-registration never resets
/// tenure. `None` for a first-time validator.
async fn last_joined(
    conn: &mut SqliteConnection,
    operator: &str,
    consensus: &str,
) -> Result<Option<(i64, DateTime<Utc>)>, ProjectionError> {
    let row = sqlx::query(
        "SELECT joined_at_block_height, joined_at_block_time FROM view_validators
         WHERE operator_address = ? AND consensus_node_address = ?",
    )
    .bind(operator)
    .bind(consensus)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| {
        (
            r.get::<i64, _>("joined_at_block_height"),
            r.get::<DateTime<Utc>, _>("joined_at_block_time"),
        )
    }))
}

fn base64_decode(value: &str) -> Result<Vec<u8>, ProjectionError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|e| ProjectionError::Validation(format!("malformed tendermint pubkey: {e}")))
}

#[async_trait]
impl Projection for ValidatorProjection {
    fn id(&self) -> &'static str {
        self.runtime.id()
    }

    fn events_to_listen(&self) -> &'static [&'static str] {
        &[
            names::BLOCK_CREATED,
            names::VALIDATOR_CREATED,
            names::VALIDATOR_SLASHED,
            names::VALIDATOR_JAILED,
        ]
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
            match event {
                Event::ValidatorCreated(created) => {
                    self.apply_created(&mut tx, block_time, created).await?;
                }
                Event::ValidatorSlashed(slashed) => {
                    sqlx::query(
                        "UPDATE view_validators
                         SET last_slashed_amount = ?, last_slash_reason = ?
                         WHERE consensus_node_address = ?",
                    )
                    .bind(&slashed.slashed_power)
                    .bind(&slashed.reason)
                    .bind(&slashed.consensus_node_address)
                    .execute(&mut *tx)
                    .await?;
                }
                Event::ValidatorJailed(jailed) => {
                    sqlx::query(
                        "UPDATE view_validators
                         SET jailed = 1, status = 'jailed'
                         WHERE consensus_node_address = ?",
                    )
                    .bind(&jailed.consensus_node_address)
                    .execute(&mut *tx)
                    .await?;
                }
                _ => {}
            }
        }
        self.runtime.commit_at(tx, height).await
    }
}
