//! Validator activity counters.
//!
//! Tallies the three per-block payout kinds into `view_validator_stats`,
//! both per validator and chain-wide. The batch is folded into an in-memory
//! map first so each touched key gets exactly one database increment per
//! height.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;

use chainview_core::event::names;
use chainview_core::Event;
use chainview_storage::CounterView;

use crate::error::ProjectionError;
use crate::projection::{Projection, ProjectionRuntime};

const STATS: CounterView = CounterView::new("view_validator_stats");

/// Chain-wide aggregate marker used in place of a validator address.
const TOTAL: &str = "-";

pub struct ValidatorStatsProjection {
    runtime: ProjectionRuntime,
}

impl ValidatorStatsProjection {
    pub fn new(pool: SqlitePool) -> Self {
        Self { runtime: ProjectionRuntime::new(pool, "validator_stats") }
    }
}

/// Accumulate one payout into the batch-local tally. Four keys per payout:
/// the validator total, the chain total, and the per-kind breakdowns.
fn tally(deltas: &mut HashMap<String, i64>, validator: &str, kind: &'static str) {
    for key in [
        validator.to_string(),
        TOTAL.to_string(),
        format!("{validator}:{kind}"),
        format!("{TOTAL}:{kind}"),
    ] {
        *deltas.entry(key).or_insert(0) += 1;
    }
}

#[async_trait]
impl Projection for ValidatorStatsProjection {
    fn id(&self) -> &'static str {
        self.runtime.id()
    }

    fn events_to_listen(&self) -> &'static [&'static str] {
        &[
            names::BLOCK_PROPOSER_REWARDED,
            names::BLOCK_REWARDED,
            names::BLOCK_COMMISSIONED,
        ]
    }

    async fn on_init(&self) -> Result<(), ProjectionError> {
        self.runtime.ensure_registered().await
    }

    async fn handle_events(&self, height: i64, events: &[Event]) -> Result<(), ProjectionError> {
        if self.runtime.already_handled(height).await? {
            return Ok(());
        }

        let mut deltas: HashMap<String, i64> = HashMap::new();
        for event in events {
            match event {
                Event::BlockProposerRewarded(p) => {
                    tally(&mut deltas, &p.validator, names::BLOCK_PROPOSER_REWARDED);
                }
                Event::BlockRewarded(p) => {
                    tally(&mut deltas, &p.validator, names::BLOCK_REWARDED);
                }
                Event::BlockCommissioned(p) => {
                    tally(&mut deltas, &p.validator, names::BLOCK_COMMISSIONED);
                }
                _ => {}
            }
        }

        let mut tx = self.runtime.begin().await?;
        for (key, delta) in &deltas {
            STATS.increment(&mut tx, key, *delta).await?;
        }
        self.runtime.commit_at(tx, height).await
    }
}
