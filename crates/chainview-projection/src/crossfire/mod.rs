//! Crossfire incentivized-testnet campaign projection.
//!
//! Tracks participants and their task completion across three timed phases:
//! node setup before phase two, proposal vote and network upgrade during
//! phase two, and transaction volume throughout. Campaign rule violations
//! are validation errors; they roll back the whole height and leave the
//! watermark unmoved, without affecting sibling projections.

pub mod config;
pub mod tasks;
pub mod view;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use chainview_core::event::{
    names, SoftwareUpgradeProposalSubmitted, TransactionCreated, ValidatorCreated, VoteCast,
};
use chainview_core::model::TxSigner;
use chainview_core::Event;
use chainview_parser::address;
use chainview_storage::CounterView;

use crate::error::ProjectionError;
use crate::projection::{Projection, ProjectionRuntime};

use config::{CrossfireConfig, Phase};
use tasks::{stats_key, TaskColumn, TaskStatus};
use view::CrossfireValidatorRow;

const CHAIN_STATS: CounterView = CounterView::new("view_crossfire_chain_stats");
const VALIDATORS_STATS: CounterView = CounterView::new("view_crossfire_validators_stats");

const VOTE_OPTION_YES: &str = "VOTE_OPTION_YES";
const VOTE_OPTION_ABSTAIN: &str = "VOTE_OPTION_ABSTAIN";
const VOTE_OPTION_UNSPECIFIED: &str = "VOTE_OPTION_UNSPECIFIED";

pub struct CrossfireProjection {
    runtime: ProjectionRuntime,
    config: CrossfireConfig,
}

impl CrossfireProjection {
    pub fn new(pool: SqlitePool, config: CrossfireConfig) -> Result<Self, ProjectionError> {
        Ok(Self {
            runtime: ProjectionRuntime::new(pool, "crossfire"),
            config: config.validated()?,
        })
    }

    async fn on_validator_created(
        &self,
        conn: &mut SqliteConnection,
        block_time: DateTime<Utc>,
        created: &ValidatorCreated,
    ) -> Result<(), ProjectionError> {
        use base64::Engine;
        let pubkey = base64::engine::general_purpose::STANDARD
            .decode(&created.tendermint_pubkey)
            .map_err(|e| ProjectionError::Validation(format!("malformed tendermint pubkey: {e}")))?;
        let consensus = address::consensus_address(&self.config.consensus_prefix, &pubkey)?;

        let prior = view::last_joined(conn, &created.validator_address).await?;
        let first_time = prior.is_none();
        let (joined_height, joined_time) = prior.unwrap_or((created.block_height, block_time));

        view::upsert(
            conn,
            &CrossfireValidatorRow {
                operator_address: created.validator_address.clone(),
                consensus_node_address: consensus.clone(),
                initial_delegator: created.delegator_address.clone(),
                registered_at_block_height: created.block_height,
                joined_at_block_height: joined_height,
                joined_at_block_time: joined_time,
                moniker: created.description.moniker.clone(),
            },
        )
        .await?;

        // Setup task is judged once, on first join. Joining exactly at the
        // phase-two boundary decides neither way.
        if first_time {
            let status = if block_time < self.config.phase_two_start {
                Some(TaskStatus::Completed)
            } else if block_time > self.config.phase_two_start {
                Some(TaskStatus::Missed)
            } else {
                None
            };
            if let Some(status) = status {
                view::update_task(
                    conn,
                    TaskColumn::Phase1NodeSetup,
                    status,
                    &created.validator_address,
                    &consensus,
                )
                .await?;
            }
        }

        debug!(operator = %created.validator_address, "crossfire participant upserted");
        Ok(())
    }

    async fn on_vote_cast(
        &self,
        conn: &mut SqliteConnection,
        block_time: DateTime<Utc>,
        vote: &VoteCast,
    ) -> Result<(), ProjectionError> {
        if block_time > self.config.competition_end {
            return Err(ProjectionError::Validation(
                "vote cast after competition end".into(),
            ));
        }
        if let Some(target) = &self.config.network_upgrade_proposal_id {
            if !vote.proposal_id.is_empty() && vote.proposal_id != *target {
                return Err(ProjectionError::Validation(format!(
                    "vote on unexpected proposal {}",
                    vote.proposal_id
                )));
            }
        }
        match vote.option.as_str() {
            VOTE_OPTION_YES | VOTE_OPTION_ABSTAIN | VOTE_OPTION_UNSPECIFIED => {}
            other => {
                return Err(ProjectionError::Validation(format!(
                    "unexpected vote option {other}"
                )));
            }
        }

        if !vote.proposal_id.is_empty() {
            let proposal_id: i64 = vote.proposal_id.parse().map_err(|_| {
                ProjectionError::Validation(format!(
                    "non-numeric proposal id {}",
                    vote.proposal_id
                ))
            })?;
            VALIDATORS_STATS
                .set(conn, &stats_key(tasks::KEY_VOTED_PROPOSAL_ID, &vote.voter), proposal_id)
                .await?;
        }

        // Vote timing decides the task, never rejects the vote: inside phase
        // two it completes, after phase three it can no longer complete.
        let operator = address::validator_address_from_account_address(
            &self.config.validator_prefix,
            &vote.voter,
        )?;
        if block_time > self.config.phase_two_start && block_time < self.config.phase_three_start {
            view::update_task_for_operator(
                conn,
                TaskColumn::Phase2ProposalVote,
                TaskStatus::Completed,
                &operator,
            )
            .await?;
        } else if block_time > self.config.phase_three_start {
            view::update_task_for_operator(
                conn,
                TaskColumn::Phase2ProposalVote,
                TaskStatus::Missed,
                &operator,
            )
            .await?;
        }
        Ok(())
    }

    async fn on_upgrade_proposal(
        &self,
        conn: &mut SqliteConnection,
        block_time: DateTime<Utc>,
        proposal: &SoftwareUpgradeProposalSubmitted,
    ) -> Result<(), ProjectionError> {
        if block_time > self.config.competition_end {
            return Err(ProjectionError::Validation(
                "upgrade proposal after competition end".into(),
            ));
        }
        if !(block_time > self.config.phase_two_start
            && block_time < self.config.phase_three_start)
        {
            return Err(ProjectionError::Validation(
                "upgrade proposal outside phase two".into(),
            ));
        }
        if proposal.proposer_address != self.config.admin_address {
            return Err(ProjectionError::Validation(format!(
                "upgrade proposal from non-admin {}",
                proposal.proposer_address
            )));
        }
        if let (Some(target), Some(id)) = (
            &self.config.network_upgrade_proposal_id,
            &proposal.maybe_proposal_id,
        ) {
            if id != target {
                return Err(ProjectionError::Validation(format!(
                    "upgrade proposal id {id} does not match campaign target"
                )));
            }
        }

        // Unix nanoseconds, matching the rest of the campaign's time records
        let plan_nanos = proposal.plan_time.timestamp_nanos_opt().ok_or_else(|| {
            ProjectionError::Validation("upgrade plan time out of nanosecond range".into())
        })?;
        CHAIN_STATS
            .set(conn, &stats_key(tasks::KEY_NETWORK_UPGRADE, "timestamp"), plan_nanos)
            .await?;
        CHAIN_STATS
            .set(
                conn,
                &stats_key(tasks::KEY_NETWORK_UPGRADE, "blockheight"),
                proposal.plan_height,
            )
            .await?;

        let operator = address::validator_address_from_account_address(
            &self.config.validator_prefix,
            &proposal.proposer_address,
        )?;
        view::update_task_for_operator(
            conn,
            TaskColumn::Phase2NetworkUpgrade,
            TaskStatus::Completed,
            &operator,
        )
        .await?;
        Ok(())
    }

    async fn on_transaction_created(
        &self,
        conn: &mut SqliteConnection,
        block_time: DateTime<Utc>,
        created: &TransactionCreated,
    ) -> Result<(), ProjectionError> {
        if block_time > self.config.competition_end {
            return Err(ProjectionError::Validation(
                "transaction after competition end".into(),
            ));
        }

        // Only the strict phase windows count; a boundary-exact block bumps
        // nothing, total included.
        let Some(phase) = self.config.phase_of(block_time) else {
            return Ok(());
        };
        let phase_key = match phase {
            Phase::One => tasks::KEY_PHASE1_TX_SENT,
            Phase::Two => tasks::KEY_PHASE2_TX_SENT,
            Phase::Three => tasks::KEY_PHASE3_TX_SENT,
        };

        // Counters are keyed by the signer's raw base64 pubkey string, not a
        // derived address, so any single-key signer counts regardless of key
        // scheme.
        for sender in &created.params.senders {
            let TxSigner::Single { pubkey } = sender else {
                continue;
            };
            VALIDATORS_STATS
                .increment(conn, &stats_key(phase_key, pubkey), 1)
                .await?;
            VALIDATORS_STATS
                .increment(conn, &stats_key(tasks::KEY_TOTAL_TX_SENT, pubkey), 1)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Projection for CrossfireProjection {
    fn id(&self) -> &'static str {
        self.runtime.id()
    }

    fn events_to_listen(&self) -> &'static [&'static str] {
        &[
            names::BLOCK_CREATED,
            names::VALIDATOR_CREATED,
            names::VOTE_CAST,
            names::SOFTWARE_UPGRADE_PROPOSAL_SUBMITTED,
            names::TRANSACTION_CREATED,
        ]
    }

    async fn on_init(&self) -> Result<(), ProjectionError> {
        self.runtime.ensure_registered().await
    }

    async fn handle_events(&self, height: i64, events: &[Event]) -> Result<(), ProjectionError> {
        if self.runtime.already_handled(height).await? {
            return Ok(());
        }

        let block_time = events
            .iter()
            .find_map(|e| match e {
                Event::BlockCreated(b) => Some(b.block_time),
                _ => None,
            })
            .ok_or_else(|| {
                ProjectionError::Validation("crossfire batch without BlockCreated".into())
            })?;

        let mut tx = self.runtime.begin().await?;

        // Registrations first, so a vote or transfer in the same block sees
        // the participant row.
        for event in events {
            if let Event::ValidatorCreated(created) = event {
                self.on_validator_created(&mut tx, block_time, created).await?;
            }
        }
        for event in events {
            match event {
                Event::VoteCast(vote) => {
                    self.on_vote_cast(&mut tx, block_time, vote).await?;
                }
                Event::SoftwareUpgradeProposalSubmitted(proposal) => {
                    self.on_upgrade_proposal(&mut tx, block_time, proposal).await?;
                }
                Event::TransactionCreated(created) => {
                    self.on_transaction_created(&mut tx, block_time, created).await?;
                }
                _ => {}
            }
        }
        self.runtime.commit_at(tx, height).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainview_core::event::BlockCreated;
    use chainview_core::model::{CreateTransactionParams, ValidatorDescription};
    use chainview_storage::SqliteStore;
    use chrono::TimeZone;

    const TM_PUBKEY: &str = "na51D8RmKXyWrid9I6wtdxgP6f1Nl3EyNNEzqxVquoM=";
    const SIGNER_PUBKEY: &str = "A3ill3YNyWvcMstrbssC9SpzhMm+tCMWPB7bgOqWQZYk";
    const VOTER: &str = "tcro1p4fzn6ta24c6ek4v2qls6y5uug44ku9tnypcaf";
    const ADMIN: &str = "tcro1jv65s3grqf6v6jl3dp4t6c9t9rk99cd8339p4l";

    fn config() -> CrossfireConfig {
        CrossfireConfig {
            phase_one_start: Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap(),
            phase_two_start: Utc.with_ymd_and_hms(2020, 5, 10, 0, 0, 0).unwrap(),
            phase_three_start: Utc.with_ymd_and_hms(2020, 5, 20, 0, 0, 0).unwrap(),
            competition_end: Utc.with_ymd_and_hms(2020, 5, 30, 0, 0, 0).unwrap(),
            admin_address: ADMIN.into(),
            network_upgrade_proposal_id: Some("4".into()),
            consensus_prefix: "tcrocnclcons".into(),
            validator_prefix: "tcrocncl".into(),
        }
    }

    /// The operator address the campaign derives for [`VOTER`].
    fn voter_operator() -> String {
        address::validator_address_from_account_address("tcrocncl", VOTER).unwrap()
    }

    fn block_created(height: i64, time: DateTime<Utc>) -> Event {
        Event::BlockCreated(BlockCreated {
            block_height: height,
            block_hash: format!("HASH{height}"),
            block_time: time,
            tx_count: 0,
        })
    }

    fn validator_created(height: i64, operator: &str) -> Event {
        Event::ValidatorCreated(ValidatorCreated {
            block_height: height,
            validator_address: operator.into(),
            delegator_address: VOTER.into(),
            tendermint_pubkey: TM_PUBKEY.into(),
            description: ValidatorDescription {
                moniker: "crossfire-node".into(),
                ..ValidatorDescription::default()
            },
        })
    }

    fn vote_cast(height: i64, proposal_id: &str, option: &str) -> Event {
        Event::VoteCast(VoteCast {
            block_height: height,
            voter: VOTER.into(),
            proposal_id: proposal_id.into(),
            option: option.into(),
        })
    }

    fn tx_created(height: i64) -> Event {
        Event::TransactionCreated(TransactionCreated {
            block_height: height,
            params: CreateTransactionParams {
                tx_hash: format!("TX{height}"),
                code: 0,
                log: "[]".into(),
                msg_count: 1,
                fee: String::new(),
                fee_payer: String::new(),
                fee_granter: String::new(),
                gas_wanted: 200_000,
                gas_used: 50_000,
                memo: String::new(),
                timeout_height: 0,
                senders: vec![TxSigner::Single { pubkey: SIGNER_PUBKEY.into() }],
            },
        })
    }

    async fn task_status(pool: &SqlitePool, operator: &str, column: TaskColumn) -> Option<i64> {
        let mut conn = pool.acquire().await.unwrap();
        view::find_task(&mut conn, operator, column).await.unwrap()
    }

    async fn stat(pool: &SqlitePool, view: CounterView, key: &str) -> Option<i64> {
        let mut conn = pool.acquire().await.unwrap();
        view.find_by(&mut conn, key).await.unwrap()
    }

    #[tokio::test]
    async fn setup_task_completed_when_joined_before_phase_two() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let t = Utc.with_ymd_and_hms(2020, 5, 5, 0, 0, 0).unwrap();
        projection
            .handle_events(10, &[block_created(10, t), validator_created(10, &voter_operator())])
            .await
            .unwrap();

        assert_eq!(
            task_status(store.pool(), &voter_operator(), TaskColumn::Phase1NodeSetup).await,
            Some(TaskStatus::Completed.as_i64())
        );
    }

    #[tokio::test]
    async fn setup_task_missed_when_joined_after_phase_two() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let t = Utc.with_ymd_and_hms(2020, 5, 15, 0, 0, 0).unwrap();
        projection
            .handle_events(10, &[block_created(10, t), validator_created(10, &voter_operator())])
            .await
            .unwrap();

        assert_eq!(
            task_status(store.pool(), &voter_operator(), TaskColumn::Phase1NodeSetup).await,
            Some(TaskStatus::Missed.as_i64())
        );
    }

    #[tokio::test]
    async fn boundary_exact_join_decides_neither_way() {
        let store = SqliteStore::in_memory().await.unwrap();
        let cfg = config();
        let boundary = cfg.phase_two_start;
        let projection = CrossfireProjection::new(store.pool().clone(), cfg).unwrap();
        projection.on_init().await.unwrap();

        projection
            .handle_events(
                10,
                &[block_created(10, boundary), validator_created(10, &voter_operator())],
            )
            .await
            .unwrap();

        assert_eq!(
            task_status(store.pool(), &voter_operator(), TaskColumn::Phase1NodeSetup).await,
            Some(TaskStatus::Incomplete.as_i64())
        );
    }

    #[tokio::test]
    async fn reregistration_preserves_joined_and_setup_task() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let before = Utc.with_ymd_and_hms(2020, 5, 5, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2020, 5, 25, 0, 0, 0).unwrap();
        projection
            .handle_events(10, &[block_created(10, before), validator_created(10, &voter_operator())])
            .await
            .unwrap();
        projection
            .handle_events(90, &[block_created(90, after), validator_created(90, &voter_operator())])
            .await
            .unwrap();

        let mut conn = store.pool().acquire().await.unwrap();
        let joined = view::last_joined(&mut conn, &voter_operator()).await.unwrap().unwrap();
        // Release the single pooled connection before `task_status` acquires one.
        drop(conn);
        assert_eq!(joined.0, 10);
        assert_eq!(
            task_status(store.pool(), &voter_operator(), TaskColumn::Phase1NodeSetup).await,
            Some(TaskStatus::Completed.as_i64())
        );
    }

    #[tokio::test]
    async fn vote_inside_phase_two_completes_the_task() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let join = Utc.with_ymd_and_hms(2020, 5, 5, 0, 0, 0).unwrap();
        projection
            .handle_events(10, &[block_created(10, join), validator_created(10, &voter_operator())])
            .await
            .unwrap();

        let t = Utc.with_ymd_and_hms(2020, 5, 15, 0, 0, 0).unwrap();
        projection
            .handle_events(20, &[block_created(20, t), vote_cast(20, "4", VOTE_OPTION_YES)])
            .await
            .unwrap();

        assert_eq!(
            task_status(store.pool(), &voter_operator(), TaskColumn::Phase2ProposalVote).await,
            Some(TaskStatus::Completed.as_i64())
        );
        assert_eq!(
            stat(
                store.pool(),
                VALIDATORS_STATS,
                &stats_key(tasks::KEY_VOTED_PROPOSAL_ID, VOTER)
            )
            .await,
            Some(4)
        );
    }

    #[tokio::test]
    async fn vote_after_phase_three_is_missed_not_completed() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let join = Utc.with_ymd_and_hms(2020, 5, 5, 0, 0, 0).unwrap();
        projection
            .handle_events(10, &[block_created(10, join), validator_created(10, &voter_operator())])
            .await
            .unwrap();

        let t = Utc.with_ymd_and_hms(2020, 5, 25, 0, 0, 0).unwrap();
        projection
            .handle_events(20, &[block_created(20, t), vote_cast(20, "4", VOTE_OPTION_YES)])
            .await
            .unwrap();

        assert_eq!(
            task_status(store.pool(), &voter_operator(), TaskColumn::Phase2ProposalVote).await,
            Some(TaskStatus::Missed.as_i64())
        );
    }

    #[tokio::test]
    async fn vote_after_competition_end_rolls_back_the_height() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let t = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let err = projection
            .handle_events(20, &[block_created(20, t), vote_cast(20, "4", VOTE_OPTION_YES)])
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectionError::Validation(_)));

        let runtime = ProjectionRuntime::new(store.pool().clone(), "crossfire");
        assert_eq!(runtime.last_handled_height().await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn vote_on_wrong_proposal_or_option_is_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let t = Utc.with_ymd_and_hms(2020, 5, 15, 0, 0, 0).unwrap();
        let wrong_proposal = projection
            .handle_events(20, &[block_created(20, t), vote_cast(20, "9", VOTE_OPTION_YES)])
            .await;
        assert!(matches!(wrong_proposal, Err(ProjectionError::Validation(_))));

        let wrong_option = projection
            .handle_events(20, &[block_created(20, t), vote_cast(20, "4", "VOTE_OPTION_NO")])
            .await;
        assert!(matches!(wrong_option, Err(ProjectionError::Validation(_))));
    }

    #[tokio::test]
    async fn admin_upgrade_proposal_records_chain_stats() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let t = Utc.with_ymd_and_hms(2020, 5, 15, 0, 0, 0).unwrap();
        let plan_time = Utc.with_ymd_and_hms(2020, 5, 22, 0, 0, 0).unwrap();
        let proposal = Event::SoftwareUpgradeProposalSubmitted(SoftwareUpgradeProposalSubmitted {
            block_height: 20,
            proposer_address: ADMIN.into(),
            maybe_proposal_id: Some("4".into()),
            plan_name: "v2".into(),
            plan_height: 9_000,
            plan_time,
        });
        projection
            .handle_events(20, &[block_created(20, t), proposal])
            .await
            .unwrap();

        // Stored in Unix nanoseconds, not seconds
        assert_eq!(
            stat(store.pool(), CHAIN_STATS, "network_upgrade:timestamp").await,
            Some(plan_time.timestamp_nanos_opt().unwrap())
        );
        assert_eq!(
            stat(store.pool(), CHAIN_STATS, "network_upgrade:blockheight").await,
            Some(9_000)
        );
    }

    #[tokio::test]
    async fn non_admin_upgrade_proposal_is_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let t = Utc.with_ymd_and_hms(2020, 5, 15, 0, 0, 0).unwrap();
        let proposal = Event::SoftwareUpgradeProposalSubmitted(SoftwareUpgradeProposalSubmitted {
            block_height: 20,
            proposer_address: VOTER.into(),
            maybe_proposal_id: Some("4".into()),
            plan_name: "v2".into(),
            plan_height: 9_000,
            plan_time: t,
        });
        let err = projection
            .handle_events(20, &[block_created(20, t), proposal])
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectionError::Validation(_)));
    }

    #[tokio::test]
    async fn tx_volume_counts_phase_window_and_total_keyed_by_pubkey() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let in_phase_one = Utc.with_ymd_and_hms(2020, 5, 5, 0, 0, 0).unwrap();
        let in_phase_three = Utc.with_ymd_and_hms(2020, 5, 25, 0, 0, 0).unwrap();
        projection
            .handle_events(10, &[block_created(10, in_phase_one), tx_created(10)])
            .await
            .unwrap();
        projection
            .handle_events(20, &[block_created(20, in_phase_three), tx_created(20)])
            .await
            .unwrap();

        // The key suffix is the signer's raw base64 pubkey string
        assert_eq!(
            stat(
                store.pool(),
                VALIDATORS_STATS,
                &stats_key(tasks::KEY_PHASE1_TX_SENT, SIGNER_PUBKEY)
            )
            .await,
            Some(1)
        );
        assert_eq!(
            stat(
                store.pool(),
                VALIDATORS_STATS,
                &stats_key(tasks::KEY_PHASE3_TX_SENT, SIGNER_PUBKEY)
            )
            .await,
            Some(1)
        );
        assert_eq!(
            stat(
                store.pool(),
                VALIDATORS_STATS,
                &stats_key(tasks::KEY_TOTAL_TX_SENT, SIGNER_PUBKEY)
            )
            .await,
            Some(2)
        );
        // Nothing is stored under a derived account address
        assert_eq!(
            stat(
                store.pool(),
                VALIDATORS_STATS,
                &stats_key(tasks::KEY_PHASE1_TX_SENT, VOTER)
            )
            .await,
            None
        );
    }

    #[tokio::test]
    async fn tx_volume_counts_ed25519_signers_too() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        // A 32-byte ed25519 pubkey: no account address can be derived from
        // it, but the counter keys on the pubkey string itself.
        let mut event = tx_created(10);
        let Event::TransactionCreated(ref mut created) = event else { unreachable!() };
        created.params.senders = vec![TxSigner::Single { pubkey: TM_PUBKEY.into() }];

        let in_phase_one = Utc.with_ymd_and_hms(2020, 5, 5, 0, 0, 0).unwrap();
        projection
            .handle_events(10, &[block_created(10, in_phase_one), event])
            .await
            .unwrap();

        assert_eq!(
            stat(
                store.pool(),
                VALIDATORS_STATS,
                &stats_key(tasks::KEY_PHASE1_TX_SENT, TM_PUBKEY)
            )
            .await,
            Some(1)
        );
    }

    #[tokio::test]
    async fn tx_outside_all_windows_counts_nothing() {
        let store = SqliteStore::in_memory().await.unwrap();
        let projection = CrossfireProjection::new(store.pool().clone(), config()).unwrap();
        projection.on_init().await.unwrap();

        let before_campaign = Utc.with_ymd_and_hms(2020, 4, 20, 0, 0, 0).unwrap();
        projection
            .handle_events(5, &[block_created(5, before_campaign), tx_created(5)])
            .await
            .unwrap();

        assert_eq!(
            stat(
                store.pool(),
                VALIDATORS_STATS,
                &stats_key(tasks::KEY_TOTAL_TX_SENT, SIGNER_PUBKEY)
            )
            .await,
            None
        );
    }
}
