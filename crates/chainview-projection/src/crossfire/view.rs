//! Row access for `view_crossfire_validators`.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};

use crate::error::ProjectionError;

use super::tasks::{TaskColumn, TaskStatus};

/// A campaign participant row. Task columns default to
/// [`TaskStatus::Incomplete`] at insert.
#[derive(Debug, Clone)]
pub struct CrossfireValidatorRow {
    pub operator_address: String,
    pub consensus_node_address: String,
    pub initial_delegator: String,
    pub registered_at_block_height: i64,
    pub joined_at_block_height: i64,
    pub joined_at_block_time: DateTime<Utc>,
    pub moniker: String,
}

/// Insert or refresh a participant. A conflicting row keeps its
/// registration height, joined height/time, and every task status; only the
/// descriptive fields follow the latest registration.
pub async fn upsert(
    conn: &mut SqliteConnection,
    row: &CrossfireValidatorRow,
) -> Result<(), ProjectionError> {
    sqlx::query(
        "INSERT INTO view_crossfire_validators
         (operator_address, consensus_node_address, initial_delegator,
          registered_at_block_height, joined_at_block_height, joined_at_block_time,
          moniker, task_phase1_node_setup, task_phase2_keep_node_active,
          task_phase2_proposal_vote, task_phase2_network_upgrade)
         VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, 0, 0)
         ON CONFLICT (operator_address) DO UPDATE SET
             consensus_node_address = excluded.consensus_node_address,
             initial_delegator      = excluded.initial_delegator,
             moniker                = excluded.moniker",
    )
    .bind(&row.operator_address)
    .bind(&row.consensus_node_address)
    .bind(&row.initial_delegator)
    .bind(row.registered_at_block_height)
    .bind(row.joined_at_block_height)
    .bind(row.joined_at_block_time)
    .bind(&row.moniker)
    .execute(conn)
    .await?;
    Ok(())
}

/// The joined height/time of an existing participant, or `None` for a
/// first-time operator.
pub async fn last_joined(
    conn: &mut SqliteConnection,
    operator: &str,
) -> Result<Option<(i64, DateTime<Utc>)>, ProjectionError> {
    let row = sqlx::query(
        "SELECT joined_at_block_height, joined_at_block_time
         FROM view_crossfire_validators WHERE operator_address = ?",
    )
    .bind(operator)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| {
        (
            r.get::<i64, _>("joined_at_block_height"),
            r.get::<DateTime<Utc>, _>("joined_at_block_time"),
        )
    }))
}

/// Set one task status for the row matching both addresses.
pub async fn update_task(
    conn: &mut SqliteConnection,
    column: TaskColumn,
    status: TaskStatus,
    operator: &str,
    consensus: &str,
) -> Result<(), ProjectionError> {
    let sql = format!(
        "UPDATE view_crossfire_validators SET {} = ?
         WHERE operator_address = ? AND consensus_node_address = ?",
        column.column_name()
    );
    sqlx::query(&sql)
        .bind(status.as_i64())
        .bind(operator)
        .bind(consensus)
        .execute(conn)
        .await?;
    Ok(())
}

/// Set one task status by operator address alone. A missing row is a no-op.
pub async fn update_task_for_operator(
    conn: &mut SqliteConnection,
    column: TaskColumn,
    status: TaskStatus,
    operator: &str,
) -> Result<(), ProjectionError> {
    let sql = format!(
        "UPDATE view_crossfire_validators SET {} = ? WHERE operator_address = ?",
        column.column_name()
    );
    sqlx::query(&sql)
        .bind(status.as_i64())
        .bind(operator)
        .execute(conn)
        .await?;
    Ok(())
}

/// Current status of one task column, or `None` when the operator has no
/// row.
pub async fn find_task(
    conn: &mut SqliteConnection,
    operator: &str,
    column: TaskColumn,
) -> Result<Option<i64>, ProjectionError> {
    let sql = format!(
        "SELECT {} AS status FROM view_crossfire_validators WHERE operator_address = ?",
        column.column_name()
    );
    let row = sqlx::query(&sql).bind(operator).fetch_optional(conn).await?;
    Ok(row.map(|r| r.get::<i64, _>("status")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainview_storage::SqliteStore;
    use chrono::TimeZone;

    fn row(operator: &str, height: i64, moniker: &str) -> CrossfireValidatorRow {
        CrossfireValidatorRow {
            operator_address: operator.into(),
            consensus_node_address: "tcrocnclcons1khkxmphc7sv0fqrej3rltsslrstud78cam9ekl".into(),
            initial_delegator: "tcro1p4fzn6ta24c6ek4v2qls6y5uug44ku9tnypcaf".into(),
            registered_at_block_height: height,
            joined_at_block_height: height,
            joined_at_block_time: Utc.with_ymd_and_hms(2020, 5, 2, 0, 0, 0).unwrap(),
            moniker: moniker.into(),
        }
    }

    #[tokio::test]
    async fn upsert_preserves_tasks_and_joined() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();
        let operator = "tcrocncl1op";

        upsert(&mut conn, &row(operator, 10, "first")).await.unwrap();
        update_task_for_operator(
            &mut conn,
            TaskColumn::Phase1NodeSetup,
            TaskStatus::Completed,
            operator,
        )
        .await
        .unwrap();

        upsert(&mut conn, &row(operator, 99, "renamed")).await.unwrap();

        let joined = last_joined(&mut conn, operator).await.unwrap().unwrap();
        assert_eq!(joined.0, 10);
        assert_eq!(
            find_task(&mut conn, operator, TaskColumn::Phase1NodeSetup).await.unwrap(),
            Some(TaskStatus::Completed.as_i64())
        );
    }

    #[tokio::test]
    async fn task_update_on_missing_row_is_a_no_op() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        update_task_for_operator(
            &mut conn,
            TaskColumn::Phase2ProposalVote,
            TaskStatus::Missed,
            "tcrocncl1ghost",
        )
        .await
        .unwrap();

        assert_eq!(
            find_task(&mut conn, "tcrocncl1ghost", TaskColumn::Phase2ProposalVote)
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn update_task_requires_both_addresses_to_match() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();
        let operator = "tcrocncl1op";

        upsert(&mut conn, &row(operator, 10, "node")).await.unwrap();
        update_task(
            &mut conn,
            TaskColumn::Phase2KeepNodeActive,
            TaskStatus::Completed,
            operator,
            "tcrocnclcons1other",
        )
        .await
        .unwrap();

        // Consensus address mismatch: untouched
        assert_eq!(
            find_task(&mut conn, operator, TaskColumn::Phase2KeepNodeActive).await.unwrap(),
            Some(TaskStatus::Incomplete.as_i64())
        );
    }
}
