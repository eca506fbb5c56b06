//! Per-projection watermark bookkeeping.
//!
//! Every projection records the last block height whose events it has fully
//! materialized. The watermark row is written inside the same transaction as
//! the view updates, so views and watermark can never disagree.
//!
//! All functions take a [`SqliteConnection`] so callers decide the
//! transaction scope.

use sqlx::{Row, SqliteConnection};

use crate::error::StorageError;

/// Ensure a watermark row exists for `projection_id`, starting at height 0.
///
/// Does nothing if the projection is already registered.
pub async fn register_projection(
    conn: &mut SqliteConnection,
    projection_id: &str,
) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO projection_last_handled_heights (projection_id, last_handled_height)
         VALUES (?, 0)
         ON CONFLICT (projection_id) DO NOTHING",
    )
    .bind(projection_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// The last height `projection_id` has fully handled, or `None` if the
/// projection has never been registered.
pub async fn last_handled_height(
    conn: &mut SqliteConnection,
    projection_id: &str,
) -> Result<Option<i64>, StorageError> {
    let row = sqlx::query(
        "SELECT last_handled_height FROM projection_last_handled_heights
         WHERE projection_id = ?",
    )
    .bind(projection_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.get::<i64, _>("last_handled_height")))
}

/// Advance the watermark for `projection_id` to `height`.
pub async fn update_last_handled_height(
    conn: &mut SqliteConnection,
    projection_id: &str,
    height: i64,
) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO projection_last_handled_heights (projection_id, last_handled_height)
         VALUES (?, ?)
         ON CONFLICT (projection_id) DO UPDATE SET
             last_handled_height = excluded.last_handled_height",
    )
    .bind(projection_id)
    .bind(height)
    .execute(conn)
    .await?;

    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteStore;

    #[tokio::test]
    async fn unregistered_projection_has_no_watermark() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        let height = last_handled_height(&mut conn, "block").await.unwrap();
        assert!(height.is_none());
    }

    #[tokio::test]
    async fn register_initializes_at_zero() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        register_projection(&mut conn, "block").await.unwrap();
        assert_eq!(last_handled_height(&mut conn, "block").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn register_does_not_reset_existing_watermark() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        register_projection(&mut conn, "block").await.unwrap();
        update_last_handled_height(&mut conn, "block", 42).await.unwrap();

        // Re-registering on restart must leave the watermark untouched
        register_projection(&mut conn, "block").await.unwrap();
        assert_eq!(last_handled_height(&mut conn, "block").await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn watermark_advances() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        register_projection(&mut conn, "transaction").await.unwrap();
        update_last_handled_height(&mut conn, "transaction", 10).await.unwrap();
        update_last_handled_height(&mut conn, "transaction", 11).await.unwrap();

        assert_eq!(
            last_handled_height(&mut conn, "transaction").await.unwrap(),
            Some(11)
        );
    }

    #[tokio::test]
    async fn projections_are_independent() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        register_projection(&mut conn, "block").await.unwrap();
        register_projection(&mut conn, "account").await.unwrap();
        update_last_handled_height(&mut conn, "block", 100).await.unwrap();

        assert_eq!(last_handled_height(&mut conn, "block").await.unwrap(), Some(100));
        assert_eq!(last_handled_height(&mut conn, "account").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn watermark_rolls_back_with_transaction() {
        let store = SqliteStore::in_memory().await.unwrap();
        {
            let mut conn = store.pool().acquire().await.unwrap();
            register_projection(&mut conn, "block").await.unwrap();
        }

        let mut tx = store.pool().begin().await.unwrap();
        update_last_handled_height(&mut tx, "block", 7).await.unwrap();
        drop(tx); // rollback

        let mut conn = store.pool().acquire().await.unwrap();
        assert_eq!(last_handled_height(&mut conn, "block").await.unwrap(), Some(0));
    }
}
