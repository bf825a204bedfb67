//! Repository for the `brainstorm_history` table.
//!
//! History positions are zero-based and contiguous per brainstorm. The
//! truncating insert runs delete-range-then-insert inside one transaction
//! so a crash can never leave the log torn between the two.

use ideaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::history_entry::{CreateHistoryEntry, HistoryEntry};

/// Column list for `brainstorm_history` queries.
const COLUMNS: &str = "id, brainstorm_id, actor_id, field_name, old_value, new_value, \
    metadata, position, created_at";

/// Provides data access for per-brainstorm history logs.
pub struct HistoryEntryRepo;

impl HistoryEntryRepo {
    /// The most recent `limit` entries for a brainstorm, returned ascending
    /// by position.
    pub async fn list_recent(
        pool: &PgPool,
        brainstorm_id: DbId,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                 SELECT {COLUMNS} FROM brainstorm_history \
                 WHERE brainstorm_id = $1 \
                 ORDER BY position DESC \
                 LIMIT $2 \
             ) AS recent \
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(brainstorm_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Atomically discard the redo branch and record a new entry.
    ///
    /// Deletes all entries with `position >= input.position`, then inserts
    /// the new entry at that position, in a single transaction.
    pub async fn create_truncating(
        pool: &PgPool,
        brainstorm_id: DbId,
        input: &CreateHistoryEntry,
    ) -> Result<HistoryEntry, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM brainstorm_history \
             WHERE brainstorm_id = $1 AND position >= $2",
        )
        .bind(brainstorm_id)
        .bind(input.position)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO brainstorm_history \
                (brainstorm_id, actor_id, field_name, old_value, new_value, metadata, position) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(brainstorm_id)
            .bind(input.actor_id)
            .bind(&input.field_name)
            .bind(&input.old_value)
            .bind(&input.new_value)
            .bind(&input.metadata)
            .bind(input.position)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            brainstorm_id,
            position = entry.position,
            field_name = entry.field_name.as_str(),
            "History entry recorded"
        );
        Ok(entry)
    }

    /// Delete all entries with `position >= position` for a brainstorm.
    /// Returns the number of rows removed.
    pub async fn delete_from_position(
        pool: &PgPool,
        brainstorm_id: DbId,
        position: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM brainstorm_history \
             WHERE brainstorm_id = $1 AND position >= $2",
        )
        .bind(brainstorm_id)
        .bind(position)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count the total number of history entries for a brainstorm.
    pub async fn count_for_brainstorm(
        pool: &PgPool,
        brainstorm_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM brainstorm_history WHERE brainstorm_id = $1")
                .bind(brainstorm_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
