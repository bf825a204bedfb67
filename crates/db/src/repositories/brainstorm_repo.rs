//! Repository for the `brainstorms` table.

use ideaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::brainstorm::{Brainstorm, CreateBrainstorm, UpdateBrainstorm};

/// Column list for `brainstorms` queries.
const COLUMNS: &str = "id, title, compiled_description, bullet_breakdown, stage, \
    created_by_id, created_at, updated_at";

/// Provides CRUD operations for brainstorms.
pub struct BrainstormRepo;

impl BrainstormRepo {
    /// Insert a new brainstorm. Returns the created row.
    pub async fn create(pool: &PgPool, input: &CreateBrainstorm) -> Result<Brainstorm, sqlx::Error> {
        let query = format!(
            "INSERT INTO brainstorms \
                (title, compiled_description, bullet_breakdown, stage, created_by_id) \
             VALUES ($1, $2, $3, COALESCE($4, 'brainstorm'), $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brainstorm>(&query)
            .bind(&input.title)
            .bind(&input.compiled_description)
            .bind(&input.bullet_breakdown)
            .bind(&input.stage)
            .bind(input.created_by_id)
            .fetch_one(pool)
            .await
    }

    /// Find a brainstorm by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Brainstorm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brainstorms WHERE id = $1");
        sqlx::query_as::<_, Brainstorm>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all brainstorms, most recently updated first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Brainstorm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brainstorms ORDER BY updated_at DESC");
        sqlx::query_as::<_, Brainstorm>(&query).fetch_all(pool).await
    }

    /// Partially update a brainstorm; absent DTO fields keep current values.
    /// Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBrainstorm,
    ) -> Result<Option<Brainstorm>, sqlx::Error> {
        let query = format!(
            "UPDATE brainstorms SET \
                 title = COALESCE($2, title), \
                 compiled_description = COALESCE($3, compiled_description), \
                 bullet_breakdown = COALESCE($4, bullet_breakdown), \
                 stage = COALESCE($5, stage), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brainstorm>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.compiled_description)
            .bind(&input.bullet_breakdown)
            .bind(&input.stage)
            .fetch_optional(pool)
            .await
    }

    /// Delete a brainstorm (history rows cascade). Returns `true` if a row
    /// was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM brainstorms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
