//! Postgres-backed implementation of the core [`HistoryStore`] trait.

use async_trait::async_trait;
use ideaforge_core::history::{validate_field_name, validate_position};
use ideaforge_core::types::DbId;
use ideaforge_core::{HistoryError, HistoryStore};
use sqlx::PgPool;

use crate::models::history_entry::CreateHistoryEntry;
use crate::repositories::HistoryEntryRepo;

/// Adapts [`HistoryEntryRepo`] to the store contract the history log
/// engine expects. Cheap to clone; share one per pool.
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn list_recent(
        &self,
        brainstorm_id: DbId,
        limit: i64,
    ) -> Result<Vec<ideaforge_core::HistoryEntry>, HistoryError> {
        let rows = HistoryEntryRepo::list_recent(&self.pool, brainstorm_id, limit)
            .await
            .map_err(|e| HistoryError::Store(e.to_string()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_truncating(
        &self,
        input: &ideaforge_core::CreateHistoryEntry,
    ) -> Result<ideaforge_core::HistoryEntry, HistoryError> {
        validate_field_name(&input.field_name)?;
        validate_position(input.position)?;

        let dto = CreateHistoryEntry {
            actor_id: input.actor_id,
            field_name: input.field_name.clone(),
            old_value: input.old_value.clone(),
            new_value: input.new_value.clone(),
            metadata: input.metadata.clone(),
            position: input.position,
        };
        HistoryEntryRepo::create_truncating(&self.pool, input.brainstorm_id, &dto)
            .await
            .map(Into::into)
            .map_err(|e| HistoryError::Store(e.to_string()))
    }
}
