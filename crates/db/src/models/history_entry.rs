//! History entry entity model and DTOs.

use ideaforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `brainstorm_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub brainstorm_id: DbId,
    pub actor_id: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub position: i32,
    pub created_at: Timestamp,
}

/// DTO for recording a history entry under a given brainstorm.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHistoryEntry {
    pub actor_id: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub position: i32,
}

impl From<HistoryEntry> for ideaforge_core::HistoryEntry {
    fn from(row: HistoryEntry) -> Self {
        Self {
            id: row.id,
            brainstorm_id: row.brainstorm_id,
            actor_id: row.actor_id,
            field_name: row.field_name,
            old_value: row.old_value,
            new_value: row.new_value,
            metadata: row.metadata,
            position: row.position,
            created_at: row.created_at,
        }
    }
}
