//! Brainstorm entity model and DTOs.

use ideaforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `brainstorms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brainstorm {
    pub id: DbId,
    pub title: String,
    pub compiled_description: Option<String>,
    pub bullet_breakdown: Option<String>,
    /// Pipeline stage: `idea`, `brainstorm`, `project`, or `campaign`.
    pub stage: String,
    pub created_by_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a brainstorm.
#[derive(Debug, Deserialize)]
pub struct CreateBrainstorm {
    pub title: String,
    pub compiled_description: Option<String>,
    pub bullet_breakdown: Option<String>,
    pub stage: Option<String>,
    pub created_by_id: DbId,
}

/// DTO for partial updates; absent fields keep their current values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBrainstorm {
    pub title: Option<String>,
    pub compiled_description: Option<String>,
    pub bullet_breakdown: Option<String>,
    pub stage: Option<String>,
}
