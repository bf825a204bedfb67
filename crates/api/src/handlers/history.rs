//! Handlers for the per-brainstorm history log.
//!
//! The client workspace owns the undo pointer; these endpoints expose the
//! record store operations the history engine needs: listing the recent
//! window, recording an entry (which truncates any abandoned redo branch
//! in the same transaction), and discarding a suffix explicitly.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ideaforge_core::error::CoreError;
use ideaforge_core::history::{
    validate_field_name, validate_position, MAX_LOADED_ENTRIES,
};
use ideaforge_core::types::DbId;
use ideaforge_db::models::history_entry::CreateHistoryEntry;
use ideaforge_db::repositories::{BrainstormRepo, HistoryEntryRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for discarding a history suffix.
#[derive(Debug, Deserialize)]
pub struct DiscardQuery {
    /// First position to discard; everything at or beyond it is removed.
    pub from: i32,
}

/// GET /api/v1/brainstorms/{id}/history
///
/// The most recent 100 entries, ascending by position.
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_brainstorm_exists(&state, id).await?;

    let entries = HistoryEntryRepo::list_recent(&state.pool, id, MAX_LOADED_ENTRIES).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/brainstorms/{id}/history
///
/// Record a committed field edit at the given position, discarding any
/// existing entries at or beyond it (branch truncation).
pub async fn record(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateHistoryEntry>,
) -> AppResult<impl IntoResponse> {
    validate_field_name(&input.field_name)?;
    validate_position(input.position)?;
    ensure_brainstorm_exists(&state, id).await?;

    let entry = HistoryEntryRepo::create_truncating(&state.pool, id, &input).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(DataResponse { data: entry }),
    ))
}

/// DELETE /api/v1/brainstorms/{id}/history?from=N
///
/// Discard all entries with `position >= N`.
pub async fn discard(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DiscardQuery>,
) -> AppResult<impl IntoResponse> {
    validate_position(params.from)?;
    ensure_brainstorm_exists(&state, id).await?;

    let deleted = HistoryEntryRepo::delete_from_position(&state.pool, id, params.from).await?;

    tracing::debug!(brainstorm_id = id, from = params.from, deleted, "History suffix discarded");
    Ok(Json(DataResponse {
        data: serde_json::json!({ "deleted": deleted }),
    }))
}

async fn ensure_brainstorm_exists(state: &AppState, id: DbId) -> AppResult<()> {
    BrainstormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Brainstorm",
            id,
        })?;
    Ok(())
}
