//! Handlers for the `/brainstorms` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ideaforge_core::error::CoreError;
use ideaforge_core::pipeline::validate_stage;
use ideaforge_core::types::DbId;
use ideaforge_db::models::brainstorm::{CreateBrainstorm, UpdateBrainstorm};
use ideaforge_db::repositories::BrainstormRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/brainstorms
///
/// List all brainstorms, most recently updated first.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let brainstorms = BrainstormRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: brainstorms }))
}

/// POST /api/v1/brainstorms
///
/// Create a brainstorm. The stage defaults to `brainstorm` when absent.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBrainstorm>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()).into());
    }
    if let Some(ref stage) = input.stage {
        validate_stage(stage)?;
    }

    let brainstorm = BrainstormRepo::create(&state.pool, &input).await?;

    tracing::debug!(id = brainstorm.id, "Brainstorm created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: brainstorm })))
}

/// GET /api/v1/brainstorms/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let brainstorm = BrainstormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Brainstorm",
            id,
        })?;
    Ok(Json(DataResponse { data: brainstorm }))
}

/// PATCH /api/v1/brainstorms/{id}
///
/// Partially update a brainstorm; absent fields keep their values.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBrainstorm>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref stage) = input.stage {
        validate_stage(stage)?;
    }

    let brainstorm = BrainstormRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Brainstorm",
            id,
        })?;

    tracing::debug!(id, "Brainstorm updated");
    Ok(Json(DataResponse { data: brainstorm }))
}

/// DELETE /api/v1/brainstorms/{id}
///
/// Delete a brainstorm; its history cascades.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = BrainstormRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::debug!(id, "Brainstorm deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "Brainstorm",
            id,
        }
        .into())
    }
}
