pub mod brainstorm;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /brainstorms                      list, create
/// /brainstorms/{id}                 get, update, delete
/// /brainstorms/{id}/history         list, record, discard suffix
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/brainstorms", brainstorm::router())
}
