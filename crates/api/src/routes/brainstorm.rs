//! Route definitions for brainstorms and their history logs.

use axum::routing::get;
use axum::Router;

use crate::handlers::{brainstorm, history};
use crate::state::AppState;

/// Brainstorm routes mounted at `/brainstorms`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /{id}                  -> get
/// PATCH  /{id}                  -> update
/// DELETE /{id}                  -> delete
/// GET    /{id}/history          -> history::list
/// POST   /{id}/history          -> history::record
/// DELETE /{id}/history?from=N   -> history::discard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(brainstorm::list).post(brainstorm::create))
        .route(
            "/{id}",
            get(brainstorm::get)
                .patch(brainstorm::update)
                .delete(brainstorm::delete),
        )
        .route(
            "/{id}/history",
            get(history::list)
                .post(history::record)
                .delete(history::discard),
        )
}
