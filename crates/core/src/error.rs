use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors surfaced by the persisted history log.
///
/// Every mutating operation on the log returns one of these instead of
/// swallowing collaborator failures, so the host can decide whether to
/// retry or alert.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The record store rejected or failed a read/write.
    #[error("History store error: {0}")]
    Store(String),

    /// The host-side applier failed to apply a revert/reapply command.
    #[error("Failed to apply history command: {0}")]
    Apply(String),

    /// Input validation failed before touching the store.
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Error returned by a reversible action's undo/redo closure.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ActionError(pub String);

impl ActionError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
