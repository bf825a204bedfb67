//! Ephemeral, session-scoped undo/redo stack for the campaign workspace.
//!
//! Unlike the persisted history log, this stack stores arbitrary
//! asynchronous inverse-operation closures and keeps no durable state:
//! entries live only as long as the owning workspace. Every new action
//! invalidates all pending redos (no branching).

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;

use crate::error::ActionError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of actions kept on the undo stack; oldest are dropped.
pub const MAX_UNDO_ACTIONS: usize = 20;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

type ActionFn = Box<dyn Fn() -> BoxFuture<'static, Result<(), ActionError>> + Send + Sync>;

/// One reversible user action: a label for notifications plus a pair of
/// async closures that reverse and reapply its effect.
pub struct ReversibleAction {
    label: String,
    undo_fn: ActionFn,
    redo_fn: ActionFn,
}

impl ReversibleAction {
    pub fn new<U, UF, R, RF>(label: impl Into<String>, undo_fn: U, redo_fn: R) -> Self
    where
        U: Fn() -> UF + Send + Sync + 'static,
        UF: Future<Output = Result<(), ActionError>> + Send + 'static,
        R: Fn() -> RF + Send + Sync + 'static,
        RF: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        Self {
            label: label.into(),
            undo_fn: Box::new(move || Box::pin(undo_fn())),
            redo_fn: Box::new(move || Box::pin(redo_fn())),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Debug for ReversibleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReversibleAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Result of an `undo`/`redo` attempt on the stack.
#[derive(Debug)]
pub enum StackOutcome {
    /// The closure ran successfully; the action moved to the other stack.
    Done { label: String },
    /// The closure failed; the action is dropped from both stacks.
    Failed { label: String, error: ActionError },
    /// Another undo/redo was in flight; the call was dropped.
    Busy,
    /// The relevant stack was empty.
    Empty,
}

/// User-facing notification emitted after an undo/redo completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionNotice {
    Undone { label: String },
    Redone { label: String },
    UndoFailed { label: String, error: String },
    RedoFailed { label: String, error: String },
}

/// Sink for [`ActionNotice`] events (a toast system in the host UI).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: ActionNotice);
}

/// Default notifier: structured log lines instead of toasts.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: ActionNotice) {
        match notice {
            ActionNotice::Undone { label } => tracing::info!(label, "Undone"),
            ActionNotice::Redone { label } => tracing::info!(label, "Redone"),
            ActionNotice::UndoFailed { label, error } => {
                tracing::warn!(label, error, "Undo failed")
            }
            ActionNotice::RedoFailed { label, error } => {
                tracing::warn!(label, error, "Redo failed")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Action stack
// ---------------------------------------------------------------------------

struct Stacks {
    undo: Vec<ReversibleAction>,
    redo: Vec<ReversibleAction>,
}

/// In-memory undo/redo stack pair with a joint in-flight guard.
///
/// Owned by a single workspace instance; nothing here is global, so two
/// open workspaces each get independent stacks.
pub struct ActionStack<N = TracingNotifier> {
    state: Mutex<Stacks>,
    in_flight: AtomicBool,
    notifier: N,
}

impl Default for ActionStack<TracingNotifier> {
    fn default() -> Self {
        Self::new(TracingNotifier)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<N: Notifier> ActionStack<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            state: Mutex::new(Stacks {
                undo: Vec::new(),
                redo: Vec::new(),
            }),
            in_flight: AtomicBool::new(false),
            notifier,
        }
    }

    fn state(&self) -> MutexGuard<'_, Stacks> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a reversible action, clearing all pending redos and trimming
    /// the undo stack to the most recent [`MAX_UNDO_ACTIONS`].
    pub fn push_action(&self, action: ReversibleAction) {
        let mut state = self.state();
        state.redo.clear();
        state.undo.push(action);
        if state.undo.len() > MAX_UNDO_ACTIONS {
            state.undo.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.state().undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.state().redo.is_empty()
    }

    /// Label of the action `undo` would run next (for menu items).
    pub fn next_undo_label(&self) -> Option<String> {
        self.state().undo.last().map(|a| a.label.clone())
    }

    /// Label of the action `redo` would run next.
    pub fn next_redo_label(&self) -> Option<String> {
        self.state().redo.last().map(|a| a.label.clone())
    }

    /// Run the newest action's undo closure.
    ///
    /// On success the action moves to the redo stack. On failure it is
    /// dropped entirely; the failure is surfaced via the outcome and the
    /// notifier, and the action cannot be retried.
    pub async fn undo(&self) -> StackOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return StackOutcome::Busy;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let Some(action) = self.state().undo.pop() else {
            return StackOutcome::Empty;
        };
        let label = action.label.clone();

        match (action.undo_fn)().await {
            Ok(()) => {
                self.state().redo.push(action);
                self.notifier.notify(ActionNotice::Undone {
                    label: label.clone(),
                });
                StackOutcome::Done { label }
            }
            Err(error) => {
                self.notifier.notify(ActionNotice::UndoFailed {
                    label: label.clone(),
                    error: error.to_string(),
                });
                StackOutcome::Failed { label, error }
            }
        }
    }

    /// Run the newest undone action's redo closure; symmetric to `undo`.
    pub async fn redo(&self) -> StackOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return StackOutcome::Busy;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let Some(action) = self.state().redo.pop() else {
            return StackOutcome::Empty;
        };
        let label = action.label.clone();

        match (action.redo_fn)().await {
            Ok(()) => {
                self.state().undo.push(action);
                self.notifier.notify(ActionNotice::Redone {
                    label: label.clone(),
                });
                StackOutcome::Done { label }
            }
            Err(error) => {
                self.notifier.notify(ActionNotice::RedoFailed {
                    label: label.clone(),
                    error: error.to_string(),
                });
                StackOutcome::Failed { label, error }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
