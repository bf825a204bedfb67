//! Core domain logic for the ideaforge backend.
//!
//! Zero internal dependencies so it can be used by the repository layer,
//! the API, and any future worker or CLI tooling. The two undo/redo
//! engines live here:
//!
//! - [`history`]: the persisted, branchable per-brainstorm history log
//! - [`action_stack`]: the ephemeral closure-based stack for the campaign
//!   workspace

pub mod action_stack;
pub mod error;
pub mod history;
pub mod keyboard;
pub mod pipeline;
pub mod types;

pub use action_stack::{ActionNotice, ActionStack, Notifier, ReversibleAction, StackOutcome};
pub use error::{ActionError, CoreError, HistoryError};
pub use history::{
    CreateHistoryEntry, HistoryApplier, HistoryCommand, HistoryEntry, HistoryLog, HistoryStore,
    StepOutcome,
};
pub use keyboard::{FocusContext, HistoryShortcut, KeyChord};
