//! Persisted, per-brainstorm undo/redo history log.
//!
//! Maintains a durable, branchable linear history of field edits. The log
//! owns an in-memory cache of the most recent entries plus a movable
//! pointer marking the undo boundary; durability is delegated to a
//! [`HistoryStore`] collaborator and state application to a
//! [`HistoryApplier`] supplied by the host workspace.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of entries loaded into the in-memory cache per brainstorm.
pub const MAX_LOADED_ENTRIES: i64 = 100;

/// Maximum accepted length of a logical field name.
pub const MAX_FIELD_NAME_LEN: usize = 128;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One committed change to a single field of a brainstorm.
///
/// `position` is the zero-based place of this entry in the brainstorm's
/// history sequence. Positions are contiguous per brainstorm; truncation
/// always removes a suffix and never creates gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub brainstorm_id: DbId,
    pub actor_id: DbId,
    /// Logical field changed, e.g. `compiled_description`, or a synthetic
    /// marker such as `deleted_reference` for structural changes.
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    /// Arbitrary payload for changes that are not simple scalar-field
    /// replacements (e.g. the full record of a deleted child object).
    pub metadata: Option<serde_json::Value>,
    pub position: i32,
    pub created_at: Timestamp,
}

/// Input for recording a new history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHistoryEntry {
    pub brainstorm_id: DbId,
    pub actor_id: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub position: i32,
}

/// A typed command the host applies to its own state (and store) when the
/// log navigates. Replaces informal revert/reapply callbacks so the
/// contract is checkable at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryCommand {
    /// Set `field_name` to `value`; `metadata` carries the structural
    /// payload for non-scalar changes (e.g. a child record to re-insert).
    FieldSet {
        field_name: String,
        value: Option<String>,
        metadata: Option<serde_json::Value>,
    },
}

/// Result of an `undo`/`redo` attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A command was applied and the pointer moved.
    Applied { field_name: String },
    /// Another undo/redo was in flight; the call was dropped, not queued.
    Busy,
    /// The pointer was already at the relevant end of history.
    Exhausted,
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Durable record store for history entries.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The most recent `limit` entries for a brainstorm, ascending by
    /// position.
    async fn list_recent(
        &self,
        brainstorm_id: DbId,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Atomically delete all entries with `position >= input.position` for
    /// the brainstorm, then insert the new entry at that position.
    async fn create_truncating(
        &self,
        input: &CreateHistoryEntry,
    ) -> Result<HistoryEntry, HistoryError>;
}

/// Host-side application of history commands.
///
/// The host updates both its local state and the persisted brainstorm
/// record; the log itself never writes the brainstorm.
#[async_trait]
pub trait HistoryApplier: Send + Sync {
    async fn apply(&self, command: HistoryCommand) -> Result<(), HistoryError>;
}

// Shared collaborators are the common case (a pool-backed store lives in
// application state), so both traits pass through `Arc`.
#[async_trait]
impl<T: HistoryStore + ?Sized> HistoryStore for std::sync::Arc<T> {
    async fn list_recent(
        &self,
        brainstorm_id: DbId,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        (**self).list_recent(brainstorm_id, limit).await
    }

    async fn create_truncating(
        &self,
        input: &CreateHistoryEntry,
    ) -> Result<HistoryEntry, HistoryError> {
        (**self).create_truncating(input).await
    }
}

#[async_trait]
impl<T: HistoryApplier + ?Sized> HistoryApplier for std::sync::Arc<T> {
    async fn apply(&self, command: HistoryCommand) -> Result<(), HistoryError> {
        (**self).apply(command).await
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a logical field name: non-empty, bounded length.
pub fn validate_field_name(field_name: &str) -> Result<(), HistoryError> {
    if field_name.trim().is_empty() {
        return Err(HistoryError::Validation(
            "field_name must not be empty".to_string(),
        ));
    }
    if field_name.len() > MAX_FIELD_NAME_LEN {
        return Err(HistoryError::Validation(format!(
            "field_name exceeds {MAX_FIELD_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that a history position is non-negative.
pub fn validate_position(position: i32) -> Result<(), HistoryError> {
    if position < 0 {
        return Err(HistoryError::Validation(
            "position must be non-negative".to_string(),
        ));
    }
    Ok(())
}

/// Validate that entry positions form a contiguous ascending run.
///
/// The loaded window need not start at position 0 (older entries beyond
/// the cache limit are simply not loaded), but it must have no gaps.
pub fn validate_contiguity(entries: &[HistoryEntry]) -> Result<(), HistoryError> {
    for pair in entries.windows(2) {
        if pair[1].position != pair[0].position + 1 {
            return Err(HistoryError::Validation(format!(
                "history positions not contiguous: {} followed by {}",
                pair[0].position, pair[1].position
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// History log
// ---------------------------------------------------------------------------

struct LogState {
    entries: Vec<HistoryEntry>,
    /// Index into `entries` of the newest not-undone entry; `-1` means
    /// everything is undone (or the log is empty). Always satisfies
    /// `-1 <= pointer <= entries.len() - 1`.
    pointer: isize,
}

/// A per-brainstorm history log instance.
///
/// Owned by a single workspace; multiple workspaces each own their own
/// log. Construct one only once the brainstorm exists and the acting user
/// is known.
pub struct HistoryLog<S, A> {
    brainstorm_id: DbId,
    actor_id: DbId,
    store: S,
    applier: A,
    state: Mutex<LogState>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when an undo/redo finishes, on every path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: HistoryStore, A: HistoryApplier> HistoryLog<S, A> {
    /// Load the most recent [`MAX_LOADED_ENTRIES`] entries for the
    /// brainstorm and point at the newest one (nothing undone yet).
    pub async fn load(
        brainstorm_id: DbId,
        actor_id: DbId,
        store: S,
        applier: A,
    ) -> Result<Self, HistoryError> {
        let entries = store.list_recent(brainstorm_id, MAX_LOADED_ENTRIES).await?;
        validate_contiguity(&entries)?;
        let pointer = entries.len() as isize - 1;
        Ok(Self {
            brainstorm_id,
            actor_id,
            store,
            applier,
            state: Mutex::new(LogState { entries, pointer }),
            in_flight: AtomicBool::new(false),
        })
    }

    fn state(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether there is an entry to undo.
    pub fn can_undo(&self) -> bool {
        self.state().pointer >= 0
    }

    /// Whether there is an entry to redo.
    pub fn can_redo(&self) -> bool {
        let state = self.state();
        state.pointer < state.entries.len() as isize - 1
    }

    /// Current pointer value (`-1` = before the first loaded entry).
    pub fn pointer(&self) -> isize {
        self.state().pointer
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    /// Record a committed field edit.
    ///
    /// Discards any redo branch: entries at or beyond the new position are
    /// deleted from the store (in the same transaction as the insert) and
    /// dropped from the cache. On success the pointer lands on the new
    /// entry. A store failure leaves cache and pointer untouched.
    pub async fn push_entry(
        &self,
        field_name: &str,
        old_value: Option<String>,
        new_value: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> Result<HistoryEntry, HistoryError> {
        validate_field_name(field_name)?;

        // Positions are absolute; the cache window may not start at 0 once
        // more than MAX_LOADED_ENTRIES exist.
        let (cut, new_position) = {
            let state = self.state();
            let base = state.entries.first().map(|e| e.position).unwrap_or(0);
            let cut = (state.pointer + 1) as usize;
            (cut, base + cut as i32)
        };

        let created = self
            .store
            .create_truncating(&CreateHistoryEntry {
                brainstorm_id: self.brainstorm_id,
                actor_id: self.actor_id,
                field_name: field_name.to_string(),
                old_value,
                new_value,
                metadata,
                position: new_position,
            })
            .await?;

        let mut state = self.state();
        state.entries.truncate(cut);
        state.entries.push(created.clone());
        state.pointer = state.entries.len() as isize - 1;
        Ok(created)
    }

    /// Revert the entry at the pointer and step the pointer back.
    ///
    /// Persistence of the reverted value is entirely the applier's
    /// responsibility; the log only moves its pointer. If the applier
    /// fails, the pointer does not move.
    pub async fn undo(&self) -> Result<StepOutcome, HistoryError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Ok(StepOutcome::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let entry = {
            let state = self.state();
            if state.pointer < 0 {
                return Ok(StepOutcome::Exhausted);
            }
            state.entries[state.pointer as usize].clone()
        };

        self.applier
            .apply(HistoryCommand::FieldSet {
                field_name: entry.field_name.clone(),
                value: entry.old_value.clone(),
                metadata: entry.metadata.clone(),
            })
            .await?;

        self.state().pointer -= 1;
        Ok(StepOutcome::Applied {
            field_name: entry.field_name,
        })
    }

    /// Reapply the entry just past the pointer and step the pointer forward.
    pub async fn redo(&self) -> Result<StepOutcome, HistoryError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Ok(StepOutcome::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let entry = {
            let state = self.state();
            if state.pointer >= state.entries.len() as isize - 1 {
                return Ok(StepOutcome::Exhausted);
            }
            state.entries[(state.pointer + 1) as usize].clone()
        };

        self.applier
            .apply(HistoryCommand::FieldSet {
                field_name: entry.field_name.clone(),
                value: entry.new_value.clone(),
                metadata: entry.metadata.clone(),
            })
            .await?;

        self.state().pointer += 1;
        Ok(StepOutcome::Applied {
            field_name: entry.field_name,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
