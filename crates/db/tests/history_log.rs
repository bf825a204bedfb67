//! Integration tests for the brainstorm history log against a real
//! database: position contiguity, branch truncation, the bounded cache
//! window, and the full engine round-trip through `PgHistoryStore`.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use ideaforge_core::history::StepOutcome;
use ideaforge_core::{HistoryApplier, HistoryCommand, HistoryError, HistoryLog};
use ideaforge_db::models::brainstorm::CreateBrainstorm;
use ideaforge_db::models::history_entry::CreateHistoryEntry;
use ideaforge_db::repositories::{BrainstormRepo, HistoryEntryRepo};
use ideaforge_db::PgHistoryStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_brainstorm(title: &str) -> CreateBrainstorm {
    CreateBrainstorm {
        title: title.to_string(),
        compiled_description: None,
        bullet_breakdown: None,
        stage: None,
        created_by_id: 1,
    }
}

fn new_entry(field_name: &str, old: Option<&str>, new: Option<&str>, position: i32) -> CreateHistoryEntry {
    CreateHistoryEntry {
        actor_id: 1,
        field_name: field_name.to_string(),
        old_value: old.map(str::to_string),
        new_value: new.map(str::to_string),
        metadata: None,
        position,
    }
}

/// Records every command the history log applies.
#[derive(Default)]
struct RecordingApplier {
    commands: Mutex<Vec<HistoryCommand>>,
}

#[async_trait]
impl HistoryApplier for RecordingApplier {
    async fn apply(&self, command: HistoryCommand) -> Result<(), HistoryError> {
        self.commands.lock().unwrap().push(command);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Repository-level tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_recent_empty(pool: PgPool) {
    let brainstorm = BrainstormRepo::create(&pool, &new_brainstorm("Empty"))
        .await
        .unwrap();
    let entries = HistoryEntryRepo::list_recent(&pool, brainstorm.id, 100)
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entries_come_back_ascending_by_position(pool: PgPool) {
    let brainstorm = BrainstormRepo::create(&pool, &new_brainstorm("Ordering"))
        .await
        .unwrap();
    for pos in 0..4 {
        HistoryEntryRepo::create_truncating(
            &pool,
            brainstorm.id,
            &new_entry("compiled_description", None, Some("v"), pos),
        )
        .await
        .unwrap();
    }

    let entries = HistoryEntryRepo::list_recent(&pool, brainstorm.id, 100)
        .await
        .unwrap();
    let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_recent_returns_newest_window_ascending(pool: PgPool) {
    let brainstorm = BrainstormRepo::create(&pool, &new_brainstorm("Window"))
        .await
        .unwrap();
    for pos in 0..5 {
        HistoryEntryRepo::create_truncating(
            &pool,
            brainstorm.id,
            &new_entry("compiled_description", None, Some("v"), pos),
        )
        .await
        .unwrap();
    }

    let entries = HistoryEntryRepo::list_recent(&pool, brainstorm.id, 3)
        .await
        .unwrap();
    let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![2, 3, 4], "newest 3, ascending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn truncating_insert_removes_redo_suffix(pool: PgPool) {
    let brainstorm = BrainstormRepo::create(&pool, &new_brainstorm("Truncate"))
        .await
        .unwrap();
    for pos in 0..3 {
        HistoryEntryRepo::create_truncating(
            &pool,
            brainstorm.id,
            &new_entry("bullet_breakdown", None, Some("v"), pos),
        )
        .await
        .unwrap();
    }

    // A new edit at position 1 discards positions 1 and 2.
    HistoryEntryRepo::create_truncating(
        &pool,
        brainstorm.id,
        &new_entry("bullet_breakdown", Some("v"), Some("w"), 1),
    )
    .await
    .unwrap();

    let entries = HistoryEntryRepo::list_recent(&pool, brainstorm.id, 100)
        .await
        .unwrap();
    let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![0, 1], "no gaps after truncation");
    assert_eq!(entries[1].new_value.as_deref(), Some("w"));
    assert_eq!(
        HistoryEntryRepo::count_for_brainstorm(&pool, brainstorm.id)
            .await
            .unwrap(),
        2
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_position_violates_unique_constraint(pool: PgPool) {
    let brainstorm = BrainstormRepo::create(&pool, &new_brainstorm("Unique"))
        .await
        .unwrap();
    HistoryEntryRepo::create_truncating(
        &pool,
        brainstorm.id,
        &new_entry("title", None, Some("a"), 0),
    )
    .await
    .unwrap();

    // Bypass the truncating path to force a duplicate position.
    let result = sqlx::query(
        "INSERT INTO brainstorm_history \
            (brainstorm_id, actor_id, field_name, position) \
         VALUES ($1, 1, 'title', 0)",
    )
    .bind(brainstorm.id)
    .execute(&pool)
    .await;

    let err = result.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(
        db_err.constraint(),
        Some("uq_brainstorm_history_position")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_from_position_removes_suffix_only(pool: PgPool) {
    let brainstorm = BrainstormRepo::create(&pool, &new_brainstorm("Suffix"))
        .await
        .unwrap();
    for pos in 0..4 {
        HistoryEntryRepo::create_truncating(
            &pool,
            brainstorm.id,
            &new_entry("title", None, Some("v"), pos),
        )
        .await
        .unwrap();
    }

    let removed = HistoryEntryRepo::delete_from_position(&pool, brainstorm.id, 2)
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let entries = HistoryEntryRepo::list_recent(&pool, brainstorm.id, 100)
        .await
        .unwrap();
    let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_brainstorm_cascades_to_history(pool: PgPool) {
    let brainstorm = BrainstormRepo::create(&pool, &new_brainstorm("Cascade"))
        .await
        .unwrap();
    HistoryEntryRepo::create_truncating(
        &pool,
        brainstorm.id,
        &new_entry("title", None, Some("a"), 0),
    )
    .await
    .unwrap();

    assert!(BrainstormRepo::delete(&pool, brainstorm.id).await.unwrap());

    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM brainstorm_history WHERE brainstorm_id = $1")
            .bind(brainstorm.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count.0, 0, "history rows should cascade");
}

// ---------------------------------------------------------------------------
// Engine round-trip through the real store
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_log_round_trip_against_postgres(pool: PgPool) {
    let brainstorm = BrainstormRepo::create(&pool, &new_brainstorm("Round trip"))
        .await
        .unwrap();
    let applier = Arc::new(RecordingApplier::default());
    let log = HistoryLog::load(
        brainstorm.id,
        1,
        PgHistoryStore::new(pool.clone()),
        Arc::clone(&applier),
    )
    .await
    .unwrap();

    log.push_entry("compiled_description", None, Some("draft one".into()), None)
        .await
        .unwrap();
    log.push_entry(
        "compiled_description",
        Some("draft one".into()),
        Some("draft two".into()),
        None,
    )
    .await
    .unwrap();

    assert_matches!(log.undo().await.unwrap(), StepOutcome::Applied { .. });
    // A fresh edit from pointer 0 truncates the redo branch in Postgres.
    log.push_entry(
        "compiled_description",
        Some("draft one".into()),
        Some("draft three".into()),
        None,
    )
    .await
    .unwrap();

    let entries = HistoryEntryRepo::list_recent(&pool, brainstorm.id, 100)
        .await
        .unwrap();
    let values: Vec<Option<&str>> = entries.iter().map(|e| e.new_value.as_deref()).collect();
    assert_eq!(values, vec![Some("draft one"), Some("draft three")]);

    // Reloading sees the truncated history with the pointer at the end.
    let reloaded = HistoryLog::load(
        brainstorm.id,
        1,
        PgHistoryStore::new(pool.clone()),
        Arc::new(RecordingApplier::default()),
    )
    .await
    .unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.pointer(), 1);
    assert!(reloaded.can_undo());
    assert!(!reloaded.can_redo());

    let applied = applier.commands.lock().unwrap().clone();
    assert_eq!(applied.len(), 1, "one undo was applied");
    assert_matches!(
        &applied[0],
        HistoryCommand::FieldSet { field_name, value, .. }
            if field_name == "compiled_description" && value.as_deref() == Some("draft one")
    );
}
