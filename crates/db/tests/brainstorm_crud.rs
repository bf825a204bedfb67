//! Integration tests for brainstorm CRUD operations.

use ideaforge_db::models::brainstorm::{CreateBrainstorm, UpdateBrainstorm};
use ideaforge_db::repositories::BrainstormRepo;
use sqlx::PgPool;

fn new_brainstorm(title: &str) -> CreateBrainstorm {
    CreateBrainstorm {
        title: title.to_string(),
        compiled_description: Some("first pass".to_string()),
        bullet_breakdown: None,
        stage: None,
        created_by_id: 1,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_find(pool: PgPool) {
    let created = BrainstormRepo::create(&pool, &new_brainstorm("Launch plan"))
        .await
        .unwrap();
    assert_eq!(created.title, "Launch plan");
    assert_eq!(created.stage, "brainstorm", "stage defaults");

    let found = BrainstormRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("created brainstorm should be findable");
    assert_eq!(found.compiled_description.as_deref(), Some("first pass"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_missing_returns_none(pool: PgPool) {
    assert!(BrainstormRepo::find_by_id(&pool, 424242)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_keeps_absent_fields(pool: PgPool) {
    let created = BrainstormRepo::create(&pool, &new_brainstorm("Partial"))
        .await
        .unwrap();

    let updated = BrainstormRepo::update(
        &pool,
        created.id,
        &UpdateBrainstorm {
            stage: Some("project".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("row exists");

    assert_eq!(updated.stage, "project");
    assert_eq!(updated.title, "Partial", "title untouched");
    assert_eq!(
        updated.compiled_description.as_deref(),
        Some("first pass"),
        "description untouched"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_orders_by_most_recently_updated(pool: PgPool) {
    let first = BrainstormRepo::create(&pool, &new_brainstorm("First"))
        .await
        .unwrap();
    let _second = BrainstormRepo::create(&pool, &new_brainstorm("Second"))
        .await
        .unwrap();

    // Touch the first so it becomes the most recently updated.
    BrainstormRepo::update(
        &pool,
        first.id,
        &UpdateBrainstorm {
            title: Some("First (edited)".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let listed = BrainstormRepo::list(&pool).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "First (edited)");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_returns_whether_row_existed(pool: PgPool) {
    let created = BrainstormRepo::create(&pool, &new_brainstorm("Doomed"))
        .await
        .unwrap();
    assert!(BrainstormRepo::delete(&pool, created.id).await.unwrap());
    assert!(!BrainstormRepo::delete(&pool, created.id).await.unwrap());
}
