//! Integration tests for the link store and click log
//!
//! Tests can be filtered by database backend using the DATABASE_BACKEND environment variable:
//! - `DATABASE_BACKEND=sqlite cargo test` - Run only SQLite tests
//! - `DATABASE_BACKEND=postgres cargo test` - Run only PostgreSQL tests (needs DATABASE_URL)
//! - By default, both backends are tested

use smartlink::models::NewClick;
use smartlink::storage::{PostgresStorage, SqliteStorage, Storage, StorageError};
use std::sync::Arc;

/// Get the database backend to test from environment variable
fn should_test_backend(backend: &str) -> bool {
    match std::env::var("DATABASE_BACKEND") {
        Ok(val) => val.to_lowercase() == backend.to_lowercase(),
        Err(_) => true, // Test all backends if not specified
    }
}

/// Helper to create SQLite test storage
async fn create_sqlite_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Helper to create PostgreSQL test storage
async fn create_postgres_storage() -> Option<Arc<dyn Storage>> {
    let db_url = std::env::var("DATABASE_URL").ok()?;
    if !db_url.starts_with("postgres") {
        return None;
    }
    let storage = PostgresStorage::new(&db_url, 5).await.ok()?;
    storage.init().await.ok()?;
    Some(Arc::new(storage))
}

/// Slug unique per test run so a shared Postgres database can be reused
fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", smartlink::links::generate_slug(10))
}

async fn check_create_and_get(storage: Arc<dyn Storage>) {
    let slug = unique("get");
    let created = storage
        .create_link(&slug, "https://example.com/a?t=90", 100, Some(200))
        .await
        .unwrap();

    assert_eq!(created.slug, slug);
    assert_eq!(created.destination_url, "https://example.com/a?t=90");
    assert_eq!(created.created_at, 100);
    assert_eq!(created.expires_at, Some(200));

    let fetched = storage.get_link(&slug).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    assert!(storage.get_link(&unique("missing")).await.unwrap().is_none());
}

async fn check_duplicate_slug_conflicts(storage: Arc<dyn Storage>) {
    let slug = unique("dup");
    storage
        .create_link(&slug, "https://example.com/first", 1, None)
        .await
        .unwrap();

    let result = storage
        .create_link(&slug, "https://example.com/second", 2, None)
        .await;
    assert!(matches!(result, Err(StorageError::Conflict)));

    // The existing mapping is untouched
    let link = storage.get_link(&slug).await.unwrap().unwrap();
    assert_eq!(link.destination_url, "https://example.com/first");
}

async fn check_recent_clicks_order_and_limit(storage: Arc<dyn Storage>) {
    let slug = unique("clicks");
    for ts in [5, 1, 3, 4, 2] {
        storage
            .record_click(&NewClick::new(&slug, Some("10.0.0.1"), Some("ua"), ts))
            .await
            .unwrap();
    }

    let clicks = storage.recent_clicks(&slug, 3).await.unwrap();
    let timestamps: Vec<i64> = clicks.iter().map(|c| c.timestamp).collect();
    assert_eq!(timestamps, vec![5, 4, 3]);
    assert_eq!(storage.click_count(&slug).await.unwrap(), 5);
}

#[tokio::test]
async fn test_create_and_get_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    check_create_and_get(create_sqlite_storage().await).await;
}

#[tokio::test]
async fn test_create_and_get_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    if let Some(storage) = create_postgres_storage().await {
        check_create_and_get(storage).await;
    }
}

#[tokio::test]
async fn test_duplicate_slug_conflicts_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    check_duplicate_slug_conflicts(create_sqlite_storage().await).await;
}

#[tokio::test]
async fn test_duplicate_slug_conflicts_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    if let Some(storage) = create_postgres_storage().await {
        check_duplicate_slug_conflicts(storage).await;
    }
}

#[tokio::test]
async fn test_recent_clicks_order_and_limit_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }
    check_recent_clicks_order_and_limit(create_sqlite_storage().await).await;
}

#[tokio::test]
async fn test_recent_clicks_order_and_limit_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    if let Some(storage) = create_postgres_storage().await {
        check_recent_clicks_order_and_limit(storage).await;
    }
}

#[tokio::test]
async fn test_concurrent_link_creation_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    // Test that concurrent creation of the same slug lets exactly one through
    let storage = create_sqlite_storage().await;

    let mut handles = vec![];
    for i in 0..10 {
        let storage_clone = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            storage_clone
                .create_link("same_slug", &format!("https://example.com/{i}"), i, None)
                .await
        }));
    }

    let mut success_count = 0;
    let mut conflict_count = 0;

    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => success_count += 1,
            Err(StorageError::Conflict) => conflict_count += 1,
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    assert_eq!(success_count, 1, "Exactly one creation should succeed");
    assert_eq!(conflict_count, 9, "All others should get conflict");
}

#[tokio::test]
async fn test_clicks_for_unknown_slug_are_tolerated_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;
    storage
        .record_click(&NewClick::new("dangling", None, None, 1))
        .await
        .unwrap();

    assert_eq!(storage.click_count("dangling").await.unwrap(), 1);
    assert!(storage.get_link("dangling").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_links_newest_first_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;
    for (slug, ts) in [("first", 1), ("second", 2), ("third", 3)] {
        storage
            .create_link(slug, "https://example.com", ts, None)
            .await
            .unwrap();
    }

    let links = storage.list_links(2, 0).await.unwrap();
    let slugs: Vec<&str> = links.iter().map(|l| l.slug.as_str()).collect();
    assert_eq!(slugs, vec!["third", "second"]);

    let rest = storage.list_links(2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].slug, "first");
}
