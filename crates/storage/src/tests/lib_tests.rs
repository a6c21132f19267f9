use super::*;

async fn memory_storage() -> Storage {
    Storage::new("sqlite::memory:").await.expect("db")
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = memory_storage().await;
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn created_item_gets_server_fields() {
    let storage = memory_storage().await;
    let item = storage
        .create_item(&CreateItemRequest::new("Buy milk", ""))
        .await
        .expect("create");

    assert!(item.id.0 > 0);
    assert_eq!(item.title, "Buy milk");
    assert_eq!(item.description, "");
    assert!(!item.completed);
    assert!(item.created_at.is_some());
    assert_eq!(item.created_at, item.updated_at);

    let loaded = storage.get_item(item.id).await.expect("get");
    assert_eq!(loaded, Some(item));
}

#[tokio::test]
async fn lists_newest_first() {
    let storage = memory_storage().await;
    let first = storage
        .create_item(&CreateItemRequest::new("first", ""))
        .await
        .expect("first");
    let second = storage
        .create_item(&CreateItemRequest::new("second", "more"))
        .await
        .expect("second");

    let ids: Vec<ItemId> = storage
        .list_items()
        .await
        .expect("list")
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn patch_only_touches_present_fields() {
    let storage = memory_storage().await;
    let item = storage
        .create_item(&CreateItemRequest::new("title", "desc"))
        .await
        .expect("create");

    let toggled = storage
        .update_item(item.id, &ItemPatch::completed(true))
        .await
        .expect("update")
        .expect("exists");
    assert!(toggled.completed);
    assert_eq!(toggled.title, "title");
    assert_eq!(toggled.description, "desc");
    assert_eq!(toggled.created_at, item.created_at);

    let edited = storage
        .update_item(item.id, &ItemPatch::fields("renamed", ""))
        .await
        .expect("update")
        .expect("exists");
    assert!(edited.completed);
    assert_eq!(edited.title, "renamed");
    assert_eq!(edited.description, "");
}

#[tokio::test]
async fn update_and_delete_report_missing_rows() {
    let storage = memory_storage().await;
    let missing = ItemId(404);

    assert!(storage
        .update_item(missing, &ItemPatch::completed(true))
        .await
        .expect("update")
        .is_none());
    assert!(!storage.delete_item(missing).await.expect("delete"));
    assert!(storage.get_item(missing).await.expect("get").is_none());
}

#[tokio::test]
async fn delete_removes_item_from_listing() {
    let storage = memory_storage().await;
    let keep = storage
        .create_item(&CreateItemRequest::new("keep", ""))
        .await
        .expect("keep");
    let removed = storage
        .create_item(&CreateItemRequest::new("removed", ""))
        .await
        .expect("removed");

    assert!(storage.delete_item(removed.id).await.expect("delete"));

    let items = storage.list_items().await.expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, keep.id);
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("items.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage
        .create_item(&CreateItemRequest::new("persisted", ""))
        .await
        .expect("create");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let items = reopened.list_items().await.expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "persisted");
}

#[test]
fn memory_urls_have_no_filesystem_path() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert!(sqlite_path("postgres://localhost/items").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/items.db?mode=rwc"),
        Some(PathBuf::from("./data/items.db"))
    );
}
