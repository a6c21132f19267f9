use super::*;
use crate::{
    api::HttpItemsApi,
    config::ClientSettings,
    mock_backend::{spawn_backend, MockBackend},
    state::{EditorState, UiErrorContext, FETCH_ERROR_MESSAGE},
};
use shared::domain::{Item, ItemId};

fn item(id: i64, title: &str, description: &str, completed: bool) -> Item {
    Item {
        completed,
        ..Item::new(ItemId(id), title, description)
    }
}

async fn controller_for(backend: &MockBackend) -> ItemStoreController {
    let api = HttpItemsApi::new(&backend.base_url).expect("api");
    let controller = ItemStoreController::spawn(Arc::new(api));
    controller.dispatch_and_settle(UiEvent::LoadRequested).await;
    controller
}

async fn submit_new(controller: &ItemStoreController, title: &str, description: &str) -> AppState {
    controller.dispatch(UiEvent::OpenNew);
    controller.dispatch(UiEvent::DraftTitleChanged(title.to_string()));
    controller.dispatch(UiEvent::DraftDescriptionChanged(description.to_string()));
    controller.dispatch_and_settle(UiEvent::Submit).await
}

#[tokio::test]
async fn first_render_is_busy_until_list_arrives() {
    let backend = spawn_backend().await;
    let api = HttpItemsApi::new(&backend.base_url).expect("api");
    let controller = ItemStoreController::spawn(Arc::new(api));
    assert!(controller.snapshot().loading);

    let state = controller.dispatch_and_settle(UiEvent::LoadRequested).await;
    assert!(!state.loading);
}

#[tokio::test]
async fn load_mirrors_server_list_in_order() {
    let backend = spawn_backend().await;
    let served = vec![
        item(3, "third", "", false),
        item(1, "first", "x", true),
        item(2, "second", "", false),
    ];
    backend.seed(served.clone()).await;

    let controller = controller_for(&backend).await;
    let state = controller.snapshot();
    assert_eq!(state.items, served);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn creating_buy_milk_shows_one_unchecked_entry() {
    let backend = spawn_backend().await;
    let controller = controller_for(&backend).await;

    let state = submit_new(&controller, "Buy milk", "").await;

    assert_eq!(state.items, vec![item(1, "Buy milk", "", false)]);
    assert_eq!(state.editor, EditorState::Closed);
    assert!(!state.loading);
    assert_eq!(backend.count("GET", "/api/items/").await, 2);
    assert_eq!(backend.count("POST", "/api/items/").await, 1);
}

#[tokio::test]
async fn created_item_appears_exactly_once_among_existing() {
    let backend = spawn_backend().await;
    backend.seed(vec![item(1, "old", "", true)]).await;
    let controller = controller_for(&backend).await;

    let state = submit_new(&controller, "new", "details").await;

    let matches: Vec<&Item> = state.items.iter().filter(|i| i.title == "new").collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, ItemId(2));
    assert_eq!(state.items.len(), 2);
}

#[tokio::test]
async fn editing_changes_only_the_edited_fields() {
    let backend = spawn_backend().await;
    backend.seed(vec![item(1, "Buy milk", "2 litres", true)]).await;
    let controller = controller_for(&backend).await;

    let existing = controller.snapshot().items[0].clone();
    controller.dispatch(UiEvent::OpenEdit(existing));
    controller.dispatch(UiEvent::DraftTitleChanged("Buy oat milk".to_string()));
    let state = controller.dispatch_and_settle(UiEvent::Submit).await;

    assert_eq!(state.items, vec![item(1, "Buy oat milk", "2 litres", true)]);
    assert_eq!(state.editor, EditorState::Closed);

    let patch = backend
        .item_requests()
        .await
        .into_iter()
        .find(|req| req.method == "PATCH")
        .expect("patch request");
    assert_eq!(patch.path, "/api/items/1/");
    assert_eq!(
        patch.body,
        Some(serde_json::json!({ "title": "Buy oat milk", "description": "2 litres" }))
    );
}

#[tokio::test]
async fn toggling_twice_restores_completion() {
    let backend = spawn_backend().await;
    backend.seed(vec![item(1, "Buy milk", "", false)]).await;
    let controller = controller_for(&backend).await;

    let state = controller
        .dispatch_and_settle(UiEvent::ToggleCompletion(ItemId(1)))
        .await;
    assert!(state.items[0].completed);

    let patch = backend
        .item_requests()
        .await
        .into_iter()
        .find(|req| req.method == "PATCH")
        .expect("patch request");
    assert_eq!(patch.body, Some(serde_json::json!({ "completed": true })));

    let state = controller
        .dispatch_and_settle(UiEvent::ToggleCompletion(ItemId(1)))
        .await;
    assert_eq!(state.items, vec![item(1, "Buy milk", "", false)]);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let backend = spawn_backend().await;
    backend.seed(vec![item(1, "Buy milk", "", false)]).await;
    let controller = controller_for(&backend).await;

    let state = controller
        .dispatch_and_settle(UiEvent::DeleteRequested {
            id: ItemId(1),
            confirmed: false,
        })
        .await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(backend.count("DELETE", "/api/items/1/").await, 0);

    let state = controller
        .dispatch_and_settle(UiEvent::DeleteRequested {
            id: ItemId(1),
            confirmed: true,
        })
        .await;
    assert!(state.items.iter().all(|i| i.id != ItemId(1)));
    assert_eq!(backend.count("DELETE", "/api/items/1/").await, 1);
}

#[tokio::test]
async fn failed_fetch_reports_error_and_clears_busy_flag() {
    let backend = spawn_backend().await;
    backend.seed(vec![item(1, "a", "", false)]).await;
    let controller = controller_for(&backend).await;

    backend.state.lock().await.fail_list = true;
    let state = controller.dispatch_and_settle(UiEvent::LoadRequested).await;

    assert!(!state.loading);
    assert_eq!(
        state.error.as_ref().map(|e| e.message()),
        Some(FETCH_ERROR_MESSAGE)
    );
    assert_eq!(state.items.len(), 1, "previous list is kept");

    backend.state.lock().await.fail_list = false;
    let state = controller.dispatch_and_settle(UiEvent::LoadRequested).await;
    assert!(state.error.is_none());
}

#[tokio::test]
async fn failed_save_keeps_editor_open_until_retry_succeeds() {
    let backend = spawn_backend().await;
    let controller = controller_for(&backend).await;

    backend.state.lock().await.fail_saves = true;
    let state = submit_new(&controller, "Buy milk", "").await;
    assert!(state.editor.is_open());
    assert_eq!(
        state.error.as_ref().map(|e| e.context()),
        Some(UiErrorContext::Save)
    );
    assert!(state.items.is_empty());

    backend.state.lock().await.fail_saves = false;
    let state = controller.dispatch_and_settle(UiEvent::Submit).await;
    assert_eq!(state.editor, EditorState::Closed);
    assert!(state.error.is_none(), "reload after save clears the banner");
    assert_eq!(state.items.len(), 1);
}

#[tokio::test]
async fn failed_delete_sets_delete_error() {
    let backend = spawn_backend().await;
    backend.seed(vec![item(1, "a", "", false)]).await;
    let controller = controller_for(&backend).await;

    backend.state.lock().await.fail_deletes = true;
    let state = controller
        .dispatch_and_settle(UiEvent::DeleteRequested {
            id: ItemId(1),
            confirmed: true,
        })
        .await;
    assert_eq!(
        state.error.as_ref().map(|e| e.context()),
        Some(UiErrorContext::Delete)
    );
    assert_eq!(state.items.len(), 1);
}

#[tokio::test]
async fn health_timeout_marks_disconnected_without_touching_items() {
    let backend = spawn_backend().await;
    backend.seed(vec![item(1, "Buy milk", "", false)]).await;
    let api = HttpItemsApi::from_settings(&ClientSettings {
        api_url: backend.base_url.clone(),
        health_timeout: Duration::from_millis(100),
        ..ClientSettings::default()
    })
    .expect("api");
    let controller = ItemStoreController::spawn(Arc::new(api));
    controller.dispatch_and_settle(UiEvent::LoadRequested).await;
    let items_before = controller.snapshot().items;

    let _monitor = controller.start_health_monitor(Duration::from_millis(50));
    let mut states = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(5), states.wait_for(|s| s.connected))
        .await
        .expect("connected in time")
        .expect("controller alive");

    backend.state.lock().await.health_delay = Some(Duration::from_secs(2));
    tokio::time::timeout(Duration::from_secs(5), states.wait_for(|s| !s.connected))
        .await
        .expect("disconnected in time")
        .expect("controller alive");

    let state = controller.snapshot();
    assert_eq!(state.items, items_before);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn settled_returns_immediately_when_idle() {
    let backend = spawn_backend().await;
    let controller = controller_for(&backend).await;
    tokio::time::timeout(Duration::from_secs(1), controller.settled())
        .await
        .expect("idle controller is settled");
}
