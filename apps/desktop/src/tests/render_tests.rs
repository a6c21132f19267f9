use super::*;
use client_core::UiError;
use shared::domain::ItemId;

#[test]
fn badge_reflects_connectivity() {
    assert_eq!(badge(true), "API Connected");
    assert_eq!(badge(false), "Connecting...");
}

#[test]
fn item_lines_show_completion_box() {
    let open = Item::new(ItemId(1), "Buy milk", "");
    let done = Item {
        completed: true,
        ..Item::new(ItemId(12), "Walk dog", "twice")
    };

    assert_eq!(item_line(&open), "[ ] #1    Buy milk");
    assert_eq!(item_line(&done), "[x] #12   Walk dog - twice");
}

#[test]
fn empty_list_has_placeholder() {
    let state = AppState {
        loading: false,
        ..AppState::default()
    };
    assert_eq!(render(&state), "[Connecting...]\nNo items yet.\n");
}

#[test]
fn fresh_state_renders_as_loading() {
    assert_eq!(render(&AppState::default()), "[Connecting...]\nLoading...\n");
}

#[test]
fn error_banner_precedes_items() {
    let state = AppState {
        connected: true,
        error: Some(UiError::delete()),
        items: vec![Item::new(ItemId(1), "Buy milk", "")],
        loading: false,
        ..AppState::default()
    };
    let out = render(&state);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec!["[API Connected]", "Error: Failed to delete item.", "[ ] #1    Buy milk"]
    );
}

#[test]
fn loading_indicator_replaces_placeholder() {
    let state = AppState {
        loading: true,
        ..AppState::default()
    };
    let out = render(&state);
    assert!(out.contains("Loading..."));
    assert!(!out.contains("No items yet."));
}
