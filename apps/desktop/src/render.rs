//! Plain-text rendering of [`AppState`].

use std::fmt::Write as _;

use client_core::AppState;
use shared::domain::Item;

pub const CONNECTED_BADGE: &str = "API Connected";
pub const CONNECTING_BADGE: &str = "Connecting...";

pub fn badge(connected: bool) -> &'static str {
    if connected {
        CONNECTED_BADGE
    } else {
        CONNECTING_BADGE
    }
}

pub fn item_line(item: &Item) -> String {
    let check = if item.completed { 'x' } else { ' ' };
    let mut line = format!("[{check}] #{:<4} {}", item.id.0, item.title);
    if !item.description.is_empty() {
        let _ = write!(line, " - {}", item.description);
    }
    line
}

pub fn render(state: &AppState) -> String {
    let mut out = format!("[{}]\n", badge(state.connected));
    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {}", error.message());
    }
    if state.loading {
        out.push_str("Loading...\n");
    } else if state.items.is_empty() {
        out.push_str("No items yet.\n");
    }
    for item in &state.items {
        out.push_str(&item_line(item));
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
