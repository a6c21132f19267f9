//! Client-side item store: REST access, application state, and the controller
//! that keeps a local mirror of the server's item collection.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod health;
pub mod reducer;
pub mod state;

pub use api::{HttpItemsApi, ItemsApi};
pub use config::ClientSettings;
pub use controller::{EventSender, ItemStoreController};
pub use error::ClientError;
pub use events::{BackendCommand, UiEvent};
pub use health::HealthMonitor;
pub use reducer::reduce;
pub use state::{AppState, EditorState, FormDraft, UiError, UiErrorContext};

#[cfg(test)]
#[path = "tests/mock_backend.rs"]
mod mock_backend;
