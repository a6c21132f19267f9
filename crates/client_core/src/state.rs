//! Application state owned by the item store controller.

use shared::domain::{Item, ItemId};

pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch items. Make sure the backend is running.";
pub const SAVE_ERROR_MESSAGE: &str = "Failed to save item.";
pub const UPDATE_ERROR_MESSAGE: &str = "Failed to update item.";
pub const DELETE_ERROR_MESSAGE: &str = "Failed to delete item.";

/// Which operation produced the error currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Fetch,
    Save,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn fetch() -> Self {
        Self::new(UiErrorContext::Fetch, FETCH_ERROR_MESSAGE)
    }

    pub fn save() -> Self {
        Self::new(UiErrorContext::Save, SAVE_ERROR_MESSAGE)
    }

    /// Completion toggles fail into the save slot with their own wording.
    pub fn update() -> Self {
        Self::new(UiErrorContext::Save, UPDATE_ERROR_MESSAGE)
    }

    pub fn delete() -> Self {
        Self::new(UiErrorContext::Delete, DELETE_ERROR_MESSAGE)
    }

    fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Editable copy of an item's user-facing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub title: String,
    pub description: String,
}

impl FormDraft {
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Closed,
    Open {
        /// `None` while creating a new item.
        editing: Option<ItemId>,
        draft: FormDraft,
    },
}

impl EditorState {
    pub fn is_open(&self) -> bool {
        matches!(self, EditorState::Open { .. })
    }

    pub fn draft(&self) -> Option<&FormDraft> {
        match self {
            EditorState::Open { draft, .. } => Some(draft),
            EditorState::Closed => None,
        }
    }

    pub fn editing(&self) -> Option<ItemId> {
        match self {
            EditorState::Open { editing, .. } => *editing,
            EditorState::Closed => None,
        }
    }
}

/// Everything the front-end renders. Replaced wholesale on every reducer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub items: Vec<Item>,
    pub loading: bool,
    pub error: Option<UiError>,
    pub connected: bool,
    pub editor: EditorState,
}

/// Busy until the first list fetch answers.
impl Default for AppState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            connected: false,
            editor: EditorState::Closed,
        }
    }
}

impl AppState {
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}
