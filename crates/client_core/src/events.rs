//! Inputs to the reducer and the backend commands it asks the controller to run.

use shared::{
    domain::{Item, ItemId},
    protocol::{CreateItemRequest, ItemPatch},
};

use crate::error::ClientError;

#[derive(Debug)]
pub enum UiEvent {
    LoadRequested,
    ItemsLoaded(Result<Vec<Item>, ClientError>),
    OpenNew,
    OpenEdit(Item),
    DraftTitleChanged(String),
    DraftDescriptionChanged(String),
    CancelEdit,
    Submit,
    SaveFinished(Result<Item, ClientError>),
    ToggleCompletion(ItemId),
    ToggleFinished {
        id: ItemId,
        result: Result<Item, ClientError>,
    },
    /// `confirmed` carries the user's answer to the delete prompt.
    DeleteRequested {
        id: ItemId,
        confirmed: bool,
    },
    DeleteFinished {
        id: ItemId,
        result: Result<(), ClientError>,
    },
    HealthChecked {
        reachable: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    FetchItems,
    CreateItem(CreateItemRequest),
    UpdateItem { id: ItemId, patch: ItemPatch },
    ToggleCompleted { id: ItemId, completed: bool },
    DeleteItem { id: ItemId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchItems => "fetch_items",
            BackendCommand::CreateItem(_) => "create_item",
            BackendCommand::UpdateItem { .. } => "update_item",
            BackendCommand::ToggleCompleted { .. } => "toggle_completed",
            BackendCommand::DeleteItem { .. } => "delete_item",
        }
    }
}
