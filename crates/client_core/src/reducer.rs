//! Pure state transitions for the item store.
//!
//! `reduce` never performs I/O. Network work is returned as [`BackendCommand`]s
//! and its outcome comes back later as another [`UiEvent`]. Every successful
//! mutation answers with [`BackendCommand::FetchItems`]: the server list is the
//! only source of truth and is never patched locally.

use shared::protocol::{CreateItemRequest, ItemPatch};
use tracing::{debug, info, warn};

use crate::{
    events::{BackendCommand, UiEvent},
    state::{AppState, EditorState, FormDraft, UiError},
};

pub fn reduce(mut state: AppState, event: UiEvent) -> (AppState, Vec<BackendCommand>) {
    let mut commands = Vec::new();

    match event {
        UiEvent::LoadRequested => {
            state.loading = true;
            commands.push(BackendCommand::FetchItems);
        }
        UiEvent::ItemsLoaded(Ok(items)) => {
            state.items = items;
            state.error = None;
            state.loading = false;
        }
        UiEvent::ItemsLoaded(Err(error)) => {
            warn!(%error, "failed to fetch items");
            state.error = Some(UiError::fetch());
            state.loading = false;
        }
        UiEvent::OpenNew => {
            state.editor = EditorState::Open {
                editing: None,
                draft: FormDraft::default(),
            };
        }
        UiEvent::OpenEdit(item) => {
            state.editor = EditorState::Open {
                editing: Some(item.id),
                draft: FormDraft::from_item(&item),
            };
        }
        UiEvent::DraftTitleChanged(title) => match &mut state.editor {
            EditorState::Open { draft, .. } => draft.title = title,
            EditorState::Closed => debug!("ignoring title edit while editor is closed"),
        },
        UiEvent::DraftDescriptionChanged(description) => match &mut state.editor {
            EditorState::Open { draft, .. } => draft.description = description,
            EditorState::Closed => debug!("ignoring description edit while editor is closed"),
        },
        UiEvent::CancelEdit => {
            state.editor = EditorState::Closed;
        }
        UiEvent::Submit => match &state.editor {
            EditorState::Closed => debug!("ignoring submit while editor is closed"),
            EditorState::Open { draft, .. } if !draft.has_title() => {
                debug!("title is required; submit not sent");
            }
            EditorState::Open {
                editing: Some(id),
                draft,
            } => commands.push(BackendCommand::UpdateItem {
                id: *id,
                patch: ItemPatch::fields(draft.title.clone(), draft.description.clone()),
            }),
            EditorState::Open {
                editing: None,
                draft,
            } => commands.push(BackendCommand::CreateItem(CreateItemRequest::new(
                draft.title.clone(),
                draft.description.clone(),
            ))),
        },
        UiEvent::SaveFinished(Ok(item)) => {
            info!(item_id = item.id.0, "item saved");
            state.editor = EditorState::Closed;
            state.loading = true;
            commands.push(BackendCommand::FetchItems);
        }
        UiEvent::SaveFinished(Err(error)) => {
            warn!(%error, "failed to save item");
            state.error = Some(UiError::save());
        }
        UiEvent::ToggleCompletion(id) => match state.item(id) {
            Some(item) => commands.push(BackendCommand::ToggleCompleted {
                id,
                completed: !item.completed,
            }),
            None => debug!(item_id = id.0, "ignoring toggle for unknown item"),
        },
        UiEvent::ToggleFinished { id, result: Ok(_) } => {
            debug!(item_id = id.0, "completion toggled");
            state.loading = true;
            commands.push(BackendCommand::FetchItems);
        }
        UiEvent::ToggleFinished {
            id,
            result: Err(error),
        } => {
            warn!(item_id = id.0, %error, "failed to toggle completion");
            state.error = Some(UiError::update());
        }
        UiEvent::DeleteRequested {
            id,
            confirmed: false,
        } => {
            debug!(item_id = id.0, "delete not confirmed");
        }
        UiEvent::DeleteRequested {
            id,
            confirmed: true,
        } => commands.push(BackendCommand::DeleteItem { id }),
        UiEvent::DeleteFinished { id, result: Ok(()) } => {
            info!(item_id = id.0, "item deleted");
            state.loading = true;
            commands.push(BackendCommand::FetchItems);
        }
        UiEvent::DeleteFinished {
            id,
            result: Err(error),
        } => {
            warn!(item_id = id.0, %error, "failed to delete item");
            state.error = Some(UiError::delete());
        }
        UiEvent::HealthChecked { reachable } => {
            if state.connected != reachable {
                info!(reachable, "backend connectivity changed");
            }
            state.connected = reachable;
        }
    }

    (state, commands)
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
