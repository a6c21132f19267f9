//! Interactive loop: keeps the health monitor running and mirrors the
//! backend list between commands.

use anyhow::Result;
use client_core::{AppState, ClientSettings, ItemStoreController, UiEvent};
use shared::domain::ItemId;

use crate::{
    console::Console,
    render::{badge, render},
};

const HELP: &str = "\
Commands:
  list            show the current list
  reload          fetch the list from the backend
  new             create an item
  edit <id>       change title and description
  toggle <id>     flip completion
  delete <id>     delete after confirmation
  status          connectivity and error summary
  help            this text
  quit            leave the shell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Reload,
    New,
    Edit(ItemId),
    Toggle(ItemId),
    Delete(ItemId),
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments for `{name}`"));
        }

        let command = match (name, arg) {
            ("list" | "ls", None) => Self::List,
            ("reload", None) => Self::Reload,
            ("new" | "add", None) => Self::New,
            ("edit", Some(id)) => Self::Edit(parse_id(id)?),
            ("toggle", Some(id)) => Self::Toggle(parse_id(id)?),
            ("delete" | "rm", Some(id)) => Self::Delete(parse_id(id)?),
            ("status", None) => Self::Status,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            ("edit" | "toggle" | "delete" | "rm", None) => {
                return Err(format!("`{name}` needs an item id"));
            }
            (_, Some(_)) if is_known(name) => {
                return Err(format!("`{name}` takes no arguments"));
            }
            _ => return Err(format!("unknown command `{name}`; try `help`")),
        };
        Ok(Some(command))
    }
}

fn is_known(name: &str) -> bool {
    matches!(
        name,
        "list" | "ls" | "reload" | "new" | "add" | "status" | "help" | "?" | "quit" | "exit"
    )
}

fn parse_id(raw: &str) -> Result<ItemId, String> {
    raw.trim_start_matches('#')
        .parse::<i64>()
        .map(ItemId)
        .map_err(|_| format!("`{raw}` is not an item id"))
}

pub async fn run(
    controller: &ItemStoreController,
    settings: &ClientSettings,
    console: &mut Console,
) -> Result<()> {
    let _monitor = controller.start_health_monitor(settings.health_interval);
    let state = controller.dispatch_and_settle(UiEvent::LoadRequested).await;
    console.print(&render(&state)).await?;
    console.print("Type `help` for commands.").await?;

    while let Some(line) = console.prompt("items> ").await? {
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                console.print(&message).await?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => console.print(HELP).await?,
            ShellCommand::List => console.print(&render(&controller.snapshot())).await?,
            ShellCommand::Status => console.print(&status(&controller.snapshot())).await?,
            ShellCommand::Reload => {
                let state = controller.dispatch_and_settle(UiEvent::LoadRequested).await;
                console.print(&render(&state)).await?;
            }
            ShellCommand::New => {
                controller.dispatch(UiEvent::OpenNew);
                if fill_draft(controller, console, None).await? {
                    submit_with_retry(controller, console).await?;
                }
            }
            ShellCommand::Edit(id) => {
                let Some(item) = controller.snapshot().item(id).cloned() else {
                    console.print(&format!("No item #{id}.")).await?;
                    continue;
                };
                controller.dispatch(UiEvent::OpenEdit(item.clone()));
                let current = (item.title.as_str(), item.description.as_str());
                if fill_draft(controller, console, Some(current)).await? {
                    submit_with_retry(controller, console).await?;
                }
            }
            ShellCommand::Toggle(id) => {
                if controller.snapshot().item(id).is_none() {
                    console.print(&format!("No item #{id}.")).await?;
                    continue;
                }
                let state = controller
                    .dispatch_and_settle(UiEvent::ToggleCompletion(id))
                    .await;
                console.print(&render(&state)).await?;
            }
            ShellCommand::Delete(id) => {
                let Some(item) = controller.snapshot().item(id).cloned() else {
                    console.print(&format!("No item #{id}.")).await?;
                    continue;
                };
                let confirmed = console
                    .confirm(&format!("Delete \"{}\"?", item.title))
                    .await?;
                let state = controller
                    .dispatch_and_settle(UiEvent::DeleteRequested { id, confirmed })
                    .await;
                if confirmed {
                    console.print(&render(&state)).await?;
                } else {
                    console.print("Kept.").await?;
                }
            }
        }
    }

    Ok(())
}

/// Prompts for both draft fields. An empty answer keeps `current` when editing;
/// `-` clears the description. Returns `false` if stdin closed mid-way.
async fn fill_draft(
    controller: &ItemStoreController,
    console: &mut Console,
    current: Option<(&str, &str)>,
) -> Result<bool> {
    let title_label = match current {
        Some((title, _)) => format!("Title [{title}]: "),
        None => "Title: ".to_string(),
    };
    let Some(title) = console.prompt(&title_label).await? else {
        controller.dispatch(UiEvent::CancelEdit);
        return Ok(false);
    };
    if !(title.is_empty() && current.is_some()) {
        controller.dispatch(UiEvent::DraftTitleChanged(title.trim().to_string()));
    }

    let description_label = match current {
        Some((_, description)) => format!("Description [{description}]: "),
        None => "Description: ".to_string(),
    };
    let Some(description) = console.prompt(&description_label).await? else {
        controller.dispatch(UiEvent::CancelEdit);
        return Ok(false);
    };
    match description.trim() {
        "" if current.is_some() => {}
        "-" => controller.dispatch(UiEvent::DraftDescriptionChanged(String::new())),
        text => controller.dispatch(UiEvent::DraftDescriptionChanged(text.to_string())),
    }
    Ok(true)
}

/// Submits the open draft. Failed saves leave the draft in place, so the user
/// may resubmit it unchanged or give up.
async fn submit_with_retry(controller: &ItemStoreController, console: &mut Console) -> Result<()> {
    loop {
        let state = controller.dispatch_and_settle(UiEvent::Submit).await;
        if !state.editor.is_open() {
            console.print(&render(&state)).await?;
            return Ok(());
        }

        let has_title = state.editor.draft().is_some_and(|draft| draft.has_title());
        if !has_title {
            console.print("A title is required.").await?;
            controller.dispatch(UiEvent::CancelEdit);
            return Ok(());
        }
        if let Some(error) = &state.error {
            console.print(&format!("Error: {}", error.message())).await?;
        }
        if !console.confirm("Retry?").await? {
            controller.dispatch(UiEvent::CancelEdit);
            return Ok(());
        }
    }
}

pub fn status(state: &AppState) -> String {
    let mut lines = vec![
        format!("Backend: {}", badge(state.connected)),
        format!("Items: {}", state.items.len()),
    ];
    if state.loading {
        lines.push("Loading...".to_string());
    }
    if let Some(error) = &state.error {
        lines.push(format!("Last error: {}", error.message()));
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
