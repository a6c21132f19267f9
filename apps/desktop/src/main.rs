use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    health::probe, AppState, ClientSettings, HttpItemsApi, ItemStoreController, ItemsApi, UiEvent,
};
use shared::domain::{Item, ItemId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod console;
mod render;
mod shell;

use console::Console;
use render::{badge, render};

#[derive(Parser, Debug)]
#[command(name = "items", about = "Keep a list of items on the items backend")]
struct Cli {
    /// Base URL of the items API, e.g. http://localhost:8000/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current list
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change the title and/or description of an item
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip the completion flag of an item
    Toggle { id: i64 },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Probe the backend once
    Health,
    /// Interactive session (default)
    Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = ClientSettings::load(cli.api_url)?;
    info!(api_url = %settings.api_url, "using items backend");

    let api: Arc<dyn ItemsApi> = Arc::new(HttpItemsApi::from_settings(&settings)?);
    let controller = ItemStoreController::spawn(Arc::clone(&api));
    let mut console = Console::new();

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(&controller, &settings, &mut console).await,
        Command::Health => {
            let reachable = probe(api.as_ref()).await;
            console.print(badge(reachable)).await?;
            if !reachable {
                bail!("no healthy backend at {}", settings.api_url);
            }
            Ok(())
        }
        command => {
            let reachable = probe(api.as_ref()).await;
            controller.dispatch(UiEvent::HealthChecked { reachable });
            let state = controller.dispatch_and_settle(UiEvent::LoadRequested).await;
            fail_on_error(&state)?;

            let state = run_once(&controller, &mut console, &state, command).await?;
            console.print(&render(&state)).await?;
            fail_on_error(&state)
        }
    }
}

/// Applies one subcommand to a freshly loaded `state`.
async fn run_once(
    controller: &ItemStoreController,
    console: &mut Console,
    state: &AppState,
    command: Command,
) -> Result<AppState> {
    let state = match command {
        Command::List => state.clone(),
        Command::Create { title, description } => {
            require_title(&title)?;
            controller.dispatch(UiEvent::OpenNew);
            controller.dispatch(UiEvent::DraftTitleChanged(title));
            controller.dispatch(UiEvent::DraftDescriptionChanged(description));
            submit(controller).await
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            let item = find(state, id)?.clone();
            if title.is_none() && description.is_none() {
                bail!("nothing to change; pass --title and/or --description");
            }
            controller.dispatch(UiEvent::OpenEdit(item));
            if let Some(title) = title {
                require_title(&title)?;
                controller.dispatch(UiEvent::DraftTitleChanged(title));
            }
            if let Some(description) = description {
                controller.dispatch(UiEvent::DraftDescriptionChanged(description));
            }
            submit(controller).await
        }
        Command::Toggle { id } => {
            find(state, id)?;
            controller
                .dispatch_and_settle(UiEvent::ToggleCompletion(ItemId(id)))
                .await
        }
        Command::Delete { id, yes } => {
            let item = find(state, id)?;
            let confirmed = yes
                || console
                    .confirm(&format!("Delete \"{}\"?", item.title))
                    .await?;
            if !confirmed {
                console.print("Kept.").await?;
            }
            controller
                .dispatch_and_settle(UiEvent::DeleteRequested {
                    id: ItemId(id),
                    confirmed,
                })
                .await
        }
        Command::Health | Command::Shell => bail!("health and shell run on their own"),
    };
    Ok(state)
}

async fn submit(controller: &ItemStoreController) -> AppState {
    let state = controller.dispatch_and_settle(UiEvent::Submit).await;
    if state.editor.is_open() {
        controller.dispatch(UiEvent::CancelEdit);
    }
    state
}

fn find(state: &AppState, id: i64) -> Result<&Item> {
    state
        .item(ItemId(id))
        .ok_or_else(|| anyhow!("no item #{id}"))
}

fn require_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        bail!("title must not be empty");
    }
    Ok(())
}

fn fail_on_error(state: &AppState) -> Result<()> {
    match &state.error {
        Some(error) => Err(anyhow!(error.message().to_string())),
        None => Ok(()),
    }
}
