//! Event loop that owns [`AppState`] and runs backend commands.
//!
//! All state transitions happen on one task, in the order events arrive.
//! Commands run as independent tasks and report back through the same queue,
//! so nothing blocks the loop. Requests are never cancelled or sequenced: two
//! overlapping list fetches apply in whatever order their responses arrive.

use std::{sync::Arc, time::Duration};

use shared::protocol::ItemPatch;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    api::ItemsApi,
    events::{BackendCommand, UiEvent},
    health::HealthMonitor,
    reducer::reduce,
    state::AppState,
};

/// Handle for feeding events into a running controller.
///
/// Tracks queued events plus in-flight commands so callers can wait for quiescence.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<UiEvent>,
    pending: Arc<watch::Sender<usize>>,
}

impl EventSender {
    /// Returns `false` once the controller has shut down.
    pub fn send(&self, event: UiEvent) -> bool {
        self.pending.send_modify(|n| *n += 1);
        if let Err(err) = self.tx.send(event) {
            self.release();
            debug!(event = ?err.0, "controller stopped; dropping event");
            return false;
        }
        true
    }

    fn acquire(&self) {
        self.pending.send_modify(|n| *n += 1);
    }

    fn release(&self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }
}

pub struct ItemStoreController {
    events: EventSender,
    state: watch::Receiver<AppState>,
    pending: watch::Receiver<usize>,
    api: Arc<dyn ItemsApi>,
    task: JoinHandle<()>,
}

impl ItemStoreController {
    /// Starts the event loop on the current tokio runtime.
    pub fn spawn(api: Arc<dyn ItemsApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (pending_tx, pending_rx) = watch::channel(0usize);
        let (state_tx, state_rx) = watch::channel(AppState::default());
        let events = EventSender {
            tx,
            pending: Arc::new(pending_tx),
        };

        let task = tokio::spawn(run_event_loop(
            Arc::clone(&api),
            rx,
            state_tx,
            events.clone(),
        ));

        Self {
            events,
            state: state_rx,
            pending: pending_rx,
            api,
            task,
        }
    }

    pub fn dispatch(&self, event: UiEvent) {
        self.events.send(event);
    }

    /// Dispatches `event` and returns the state once every follow-up command has finished.
    pub async fn dispatch_and_settle(&self, event: UiEvent) -> AppState {
        self.dispatch(event);
        self.settled().await;
        self.snapshot()
    }

    /// Resolves when no events are queued and no commands are running.
    pub async fn settled(&self) {
        let mut pending = self.pending.clone();
        let _ = pending.wait_for(|n| *n == 0).await;
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.clone()
    }

    pub fn event_sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Probes the backend now and then every `every` until the monitor is stopped or dropped.
    pub fn start_health_monitor(&self, every: Duration) -> HealthMonitor {
        HealthMonitor::start(Arc::clone(&self.api), every, self.event_sender())
    }
}

impl Drop for ItemStoreController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_event_loop(
    api: Arc<dyn ItemsApi>,
    mut rx: mpsc::UnboundedReceiver<UiEvent>,
    state_tx: watch::Sender<AppState>,
    events: EventSender,
) {
    while let Some(event) = rx.recv().await {
        let current = state_tx.borrow().clone();
        let (next, commands) = reduce(current, event);
        state_tx.send_replace(next);

        for command in commands {
            debug!(command = command.name(), "running backend command");
            events.acquire();
            let api = Arc::clone(&api);
            let events = events.clone();
            tokio::spawn(async move {
                let outcome = execute(api.as_ref(), command).await;
                events.send(outcome);
                events.release();
            });
        }

        events.release();
    }
}

async fn execute(api: &dyn ItemsApi, command: BackendCommand) -> UiEvent {
    match command {
        BackendCommand::FetchItems => UiEvent::ItemsLoaded(api.list_items().await),
        BackendCommand::CreateItem(request) => {
            UiEvent::SaveFinished(api.create_item(&request).await)
        }
        BackendCommand::UpdateItem { id, patch } => {
            UiEvent::SaveFinished(api.update_item(id, &patch).await)
        }
        BackendCommand::ToggleCompleted { id, completed } => UiEvent::ToggleFinished {
            id,
            result: api.update_item(id, &ItemPatch::completed(completed)).await,
        },
        BackendCommand::DeleteItem { id } => UiEvent::DeleteFinished {
            id,
            result: api.delete_item(id).await,
        },
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
