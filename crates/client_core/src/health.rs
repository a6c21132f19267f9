use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

use crate::{api::ItemsApi, controller::EventSender, events::UiEvent};

const MIN_PROBE_INTERVAL: Duration = Duration::from_millis(1);

/// Repeating reachability probe. The first probe fires immediately.
///
/// Stops on [`HealthMonitor::stop`], when dropped, or when the controller it
/// reports to goes away.
pub struct HealthMonitor {
    task: Option<JoinHandle<()>>,
    interval: Duration,
}

impl HealthMonitor {
    pub fn start(api: Arc<dyn ItemsApi>, every: Duration, events: EventSender) -> Self {
        let interval = every.max(MIN_PROBE_INTERVAL);
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let reachable = probe(api.as_ref()).await;
                if !events.send(UiEvent::HealthChecked { reachable }) {
                    break;
                }
            }
        });

        Self {
            task: Some(task),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One reachability check. Failures are only reported through the return value.
pub async fn probe(api: &dyn ItemsApi) -> bool {
    match api.health().await {
        Ok(()) => true,
        Err(error) => {
            debug!(%error, "health probe failed");
            false
        }
    }
}

#[cfg(test)]
#[path = "tests/health_tests.rs"]
mod tests;
