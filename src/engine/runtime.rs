// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::errors::Result;
use crate::exec::CommandExecutor;
use crate::sync::{Dispatcher, EventNormalizer};
use crate::types::CommandReport;

use super::core::CoreRuntime;
use super::{RunSummary, RuntimeEvent};

/// Reads `RuntimeEvent`s, feeds them through `CoreRuntime` and dispatches
/// the resulting actions. Commands run in the background; this loop only
/// keeps their handles so shutdown can wait for them.
pub struct Runtime {
    core: CoreRuntime,
    dispatcher: Dispatcher,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    in_flight: Vec<JoinHandle<CommandReport>>,
    shutdown_grace: Duration,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        config: Arc<SyncConfig>,
        executor: Arc<dyn CommandExecutor>,
        event_rx: mpsc::Receiver<RuntimeEvent>,
    ) -> Self {
        let core = CoreRuntime::new(EventNormalizer::from_config(&config));
        let shutdown_grace = config.settings().shutdown_grace;
        Self {
            core,
            dispatcher: Dispatcher::new(config, executor),
            event_rx,
            in_flight: Vec::new(),
            shutdown_grace,
        }
    }

    /// Main event loop. Returns once shutdown is requested or every sender
    /// is gone, after draining in-flight commands.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("syncres runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");
            let step = self.core.step(event);

            for action in &step.actions {
                let handles = self.dispatcher.dispatch(action);
                self.core.record_commands(handles.len());
                self.in_flight.extend(handles);
            }
            self.in_flight.retain(|h| !h.is_finished());

            if !step.keep_running {
                break;
            }
        }

        self.drain().await;

        let summary = self.core.summary();
        info!(
            events = summary.events,
            actions = summary.actions,
            commands = summary.commands,
            aborted = summary.aborted,
            "runtime exiting"
        );
        Ok(summary)
    }

    /// Wait up to the grace period for running commands, then abort the
    /// rest. Aborted children are killed on drop.
    async fn drain(&mut self) {
        let handles = std::mem::take(&mut self.in_flight);
        if handles.is_empty() {
            return;
        }

        info!(
            pending = handles.len(),
            grace = ?self.shutdown_grace,
            "waiting for in-flight commands"
        );
        let deadline = tokio::time::Instant::now() + self.shutdown_grace;
        let mut aborted = 0;

        for mut handle in handles {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(_report)) => {}
                Ok(Err(err)) => warn!(error = %err, "command task did not complete"),
                Err(_) => {
                    handle.abort();
                    aborted += 1;
                }
            }
        }

        if aborted > 0 {
            warn!(aborted, "shutdown grace period elapsed; aborted remaining commands");
        }
        self.core.record_aborted(aborted);
    }
}
