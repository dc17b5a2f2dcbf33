// src/engine/core.rs

//! Pure core of the runtime.
//!
//! Consumes [`RuntimeEvent`]s and answers with the actions the IO shell
//! should dispatch. No channels, no Tokio types and no IO, so it can be
//! unit tested directly.

use tracing::{debug, error, info, trace};

use crate::engine::{RunSummary, RuntimeEvent};
use crate::sync::EventNormalizer;
use crate::types::{EventKind, RawEvent, SyncAction};

/// Result of feeding one event into the core.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CoreStep {
    pub actions: Vec<SyncAction>,
    pub keep_running: bool,
}

#[derive(Debug)]
pub struct CoreRuntime {
    normalizer: EventNormalizer,
    ready: bool,
    summary: RunSummary,
}

impl CoreRuntime {
    pub fn new(normalizer: EventNormalizer) -> Self {
        Self {
            normalizer,
            ready: false,
            summary: RunSummary::default(),
        }
    }

    /// Whether the initial scan has finished.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::Watch(raw) => {
                self.summary.events += 1;
                let actions: Vec<SyncAction> = self.handle_watch(&raw).into_iter().collect();
                self.summary.actions += actions.len();
                CoreStep {
                    actions,
                    keep_running: true,
                }
            }
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested");
                CoreStep {
                    actions: Vec::new(),
                    keep_running: false,
                }
            }
        }
    }

    fn handle_watch(&mut self, raw: &RawEvent) -> Option<SyncAction> {
        match raw.kind {
            EventKind::Ready => {
                self.ready = true;
                info!("Initial scan complete. Ready for changes.");
                None
            }
            EventKind::Error => {
                error!(
                    path = ?raw.path,
                    error = raw.error.as_deref().unwrap_or("unknown error"),
                    "watcher error"
                );
                None
            }
            EventKind::Raw => {
                trace!(path = ?raw.path, "raw event");
                None
            }
            _ => {
                let action = self.normalizer.normalize(raw);
                if let Some(a) = &action {
                    debug!(kind = %a.kind, rel = %a.relative_path, "normalized event");
                }
                action
            }
        }
    }

    pub(crate) fn record_commands(&mut self, n: usize) {
        self.summary.commands += n;
    }

    pub(crate) fn record_aborted(&mut self, n: usize) {
        self.summary.aborted += n;
    }
}
