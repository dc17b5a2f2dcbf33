// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::{EventKind, RawEvent};
use crate::watch::events::{error_event, EventTranslator};
use crate::watch::patterns::IgnoreMatcher;
use crate::watch::scan::scan_tree;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// What to watch and how.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub root: PathBuf,
    pub ignore: IgnoreMatcher,
    /// Report existing entries as `AddDir` / `Add` before `Ready`.
    pub initial_scan: bool,
}

/// Spawn a recursive watcher on `options.root` and forward its events to the
/// runtime as `RuntimeEvent::Watch`.
///
/// The sequence seen by the runtime is: initial scan events (if enabled),
/// one `Ready`, then live events in the order the OS reported them.
pub fn spawn_watcher(
    options: WatchOptions,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let WatchOptions {
        root,
        ignore,
        initial_scan,
    } = options;

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Err(err) = event_tx.send(res) {
                // The receiving task is gone; nothing left to notify.
                eprintln!("syncres: failed to forward notify event: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!("file watcher started on {:?}", root);

    let task = tokio::spawn(async move {
        let mut translator = EventTranslator::new(Arc::clone(&fs), root.clone(), ignore.clone());

        let scan_fs = Arc::clone(&fs);
        let scan_root = root.clone();
        let scanned = tokio::task::spawn_blocking(move || {
            scan_tree(scan_fs.as_ref(), &scan_root, &scan_root, &ignore, true)
        })
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "initial scan task failed");
            Vec::new()
        });

        debug!(entries = scanned.len(), "initial scan finished");
        for raw in scanned {
            translator.observe(&raw);
            // Errors are always reported, even without an initial sync.
            if initial_scan || raw.kind == EventKind::Error {
                if runtime_tx.send(RuntimeEvent::Watch(raw)).await.is_err() {
                    return;
                }
            }
        }

        if runtime_tx
            .send(RuntimeEvent::Watch(RawEvent::ready(&root)))
            .await
            .is_err()
        {
            return;
        }

        while let Some(res) = event_rx.recv().await {
            let raws = match res {
                Ok(event) => {
                    debug!(?event, "received notify event");
                    translator.translate(event)
                }
                Err(err) => vec![error_event(&root, &err)],
            };

            for raw in raws {
                if let Err(err) = runtime_tx.send(RuntimeEvent::Watch(raw)).await {
                    // If the runtime channel is closed, there's no point
                    // keeping the watcher loop alive.
                    warn!("failed to send RuntimeEvent::Watch: {err}");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        task,
    })
}
