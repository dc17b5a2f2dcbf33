// src/exec/pool.rs

//! Background execution of remote commands.
//!
//! Every submitted command runs in its own Tokio task; `submit` never waits
//! for it. On top of that the pool can:
//! - bound the number of commands in flight (`max_concurrent`),
//! - order commands whose remote paths overlap (`serialize_overlapping`),
//! - give up on commands that exceed `command_timeout`.
//!
//! Every outcome is logged here, so callers may drop the returned handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::SyncSettings;
use crate::errors::CommandError;
use crate::exec::backend::CommandExecutor;
use crate::sync::remote::paths_overlap;
use crate::types::{CommandOutput, CommandReport, RemoteCommand};

/// Pool tuning, usually taken from `[sync]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolOptions {
    /// 0 means unbounded.
    pub max_concurrent: usize,
    pub command_timeout: Option<Duration>,
    pub serialize_overlapping: bool,
}

impl PoolOptions {
    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self {
            max_concurrent: settings.max_concurrent,
            command_timeout: settings.command_timeout,
            serialize_overlapping: settings.serialize_overlapping,
        }
    }
}

/// (target, remote path)
type PathKey = (String, String);

pub struct CommandPool {
    executor: Arc<dyn CommandExecutor>,
    semaphore: Option<Arc<Semaphore>>,
    options: PoolOptions,
    /// Completion signal of the most recent command per path.
    in_flight: Mutex<HashMap<PathKey, watch::Receiver<bool>>>,
}

impl std::fmt::Debug for CommandPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandPool")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CommandPool {
    pub fn new(executor: Arc<dyn CommandExecutor>, options: PoolOptions) -> Self {
        let semaphore =
            (options.max_concurrent > 0).then(|| Arc::new(Semaphore::new(options.max_concurrent)));
        Self {
            executor,
            semaphore,
            options,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Start `command` in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, command: RemoteCommand) -> JoinHandle<CommandReport> {
        let predecessors = if self.options.serialize_overlapping {
            self.register(&command)
        } else {
            Ordering::none()
        };

        let executor = Arc::clone(&self.executor);
        let semaphore = self.semaphore.clone();
        let timeout = self.options.command_timeout;

        tokio::spawn(async move {
            let Ordering { wait_for, done } = predecessors;

            for mut rx in wait_for {
                // Err means the predecessor task is gone; treat as finished.
                let _ = rx.wait_for(|finished| *finished).await;
            }

            // A closed semaphore is never produced here; run unbounded if so.
            let permit = match semaphore {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };

            let result = execute_with_timeout(executor.as_ref(), command.clone(), timeout).await;
            drop(permit);

            let report = CommandReport { command, result };
            log_report(&report);

            if let Some(done) = done {
                let _ = done.send(true);
            }
            report
        })
    }

    /// Record `command` as the latest one on its path and collect the
    /// completion signals of every unfinished overlapping command.
    fn register(&self, command: &RemoteCommand) -> Ordering {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());

        // Forget finished commands so the map only holds live work.
        in_flight.retain(|_, rx| !*rx.borrow() && rx.has_changed().is_ok());

        let wait_for: Vec<watch::Receiver<bool>> = in_flight
            .iter()
            .filter(|((target, path), _)| {
                *target == command.target && paths_overlap(path, &command.remote_path)
            })
            .map(|(_, rx)| rx.clone())
            .collect();

        if !wait_for.is_empty() {
            debug!(
                device = %command.target,
                path = %command.remote_path,
                waiting_on = wait_for.len(),
                "ordering after overlapping in-flight commands"
            );
        }

        let (tx, rx) = watch::channel(false);
        in_flight.insert(
            (command.target.clone(), command.remote_path.clone()),
            rx,
        );

        Ordering {
            wait_for,
            done: Some(tx),
        }
    }
}

struct Ordering {
    wait_for: Vec<watch::Receiver<bool>>,
    done: Option<watch::Sender<bool>>,
}

impl Ordering {
    fn none() -> Self {
        Self {
            wait_for: Vec::new(),
            done: None,
        }
    }
}

/// Run one command and fold a non-zero exit status into
/// [`CommandError::Failed`].
pub async fn execute_with_timeout(
    executor: &dyn CommandExecutor,
    command: RemoteCommand,
    timeout: Option<Duration>,
) -> Result<CommandOutput, CommandError> {
    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, executor.execute(command)).await {
            Ok(res) => res?,
            Err(_) => return Err(CommandError::TimedOut(limit)),
        },
        None => executor.execute(command).await?,
    };

    if output.success() {
        Ok(output)
    } else {
        Err(CommandError::Failed {
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Log the command line, then stdout and stderr when non-empty, then the
/// failure if any.
pub fn log_report(report: &CommandReport) {
    let cmd = &report.command;
    info!(device = %cmd.target, action = %cmd.action, "{}", cmd.command_line());

    let (stdout, stderr) = match &report.result {
        Ok(out) => (out.stdout.as_str(), out.stderr.as_str()),
        Err(CommandError::Failed { stdout, stderr, .. }) => (stdout.as_str(), stderr.as_str()),
        Err(_) => ("", ""),
    };

    if !stdout.trim().is_empty() {
        info!(device = %cmd.target, "stdout: {}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        info!(device = %cmd.target, "stderr: {}", stderr.trim_end());
    }

    match &report.result {
        Ok(_) => debug!(device = %cmd.target, path = %cmd.remote_path, "command succeeded"),
        Err(CommandError::Failed { code, .. }) => error!(
            device = %cmd.target,
            path = %cmd.remote_path,
            exit_code = *code,
            "command failed"
        ),
        Err(err) => error!(
            device = %cmd.target,
            path = %cmd.remote_path,
            error = %err,
            "command error"
        ),
    }
}
