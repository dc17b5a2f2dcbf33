use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Barrier;

use syncres::errors::CommandError;
use syncres::exec::{CommandExecutor, ExecFuture};
use syncres::types::{CommandOutput, RemoteCommand};

/// A fake executor that:
/// - records every command it receives, in start order
/// - exits 0 unless a scripted exit code matches the remote path
/// - optionally sleeps, or waits on a shared barrier, to hold commands in
///   flight
/// - tracks the number of concurrently running commands and its maximum.
#[derive(Default)]
pub struct FakeExecutor {
    executed: Mutex<Vec<RemoteCommand>>,
    finished: Mutex<Vec<String>>,
    exit_codes: Mutex<HashMap<String, i32>>,
    spawn_failures: Mutex<Vec<String>>,
    delay: Duration,
    gate: Option<Arc<Barrier>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every command for `delay` before it completes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Hold every command until `n` commands are running at once.
    pub fn with_gate(mut self, n: usize) -> Self {
        self.gate = Some(Arc::new(Barrier::new(n)));
        self
    }

    /// Commands on `remote_path` exit with `code`.
    pub fn fail_path(self, remote_path: &str, code: i32) -> Self {
        self.exit_codes
            .lock()
            .unwrap()
            .insert(remote_path.to_string(), code);
        self
    }

    /// Commands on `remote_path` fail to start at all.
    pub fn spawn_error_path(self, remote_path: &str) -> Self {
        self.spawn_failures
            .lock()
            .unwrap()
            .push(remote_path.to_string());
        self
    }

    pub fn executed(&self) -> Vec<RemoteCommand> {
        self.executed.lock().unwrap().clone()
    }

    /// Remote paths in completion order.
    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(&self, command: RemoteCommand) -> ExecFuture<'_> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(command.clone());

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(gate) = &self.gate {
                gate.wait().await;
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished
                .lock()
                .unwrap()
                .push(command.remote_path.clone());

            let spawn_fails = self
                .spawn_failures
                .lock()
                .unwrap()
                .contains(&command.remote_path);
            if spawn_fails {
                return Err(CommandError::Spawn {
                    program: command.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted"),
                });
            }

            let code = self
                .exit_codes
                .lock()
                .unwrap()
                .get(&command.remote_path)
                .copied()
                .unwrap_or(0);

            Ok(CommandOutput {
                code,
                stdout: format!("{} done\n", command.remote_path),
                stderr: if code == 0 {
                    String::new()
                } else {
                    "scripted failure\n".to_string()
                },
            })
        })
    }
}
