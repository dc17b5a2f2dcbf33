// src/exec/backend.rs

//! Pluggable command executor abstraction.
//!
//! The command pool talks to a `CommandExecutor` instead of spawning
//! processes directly. This makes it easy to swap in a fake executor in
//! tests while keeping the production implementation in [`runner`].
//!
//! - `ProcessExecutor` is the default implementation used by `syncres`.
//!   It runs the bridge program as a child process and captures its output.
//! - Tests can provide their own `CommandExecutor` that, for example,
//!   records which commands were submitted and fails some of them.
//!
//! [`runner`]: super::runner

use std::future::Future;
use std::pin::Pin;

use crate::errors::CommandError;
use crate::types::{CommandOutput, RemoteCommand};

use super::runner::run_command;

pub type ExecFuture<'a> =
    Pin<Box<dyn Future<Output = std::result::Result<CommandOutput, CommandError>> + Send + 'a>>;

/// Trait abstracting how remote commands are executed.
///
/// A completed command is `Ok` whatever its exit status; the pool decides
/// what a non-zero status means. `Err` is for commands that could not be run
/// at all.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: RemoteCommand) -> ExecFuture<'_>;
}

/// Real executor used in production: one child process per command, no
/// shell in between.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, command: RemoteCommand) -> ExecFuture<'_> {
        Box::pin(async move { run_command(&command).await })
    }
}
