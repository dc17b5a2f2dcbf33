// src/exec/runner.rs

//! Individual bridge process runner.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::CommandError;
use crate::types::{CommandOutput, RemoteCommand};

/// Run `command` to completion and capture its output.
///
/// The child is killed if the returned future is dropped (timeouts, runtime
/// shutdown).
pub async fn run_command(command: &RemoteCommand) -> Result<CommandOutput, CommandError> {
    debug!(
        device = %command.target,
        cmd = %command.command_line(),
        "starting bridge process"
    );

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| CommandError::Spawn {
        program: command.program.clone(),
        source,
    })?;

    let output = child
        .wait_with_output()
        .await
        .map_err(|source| CommandError::Io {
            program: command.program.clone(),
            source,
        })?;

    // Killed by a signal: no exit code.
    let code = output.status.code().unwrap_or(-1);

    Ok(CommandOutput {
        code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
