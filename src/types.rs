// src/types.rs

//! Core data model shared by the watcher, normalizer, dispatcher and
//! executor.

use std::fmt;
use std::path::PathBuf;

use crate::errors::CommandError;

/// Kind of a raw watch event, mirroring the events a recursive watcher emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Add,
    Change,
    Unlink,
    AddDir,
    UnlinkDir,
    /// Initial scan complete.
    Ready,
    /// Low-level signal with no sync meaning (metadata, access, ...).
    Raw,
    Error,
}

/// A single event from the watch mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub path: PathBuf,
    pub error: Option<String>,
}

impl RawEvent {
    pub fn new(kind: EventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            error: None,
        }
    }

    pub fn ready(root: impl Into<PathBuf>) -> Self {
        Self::new(EventKind::Ready, root)
    }

    pub fn error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Error,
            path: path.into(),
            error: Some(message.into()),
        }
    }
}

/// What has to happen on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Overwrite the remote file with the local one.
    Push,
    /// Delete a single remote file.
    Remove,
    /// Delete a remote directory recursively; no error if absent.
    RemoveDir,
    /// Create a remote directory and its parents; no error if present.
    MakeDirs,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Push => "push",
            ActionKind::Remove => "remove",
            ActionKind::RemoveDir => "remove_dir",
            ActionKind::MakeDirs => "make_dirs",
        };
        f.write_str(s)
    }
}

/// Normalized, platform-agnostic description of one change to mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAction {
    pub kind: ActionKind,
    pub source: PathBuf,
    /// Path relative to the project root, always with `/` separators.
    /// Empty for the project root itself.
    pub relative_path: String,
}

/// A fully resolved command for the device bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    pub target: String,
    pub action: ActionKind,
    pub remote_path: String,
    pub program: String,
    pub args: Vec<String>,
}

impl RemoteCommand {
    /// Human-readable command line, used for logging only.
    pub fn command_line(&self) -> String {
        let mut line = shell_display(&self.program);
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell_display(arg));
        }
        line
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

fn shell_display(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(char::is_whitespace) {
        arg.to_string()
    } else {
        format!("\"{}\"", arg.replace('"', "\\\""))
    }
}

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Outcome of one submitted command.
#[derive(Debug)]
pub struct CommandReport {
    pub command: RemoteCommand,
    pub result: std::result::Result<CommandOutput, CommandError>,
}

impl CommandReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_quotes_arguments_with_spaces() {
        let cmd = RemoteCommand {
            target: "Android".into(),
            action: ActionKind::Push,
            remote_path: "/sdcard/app/my file.png".into(),
            program: "adb".into(),
            args: vec![
                "push".into(),
                "/home/me/my file.png".into(),
                "/sdcard/app/my file.png".into(),
            ],
        };
        assert_eq!(
            cmd.command_line(),
            "adb push \"/home/me/my file.png\" \"/sdcard/app/my file.png\""
        );
    }
}
