// src/errors.rs

//! Crate-wide error types.
//!
//! Startup problems surface as [`ConfigError`] and abort the process.
//! Per-command problems surface as [`CommandError`]; they are logged and
//! never stop the watch loop.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while resolving the project configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required file missing or not a regular file: {}", path.display())]
    Missing { path: PathBuf },

    #[error("malformed {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors reported by the command executor for a single remote command.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command exited with status {code}")]
    Failed {
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("command timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SyncError>;
