// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `syncres`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "syncres",
    version,
    about = "Mirror local resource changes to a connected device.",
    long_about = None
)]
pub struct CliArgs {
    /// Project directory to watch. Must contain `config.json` and
    /// `engine.cfg`.
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub project: PathBuf,

    /// Settings file (TOML). Defaults to `syncres.toml` in the project
    /// directory when present.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SYNCRES_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and validate the configuration, print the resolved targets, and
    /// exit without watching.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
