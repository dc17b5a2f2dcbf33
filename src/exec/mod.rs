// src/exec/mod.rs

//! Remote command execution layer.
//!
//! - [`backend`] provides the `CommandExecutor` trait and the production
//!   `ProcessExecutor`; tests swap in fakes.
//! - [`runner`] spawns one bridge process and captures its output.
//! - [`pool`] runs submitted commands in the background, with the optional
//!   concurrency bound, per-path ordering and timeout.

pub mod backend;
pub mod pool;
pub mod runner;

pub use backend::{CommandExecutor, ExecFuture, ProcessExecutor};
pub use pool::{CommandPool, PoolOptions};
