// src/engine/mod.rs

//! Orchestration engine for syncres.
//!
//! A single loop consumes [`RuntimeEvent`]s from the watcher and the Ctrl-C
//! handler, normalizes watch events into actions and hands them to the
//! dispatcher. It never waits for a command to finish.
//!
//! The pure decision logic lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::types::RawEvent;

/// Events flowing into the runtime.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Something the watcher observed (including `Ready` and errors).
    Watch(RawEvent),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Counters reported when the runtime exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub actions: usize,
    pub commands: usize,
    /// Commands still running when the shutdown grace period ran out.
    pub aborted: usize,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreRuntime, CoreStep};
pub use runtime::Runtime;
