// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Compiling the ignore globs / regex (`patterns`).
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Turning native notify events and the initial directory scan into
//!   [`RawEvent`](crate::types::RawEvent)s.
//!
//! It does **not** decide what to do on the device; that is the job of
//! [`crate::sync`].

pub mod events;
pub mod path_utils;
pub mod patterns;
pub mod scan;
pub mod watcher;

pub use events::EventTranslator;
pub use patterns::IgnoreMatcher;
pub use watcher::{spawn_watcher, WatchOptions, WatcherHandle};
