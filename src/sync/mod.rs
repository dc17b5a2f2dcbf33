// src/sync/mod.rs

//! Turning local changes into device commands.
//!
//! [`normalizer`] maps raw watch events to [`SyncAction`]s, [`remote`] holds
//! the remote path helpers and template rendering, and [`dispatcher`] fans
//! each action out to every active target.
//!
//! [`SyncAction`]: crate::types::SyncAction

pub mod dispatcher;
pub mod normalizer;
pub mod remote;

pub use dispatcher::Dispatcher;
pub use normalizer::EventNormalizer;
