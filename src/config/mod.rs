// src/config/mod.rs

//! Configuration resolution.
//!
//! - `model.rs`: `config.json` / `syncres.toml` data model and the resolved
//!   [`SyncConfig`].
//! - `loader.rs`: reads the project files and the optional settings file.
//! - `validate.rs`: turns raw settings into validated [`SyncSettings`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load, load_with, ConfigResult};
pub use model::{
    resolve_target, BridgeConfig, RawSettingsFile, SyncConfig, SyncSection, SyncSettings,
};
