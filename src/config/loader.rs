// src/config/loader.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::model::{ProjectFile, RawSettingsFile, SyncConfig, SyncSettings};
use crate::config::validate::validate_debug_res_dir;
use crate::errors::ConfigError;
use crate::fs::{FileSystem, RealFileSystem};

/// Project settings consumed for `DebugResDir`.
pub const PROJECT_CONFIG_FILE: &str = "config.json";

/// Engine marker; only its presence is checked.
pub const ENGINE_MARKER_FILE: &str = "engine.cfg";

/// Optional daemon settings, looked up in the project root.
pub const SETTINGS_FILE: &str = "syncres.toml";

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Load the configuration for `project_root` from disk.
///
/// Settings come from `<project_root>/syncres.toml` when it exists.
pub fn load(project_root: impl AsRef<Path>) -> ConfigResult<SyncConfig> {
    load_with(&RealFileSystem, project_root.as_ref(), None)
}

/// Load the configuration through `fs`.
///
/// - `config.json` and `engine.cfg` must both be regular files, otherwise
///   [`ConfigError::Missing`] is returned for the first one that is not.
/// - `config.json` must parse; otherwise [`ConfigError::Malformed`].
/// - `settings_path`, when given, must exist. When `None`, the project-local
///   `syncres.toml` is used if present and defaults apply otherwise.
pub fn load_with(
    fs: &dyn FileSystem,
    project_root: &Path,
    settings_path: Option<&Path>,
) -> ConfigResult<SyncConfig> {
    let config_path = project_root.join(PROJECT_CONFIG_FILE);
    let marker_path = project_root.join(ENGINE_MARKER_FILE);

    for required in [&config_path, &marker_path] {
        if !fs.is_file(required) {
            return Err(ConfigError::Missing {
                path: required.clone(),
            });
        }
    }

    let debug_res_dir = load_project_file(fs, &config_path)?;

    let settings = match settings_path {
        Some(path) => load_settings(fs, path)?,
        None => {
            let default_path = project_root.join(SETTINGS_FILE);
            if fs.exists(&default_path) {
                load_settings(fs, &default_path)?
            } else {
                debug!(path = ?default_path, "no settings file; using defaults");
                SyncSettings::default()
            }
        }
    };

    let config = SyncConfig::new(project_root, debug_res_dir, settings);

    let active: Vec<&str> = config.active_targets().map(|(name, _)| name).collect();
    if active.is_empty() {
        warn!(
            targets = ?config.settings().targets,
            "no configured target has a DebugResDir entry; nothing will be synced"
        );
    } else {
        info!(?active, "resolved sync targets");
    }

    Ok(config)
}

/// Read `config.json` and return its `DebugResDir` map.
pub fn load_project_file(
    fs: &dyn FileSystem,
    path: &Path,
) -> ConfigResult<BTreeMap<String, serde_json::Value>> {
    let contents = read_utf8(fs, path)?;

    if contents.trim().is_empty() {
        return Err(malformed(path, "file is empty"));
    }

    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| malformed(path, e))?;
    if !value.is_object() {
        return Err(malformed(path, "top-level value must be a JSON object"));
    }
    let project: ProjectFile = serde_json::from_value(value).map_err(|e| malformed(path, e))?;

    let map = project.debug_res_dir.unwrap_or_default();
    validate_debug_res_dir(&map).map_err(|e| malformed(path, e))?;
    Ok(map)
}

/// Read and validate a `syncres.toml` settings file.
pub fn load_settings(fs: &dyn FileSystem, path: &Path) -> ConfigResult<SyncSettings> {
    if !fs.is_file(path) {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }

    let contents = read_utf8(fs, path)?;

    let raw = parse_settings(&contents).map_err(|e| malformed(path, e))?;
    SyncSettings::try_from(raw)
}

/// TOML deserialization only; validation happens in `SyncSettings::try_from`.
pub fn parse_settings(contents: &str) -> std::result::Result<RawSettingsFile, toml::de::Error> {
    toml::from_str(contents)
}

/// Resolve the `--project` argument against the current working directory.
pub fn resolve_project_root(arg: &Path) -> PathBuf {
    if arg.is_absolute() {
        arg.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(arg))
            .unwrap_or_else(|_| arg.to_path_buf())
    }
}

/// Read a file as text. An IO failure is `Io`; bytes that are not UTF-8 are
/// `Malformed`.
fn read_utf8(fs: &dyn FileSystem, path: &Path) -> ConfigResult<String> {
    let bytes = fs.read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| malformed(path, e))
}

fn malformed(path: &Path, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::Malformed {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
