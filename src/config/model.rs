// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::types::ActionKind;
use crate::watch::patterns::IgnoreMatcher;

/// Target name used when no settings file lists any.
pub const DEFAULT_TARGET: &str = "Android";

/// The parts of `config.json` this tool reads.
///
/// ```json
/// { "DebugResDir": { "Android": "/sdcard/mygame" } }
/// ```
///
/// Every other key belongs to other tooling and is ignored.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectFile {
    #[serde(rename = "DebugResDir", default)]
    pub debug_res_dir: Option<BTreeMap<String, Value>>,
}

/// Daemon settings as read from `syncres.toml`, before validation.
///
/// ```toml
/// [sync]
/// targets = ["Android"]
/// ignore = [".git/**"]
/// max_concurrent = 8
///
/// [target.Android]
/// program = "adb"
/// args = ["-s", "emulator-5554"]
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSettingsFile {
    #[serde(default)]
    pub sync: SyncSection,

    /// Bridge definitions keyed by target name.
    #[serde(default)]
    pub target: BTreeMap<String, BridgeConfig>,
}

/// `[sync]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSection {
    /// Targets (keys of `DebugResDir`) every action is mirrored to.
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,

    /// Glob patterns, matched against project-relative paths.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Optional regex, matched against project-relative paths.
    #[serde(default)]
    pub ignore_regex: Option<String>,

    /// Maximum number of bridge commands in flight; 0 means unbounded.
    #[serde(default)]
    pub max_concurrent: usize,

    /// Per-command timeout such as `"30s"`; none by default.
    #[serde(default)]
    pub command_timeout: Option<String>,

    /// Run commands whose remote paths overlap one after another.
    #[serde(default = "default_true")]
    pub serialize_overlapping: bool,

    /// Mirror every existing file and directory when watching starts.
    #[serde(default = "default_true")]
    pub initial_scan: bool,

    /// How long to wait for in-flight commands on shutdown.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace: String,
}

fn default_targets() -> Vec<String> {
    vec![DEFAULT_TARGET.to_string()]
}

fn default_true() -> bool {
    true
}

fn default_shutdown_grace() -> String {
    "5s".to_string()
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            ignore: Vec::new(),
            ignore_regex: None,
            max_concurrent: 0,
            command_timeout: None,
            serialize_overlapping: true,
            initial_scan: true,
            shutdown_grace: default_shutdown_grace(),
        }
    }
}

/// `[target.<name>]` section: how to reach one kind of device.
///
/// Argument templates may contain `{src}` (local absolute path), `{dst}`
/// (remote path) and `{dst_quoted}` (remote path quoted for a POSIX shell
/// on the device).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BridgeConfig {
    #[serde(default = "adb_program")]
    pub program: String,

    /// Prepended to every command, e.g. `["-s", "<serial>"]`.
    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default = "adb_push")]
    pub push: Vec<String>,

    #[serde(default = "adb_remove")]
    pub remove: Vec<String>,

    #[serde(default = "adb_remove_dir")]
    pub remove_dir: Vec<String>,

    #[serde(default = "adb_make_dirs")]
    pub make_dirs: Vec<String>,
}

fn strings(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn adb_program() -> String {
    "adb".to_string()
}

fn adb_push() -> Vec<String> {
    strings(&["push", "{src}", "{dst}"])
}

fn adb_remove() -> Vec<String> {
    strings(&["shell", "rm", "{dst_quoted}"])
}

fn adb_remove_dir() -> Vec<String> {
    strings(&["shell", "rm", "-rf", "{dst_quoted}"])
}

fn adb_make_dirs() -> Vec<String> {
    strings(&["shell", "mkdir", "-p", "{dst_quoted}"])
}

impl BridgeConfig {
    /// The built-in Android Debug Bridge profile.
    pub fn adb() -> Self {
        Self {
            program: adb_program(),
            args: Vec::new(),
            push: adb_push(),
            remove: adb_remove(),
            remove_dir: adb_remove_dir(),
            make_dirs: adb_make_dirs(),
        }
    }

    pub fn template(&self, action: ActionKind) -> &[String] {
        match action {
            ActionKind::Push => &self.push,
            ActionKind::Remove => &self.remove,
            ActionKind::RemoveDir => &self.remove_dir,
            ActionKind::MakeDirs => &self.make_dirs,
        }
    }
}

/// Validated daemon settings.
///
/// Construct via `SyncSettings::try_from(RawSettingsFile)` (see
/// `validate.rs`), or `SyncSettings::default()` when no settings file
/// exists.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub targets: Vec<String>,
    pub ignore: IgnoreMatcher,
    pub max_concurrent: usize,
    pub command_timeout: Option<Duration>,
    pub serialize_overlapping: bool,
    pub initial_scan: bool,
    pub shutdown_grace: Duration,
    bridges: BTreeMap<String, BridgeConfig>,
}

impl SyncSettings {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_unchecked(
        targets: Vec<String>,
        ignore: IgnoreMatcher,
        max_concurrent: usize,
        command_timeout: Option<Duration>,
        serialize_overlapping: bool,
        initial_scan: bool,
        shutdown_grace: Duration,
        bridges: BTreeMap<String, BridgeConfig>,
    ) -> Self {
        Self {
            targets,
            ignore,
            max_concurrent,
            command_timeout,
            serialize_overlapping,
            initial_scan,
            shutdown_grace,
            bridges,
        }
    }

    /// Bridge for a configured target. Validation guarantees one exists for
    /// every name in `targets`.
    pub fn bridge(&self, target: &str) -> Option<&BridgeConfig> {
        self.bridges.get(target)
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        let mut bridges = BTreeMap::new();
        bridges.insert(DEFAULT_TARGET.to_string(), BridgeConfig::adb());
        Self {
            targets: default_targets(),
            ignore: IgnoreMatcher::empty(),
            max_concurrent: 0,
            command_timeout: None,
            serialize_overlapping: true,
            initial_scan: true,
            shutdown_grace: Duration::from_secs(5),
            bridges,
        }
    }
}

/// Fully resolved configuration for one run. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    project_root: PathBuf,
    debug_res_dir: BTreeMap<String, Value>,
    settings: SyncSettings,
}

impl SyncConfig {
    pub fn new(
        project_root: impl Into<PathBuf>,
        debug_res_dir: BTreeMap<String, Value>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            debug_res_dir,
            settings,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Remote base path for `target`, if one is configured.
    pub fn resolve_target(&self, target: &str) -> Option<&str> {
        resolve_target(self, target)
    }

    /// Targets from the settings that resolve to a remote base path.
    pub fn active_targets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings
            .targets
            .iter()
            .filter_map(|t| self.resolve_target(t).map(|base| (t.as_str(), base)))
    }
}

/// Look up the remote base path configured for `target` under
/// `DebugResDir`.
///
/// Absent keys, empty strings and non-string values all mean "nothing to
/// sync for this target".
pub fn resolve_target<'a>(config: &'a SyncConfig, target: &str) -> Option<&'a str> {
    match config.debug_res_dir.get(target) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with(map: Value) -> SyncConfig {
        let debug_res_dir: BTreeMap<String, Value> = serde_json::from_value(map).unwrap();
        SyncConfig::new("/proj", debug_res_dir, SyncSettings::default())
    }

    #[test]
    fn resolve_target_returns_configured_base() {
        let cfg = config_with(json!({ "Android": "/sdcard/app" }));
        assert_eq!(cfg.resolve_target("Android"), Some("/sdcard/app"));
    }

    #[test]
    fn resolve_target_is_absent_for_missing_or_falsy_values() {
        let cfg = config_with(json!({ "Android": "", "iOS": null, "Web": false }));
        assert_eq!(resolve_target(&cfg, "Android"), None);
        assert_eq!(resolve_target(&cfg, "iOS"), None);
        assert_eq!(resolve_target(&cfg, "Web"), None);
        assert_eq!(resolve_target(&cfg, "Switch"), None);
        // Pure: asking twice gives the same answer.
        assert_eq!(resolve_target(&cfg, "Android"), None);
    }

    #[test]
    fn active_targets_skips_unresolved_targets() {
        let cfg = config_with(json!({ "Android": "/sdcard/app" }));
        let active: Vec<_> = cfg.active_targets().collect();
        assert_eq!(active, vec![("Android", "/sdcard/app")]);

        let empty = config_with(json!({}));
        assert_eq!(empty.active_targets().count(), 0);
    }

    #[test]
    fn bridge_template_follows_action_kind() {
        let adb = BridgeConfig::adb();
        assert_eq!(adb.template(ActionKind::Push), &adb_push()[..]);
        assert_eq!(
            adb.template(ActionKind::RemoveDir),
            &strings(&["shell", "rm", "-rf", "{dst_quoted}"])[..]
        );
    }
}
