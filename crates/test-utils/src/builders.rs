#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;
use syncres::config::{BridgeConfig, RawSettingsFile, SyncConfig, SyncSettings};

/// Builder for validated `SyncSettings`, going through the same
/// `TryFrom<RawSettingsFile>` path as the loader.
pub struct SettingsBuilder {
    raw: RawSettingsFile,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawSettingsFile::default(),
        }
    }

    pub fn targets(mut self, targets: &[&str]) -> Self {
        self.raw.sync.targets = targets.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.raw.sync.ignore.push(pattern.to_string());
        self
    }

    pub fn ignore_regex(mut self, regex: &str) -> Self {
        self.raw.sync.ignore_regex = Some(regex.to_string());
        self
    }

    pub fn max_concurrent(mut self, n: usize) -> Self {
        self.raw.sync.max_concurrent = n;
        self
    }

    pub fn command_timeout(mut self, timeout: &str) -> Self {
        self.raw.sync.command_timeout = Some(timeout.to_string());
        self
    }

    pub fn serialize_overlapping(mut self, on: bool) -> Self {
        self.raw.sync.serialize_overlapping = on;
        self
    }

    pub fn initial_scan(mut self, on: bool) -> Self {
        self.raw.sync.initial_scan = on;
        self
    }

    pub fn shutdown_grace(mut self, grace: &str) -> Self {
        self.raw.sync.shutdown_grace = grace.to_string();
        self
    }

    pub fn bridge(mut self, target: &str, bridge: BridgeConfig) -> Self {
        self.raw.target.insert(target.to_string(), bridge);
        self
    }

    pub fn build(self) -> SyncSettings {
        SyncSettings::try_from(self.raw).expect("Failed to build valid settings from builder")
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `BridgeConfig`, starting from the adb profile.
pub struct BridgeBuilder {
    bridge: BridgeConfig,
}

impl BridgeBuilder {
    pub fn adb() -> Self {
        Self {
            bridge: BridgeConfig::adb(),
        }
    }

    pub fn program(mut self, program: &str) -> Self {
        self.bridge.program = program.to_string();
        self
    }

    pub fn prefix_args(mut self, args: &[&str]) -> Self {
        self.bridge.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn build(self) -> BridgeConfig {
        self.bridge
    }
}

/// Builder for `SyncConfig` without touching disk.
pub struct SyncConfigBuilder {
    project_root: PathBuf,
    debug_res_dir: BTreeMap<String, Value>,
    settings: SyncSettings,
}

impl SyncConfigBuilder {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            debug_res_dir: BTreeMap::new(),
            settings: SyncSettings::default(),
        }
    }

    /// Add a `DebugResDir` entry.
    pub fn target(mut self, name: &str, remote_base: &str) -> Self {
        self.debug_res_dir
            .insert(name.to_string(), Value::String(remote_base.to_string()));
        self
    }

    /// Add a raw `DebugResDir` value, e.g. a number or `null`.
    pub fn target_value(mut self, name: &str, value: Value) -> Self {
        self.debug_res_dir.insert(name.to_string(), value);
        self
    }

    pub fn settings(mut self, settings: SyncSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> SyncConfig {
        SyncConfig::new(self.project_root, self.debug_res_dir, self.settings)
    }
}
