// src/config/validate.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::config::model::{BridgeConfig, RawSettingsFile, SyncSettings, DEFAULT_TARGET};
use crate::errors::ConfigError;
use crate::watch::patterns::IgnoreMatcher;

impl TryFrom<RawSettingsFile> for SyncSettings {
    type Error = ConfigError;

    fn try_from(raw: RawSettingsFile) -> std::result::Result<Self, Self::Error> {
        let RawSettingsFile { sync, target } = raw;

        ensure_has_targets(&sync.targets)?;
        let bridges = resolve_bridges(&sync.targets, target)?;

        let ignore = IgnoreMatcher::new(&sync.ignore, sync.ignore_regex.as_deref())
            .map_err(|e| ConfigError::Invalid(format!("[sync].ignore: {e:#}")))?;

        let command_timeout = sync
            .command_timeout
            .as_deref()
            .map(|s| {
                parse_duration(s)
                    .map_err(|e| ConfigError::Invalid(format!("[sync].command_timeout: {e}")))
            })
            .transpose()?;
        if command_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid(
                "[sync].command_timeout must be greater than zero".to_string(),
            ));
        }

        let shutdown_grace = parse_duration(&sync.shutdown_grace)
            .map_err(|e| ConfigError::Invalid(format!("[sync].shutdown_grace: {e}")))?;

        Ok(SyncSettings::new_unchecked(
            sync.targets,
            ignore,
            sync.max_concurrent,
            command_timeout,
            sync.serialize_overlapping,
            sync.initial_scan,
            shutdown_grace,
            bridges,
        ))
    }
}

fn ensure_has_targets(targets: &[String]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Invalid(
            "[sync].targets must name at least one target".to_string(),
        ));
    }
    if targets.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::Invalid(
            "[sync].targets contains an empty target name".to_string(),
        ));
    }
    Ok(())
}

/// Every listed target needs a bridge. Android gets adb when none is given.
fn resolve_bridges(
    targets: &[String],
    mut declared: BTreeMap<String, BridgeConfig>,
) -> Result<BTreeMap<String, BridgeConfig>, ConfigError> {
    let mut bridges = BTreeMap::new();

    for target in targets {
        let bridge = match declared.remove(target) {
            Some(bridge) => bridge,
            None if target == DEFAULT_TARGET => BridgeConfig::adb(),
            None => {
                return Err(ConfigError::Invalid(format!(
                    "target '{target}' is listed in [sync].targets but has no [target.{target}] section"
                )));
            }
        };
        validate_bridge(target, &bridge)?;
        bridges.insert(target.clone(), bridge);
    }

    for unused in declared.keys() {
        tracing::warn!(device = %unused, "bridge declared but not listed in [sync].targets; ignoring");
    }

    Ok(bridges)
}

fn validate_bridge(target: &str, bridge: &BridgeConfig) -> Result<(), ConfigError> {
    if bridge.program.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "[target.{target}].program must not be empty"
        )));
    }

    let templates = [
        ("push", &bridge.push),
        ("remove", &bridge.remove),
        ("remove_dir", &bridge.remove_dir),
        ("make_dirs", &bridge.make_dirs),
    ];
    for (name, template) in templates {
        if template.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "[target.{target}].{name} must contain at least one argument"
            )));
        }
    }
    Ok(())
}

/// Check the `DebugResDir` keys of `config.json`.
pub(crate) fn validate_debug_res_dir(map: &BTreeMap<String, Value>) -> Result<(), String> {
    if map.keys().any(|k| k.is_empty()) {
        return Err("DebugResDir contains an empty target name".to_string());
    }
    Ok(())
}

/// Parse simple duration strings like `"500ms"`, `"3s"`, `"2m"`, `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => scaled_secs(value, 60),
        "h" => scaled_secs(value, 60 * 60),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

fn scaled_secs(value: u64, factor: u64) -> Result<Duration, String> {
    value
        .checked_mul(factor)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: {value} x {factor}s"))
}
