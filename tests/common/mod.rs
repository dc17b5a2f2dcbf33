#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub use syncres_test_utils::{init_tracing, with_timeout};

/// Write a minimal project (`config.json` + `engine.cfg`) into `dir`.
pub fn write_project(dir: &Path, config_json: &str) {
    fs::write(dir.join("config.json"), config_json).expect("write config.json");
    fs::write(dir.join("engine.cfg"), "").expect("write engine.cfg");
}

/// Canonical path of a temp dir, so it matches what the watcher reports.
pub fn canonical(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).expect("canonicalize temp dir")
}
