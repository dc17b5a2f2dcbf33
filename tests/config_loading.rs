// tests/config_loading.rs

mod common;
use crate::common::{init_tracing, write_project};

use std::fs;
use std::time::Duration;

use syncres::cli::CliArgs;
use syncres::config::{load, load_with};
use syncres::errors::{ConfigError, SyncError};
use syncres::fs::RealFileSystem;
use tempfile::tempdir;

#[test]
fn project_with_debug_res_dir_resolves_android() {
    init_tracing();
    let dir = tempdir().unwrap();
    write_project(
        dir.path(),
        r#"{ "Name": "demo", "DebugResDir": { "Android": "/sdcard/app" } }"#,
    );

    let cfg = load(dir.path()).unwrap();
    assert_eq!(cfg.resolve_target("Android"), Some("/sdcard/app"));
    assert_eq!(cfg.resolve_target("iOS"), None);
    let active: Vec<_> = cfg.active_targets().collect();
    assert_eq!(active, vec![("Android", "/sdcard/app")]);
}

#[test]
fn missing_engine_marker_is_reported() {
    init_tracing();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.json"), "{}").unwrap();

    match load(dir.path()) {
        Err(ConfigError::Missing { path }) => assert!(path.ends_with("engine.cfg")),
        other => panic!("expected Missing, got {other:?}"),
    }
}

#[test]
fn directory_named_like_config_is_not_a_config() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("config.json")).unwrap();
    fs::write(dir.path().join("engine.cfg"), "").unwrap();

    assert!(matches!(
        load(dir.path()),
        Err(ConfigError::Missing { path }) if path.ends_with("config.json")
    ));
}

#[test]
fn malformed_config_json_is_fatal() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), r#"{ "DebugResDir": { "Android": "/sdcard/app" "#);

    assert!(matches!(
        load(dir.path()),
        Err(ConfigError::Malformed { .. })
    ));
}

#[test]
fn project_settings_file_is_picked_up() {
    let dir = tempdir().unwrap();
    write_project(
        dir.path(),
        r#"{ "DebugResDir": { "Android": "/sdcard/app", "Harmony": "/data/app" } }"#,
    );
    fs::write(
        dir.path().join("syncres.toml"),
        r#"
[sync]
targets = ["Android", "Harmony"]
ignore = ["**/*.meta"]
max_concurrent = 4
command_timeout = "30s"

[target.Harmony]
program = "hdc"
push = ["file", "send", "{src}", "{dst}"]
"#,
    )
    .unwrap();

    let cfg = load(dir.path()).unwrap();
    let settings = cfg.settings();
    assert_eq!(settings.max_concurrent, 4);
    assert_eq!(settings.command_timeout, Some(Duration::from_secs(30)));
    assert!(settings.ignore.is_ignored("textures/a.png.meta"));

    let harmony = settings.bridge("Harmony").unwrap();
    assert_eq!(harmony.program, "hdc");
    assert_eq!(harmony.push, vec!["file", "send", "{src}", "{dst}"]);
    // Unset templates fall back to the adb-style defaults.
    assert_eq!(harmony.make_dirs, vec!["shell", "mkdir", "-p", "{dst_quoted}"]);
    assert_eq!(cfg.active_targets().count(), 2);
}

#[test]
fn explicit_settings_path_must_exist() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), "{}");
    let missing = dir.path().join("nope.toml");

    assert!(matches!(
        load_with(&RealFileSystem, dir.path(), Some(&missing)),
        Err(ConfigError::Missing { .. })
    ));
}

#[test]
fn target_without_bridge_is_rejected() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), "{}");
    fs::write(
        dir.path().join("syncres.toml"),
        "[sync]\ntargets = [\"Android\", \"iOS\"]\n",
    )
    .unwrap();

    assert!(matches!(load(dir.path()), Err(ConfigError::Invalid(_))));
}

#[tokio::test]
async fn run_fails_before_watching_without_engine_marker() {
    init_tracing();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.json"), "{}").unwrap();

    let args = CliArgs {
        project: dir.path().to_path_buf(),
        settings: None,
        log_level: None,
        dry_run: false,
    };

    match syncres::run(args).await {
        Err(SyncError::Config(ConfigError::Missing { path })) => {
            assert!(path.ends_with("engine.cfg"))
        }
        other => panic!("expected a missing-file error, got {other:?}"),
    }
}

#[tokio::test]
async fn dry_run_validates_and_exits() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), r#"{ "DebugResDir": { "Android": "/sdcard/app" } }"#);

    let args = CliArgs {
        project: dir.path().to_path_buf(),
        settings: None,
        log_level: None,
        dry_run: true,
    };
    syncres::run(args).await.unwrap();
}
