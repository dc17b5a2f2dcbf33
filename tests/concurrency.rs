// tests/concurrency.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use syncres::errors::CommandError;
use syncres::sync::Dispatcher;
use syncres::types::{ActionKind, SyncAction};
use syncres_test_utils::{FakeExecutor, SettingsBuilder, SyncConfigBuilder};

fn action(kind: ActionKind, rel: &str) -> SyncAction {
    SyncAction {
        kind,
        source: PathBuf::from("/proj").join(rel),
        relative_path: rel.to_string(),
    }
}

fn dispatcher(fake: Arc<FakeExecutor>, settings: SettingsBuilder) -> Dispatcher {
    let cfg = SyncConfigBuilder::new("/proj")
        .target("Android", "/sdcard/app")
        .settings(settings.build())
        .build();
    Dispatcher::new(Arc::new(cfg), fake)
}

/// 100 distinct files: all commands are in flight at once (the barrier only
/// opens when 100 are waiting) and one failure does not hold back the rest.
#[tokio::test]
async fn hundred_distinct_adds_run_concurrently() {
    init_tracing();
    let fake = Arc::new(
        FakeExecutor::new()
            .with_gate(100)
            .fail_path("/sdcard/app/f42.png", 1),
    );
    let d = dispatcher(fake.clone(), SettingsBuilder::new());

    let mut handles = Vec::new();
    for i in 0..100 {
        handles.extend(d.dispatch(&action(ActionKind::Push, &format!("f{i}.png"))));
    }
    assert_eq!(handles.len(), 100);

    let mut ok = 0;
    let mut failed = Vec::new();
    for h in handles {
        let report = with_timeout(h).await.unwrap();
        match report.result {
            Ok(_) => ok += 1,
            Err(CommandError::Failed { code, .. }) => failed.push((report.command.remote_path, code)),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(ok, 99);
    assert_eq!(failed, vec![("/sdcard/app/f42.png".to_string(), 1)]);
    assert_eq!(fake.max_in_flight(), 100);
    assert_eq!(fake.finished().len(), 100);
}

#[tokio::test]
async fn max_concurrent_bounds_in_flight_commands() {
    let fake = Arc::new(FakeExecutor::new().with_delay(Duration::from_millis(20)));
    let d = dispatcher(fake.clone(), SettingsBuilder::new().max_concurrent(3));

    let mut handles = Vec::new();
    for i in 0..12 {
        handles.extend(d.dispatch(&action(ActionKind::Push, &format!("f{i}.png"))));
    }
    for h in handles {
        assert!(with_timeout(h).await.unwrap().is_success());
    }

    assert_eq!(fake.executed().len(), 12);
    assert!(fake.max_in_flight() <= 3, "max in flight was {}", fake.max_in_flight());
}

#[tokio::test]
async fn overlapping_paths_run_in_submission_order() {
    let fake = Arc::new(FakeExecutor::new().with_delay(Duration::from_millis(30)));
    let d = dispatcher(fake.clone(), SettingsBuilder::new());

    // Directory removal, then a re-created file inside it, then the same
    // file again: each must wait for the previous one.
    let mut handles = Vec::new();
    handles.extend(d.dispatch(&action(ActionKind::RemoveDir, "assets")));
    handles.extend(d.dispatch(&action(ActionKind::MakeDirs, "assets")));
    handles.extend(d.dispatch(&action(ActionKind::Push, "assets/icon.png")));
    handles.extend(d.dispatch(&action(ActionKind::Push, "assets/icon.png")));
    for h in handles {
        with_timeout(h).await.unwrap();
    }

    let kinds: Vec<ActionKind> = fake.executed().iter().map(|c| c.action).collect();
    assert_eq!(
        kinds,
        vec![
            ActionKind::RemoveDir,
            ActionKind::MakeDirs,
            ActionKind::Push,
            ActionKind::Push
        ]
    );
    assert_eq!(fake.max_in_flight(), 1);
}

#[tokio::test]
async fn unrelated_paths_are_not_serialized() {
    // Both commands must be running together for the barrier to open.
    let fake = Arc::new(FakeExecutor::new().with_gate(2));
    let d = dispatcher(fake.clone(), SettingsBuilder::new());

    let mut handles = d.dispatch(&action(ActionKind::Push, "assets/a.png"));
    handles.extend(d.dispatch(&action(ActionKind::Push, "assets2/a.png")));
    for h in handles {
        assert!(with_timeout(h).await.unwrap().is_success());
    }
    assert_eq!(fake.max_in_flight(), 2);
}

#[tokio::test]
async fn serialization_can_be_disabled() {
    let fake = Arc::new(FakeExecutor::new().with_gate(2));
    let d = dispatcher(
        fake.clone(),
        SettingsBuilder::new().serialize_overlapping(false),
    );

    let mut handles = d.dispatch(&action(ActionKind::MakeDirs, "assets"));
    handles.extend(d.dispatch(&action(ActionKind::Push, "assets/a.png")));
    for h in handles {
        with_timeout(h).await.unwrap();
    }
    assert_eq!(fake.max_in_flight(), 2);
}

#[tokio::test]
async fn slow_commands_time_out() {
    let fake = Arc::new(FakeExecutor::new().with_delay(Duration::from_secs(30)));
    let d = dispatcher(fake.clone(), SettingsBuilder::new().command_timeout("50ms"));

    let h = d
        .dispatch(&action(ActionKind::Push, "big.bin"))
        .into_iter()
        .next()
        .unwrap();
    let report = with_timeout(h).await.unwrap();
    assert!(matches!(report.result, Err(CommandError::TimedOut(_))));
}
