// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod sync;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::resolve_project_root;
use crate::config::{load_with, SyncConfig};
use crate::engine::{Runtime, RuntimeEvent};
use crate::errors::Result;
use crate::exec::ProcessExecutor;
use crate::fs::RealFileSystem;
use crate::sync::remote::render_command;
use crate::types::ActionKind;
use crate::watch::{spawn_watcher, WatchOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the file watcher
/// - the runtime and its command executor
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let requested = resolve_project_root(&args.project);
    // One canonical root for both the watcher and the normalizer, so the
    // paths notify reports always strip cleanly.
    let project_root = std::fs::canonicalize(&requested).unwrap_or(requested);

    let cfg = load_with(&RealFileSystem, &project_root, args.settings.as_deref())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let config = Arc::new(cfg);

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(256);

    let _watcher_handle = spawn_watcher(
        WatchOptions {
            root: config.project_root().to_path_buf(),
            ignore: config.settings().ignore.clone(),
            initial_scan: config.settings().initial_scan,
        },
        Arc::new(RealFileSystem),
        rt_tx.clone(),
    )?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }
    drop(rt_tx);

    let runtime = Runtime::new(config, Arc::new(ProcessExecutor::new()), rt_rx);
    let summary = runtime.run().await?;
    debug!(?summary, "run finished");
    Ok(())
}

/// Print the resolved project, targets and the commands each action kind
/// would run.
fn print_dry_run(cfg: &SyncConfig) {
    let settings = cfg.settings();

    println!("syncres dry-run");
    println!("  project = {}", cfg.project_root().display());
    if !settings.ignore.is_empty() {
        println!("  ignore = {:?}", settings.ignore.patterns());
        if let Some(re) = settings.ignore.regex() {
            println!("  ignore_regex = {re}");
        }
    }
    println!("  max_concurrent = {}", settings.max_concurrent);
    if let Some(timeout) = settings.command_timeout {
        println!("  command_timeout = {timeout:?}");
    }
    println!("  serialize_overlapping = {}", settings.serialize_overlapping);
    println!();

    println!("targets ({}):", settings.targets.len());
    for target in &settings.targets {
        let Some(base) = cfg.resolve_target(target) else {
            println!("  - {target}: no DebugResDir entry (skipped)");
            continue;
        };
        println!("  - {target} -> {base}");

        let Some(bridge) = settings.bridge(target) else {
            continue;
        };
        let sample_src = format!("{}/<file>", cfg.project_root().display());
        let sample_dst = format!("{}/<file>", base.trim_end_matches('/'));
        for kind in [
            ActionKind::Push,
            ActionKind::Remove,
            ActionKind::RemoveDir,
            ActionKind::MakeDirs,
        ] {
            let cmd = render_command(target, bridge, kind, &sample_src, &sample_dst);
            println!("      {kind}: {}", cmd.command_line());
        }
    }

    info!("dry-run complete (no watching)");
}
