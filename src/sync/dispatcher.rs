// src/sync/dispatcher.rs

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::exec::{CommandExecutor, CommandPool, PoolOptions};
use crate::sync::remote::{join_remote, render_command};
use crate::types::{CommandReport, RemoteCommand, SyncAction};

/// Fans a [`SyncAction`] out to every target that has a remote base path
/// and submits the resulting commands to the pool.
#[derive(Debug)]
pub struct Dispatcher {
    config: Arc<SyncConfig>,
    pool: CommandPool,
}

impl Dispatcher {
    pub fn new(config: Arc<SyncConfig>, executor: Arc<dyn CommandExecutor>) -> Self {
        let pool = CommandPool::new(executor, PoolOptions::from_settings(config.settings()));
        Self { config, pool }
    }

    /// The commands `action` turns into, in target order. Targets without a
    /// remote base path contribute nothing.
    pub fn plan(&self, action: &SyncAction) -> Vec<RemoteCommand> {
        let settings = self.config.settings();
        let mut commands = Vec::new();

        let Some(source) = action.source.to_str() else {
            warn!(path = ?action.source, "local path is not valid UTF-8; skipping");
            return commands;
        };

        for target in &settings.targets {
            let Some(base) = self.config.resolve_target(target) else {
                debug!(device = %target, rel = %action.relative_path, "no remote path configured; skipping");
                continue;
            };
            let Some(bridge) = settings.bridge(target) else {
                debug!(device = %target, "no bridge for target; skipping");
                continue;
            };

            let remote_path = join_remote(base, &action.relative_path);
            commands.push(render_command(
                target,
                bridge,
                action.kind,
                source,
                &remote_path,
            ));
        }

        commands
    }

    /// Submit every planned command and return without waiting for them.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, action: &SyncAction) -> Vec<JoinHandle<CommandReport>> {
        let commands = self.plan(action);
        if commands.is_empty() {
            debug!(kind = %action.kind, rel = %action.relative_path, "nothing to dispatch");
            return Vec::new();
        }

        commands
            .into_iter()
            .map(|command| self.pool.submit(command))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use serde_json::{json, Value};

    use super::*;
    use crate::config::SyncSettings;
    use crate::exec::ProcessExecutor;
    use crate::types::ActionKind;

    fn dispatcher(debug_res_dir: Value) -> Dispatcher {
        let map: BTreeMap<String, Value> = serde_json::from_value(debug_res_dir).unwrap();
        let config = SyncConfig::new("/proj", map, SyncSettings::default());
        Dispatcher::new(Arc::new(config), Arc::new(ProcessExecutor::new()))
    }

    fn action(kind: ActionKind, rel: &str) -> SyncAction {
        SyncAction {
            kind,
            source: PathBuf::from("/proj").join(rel),
            relative_path: rel.to_string(),
        }
    }

    #[test]
    fn push_plans_one_adb_push() {
        let d = dispatcher(json!({ "Android": "/sdcard/app" }));
        let plan = d.plan(&action(ActionKind::Push, "assets/icon.png"));

        assert_eq!(plan.len(), 1);
        let cmd = &plan[0];
        assert_eq!(cmd.program, "adb");
        assert_eq!(cmd.remote_path, "/sdcard/app/assets/icon.png");
        assert_eq!(
            cmd.args,
            vec!["push", "/proj/assets/icon.png", "/sdcard/app/assets/icon.png"]
        );
    }

    #[test]
    fn make_dirs_uses_mkdir_p() {
        let d = dispatcher(json!({ "Android": "/sdcard/app/" }));
        let plan = d.plan(&action(ActionKind::MakeDirs, "assets/new"));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].args[..3], ["shell", "mkdir", "-p"]);
        assert_eq!(plan[0].remote_path, "/sdcard/app/assets/new");
    }

    #[test]
    fn unresolved_target_plans_nothing() {
        for map in [json!({}), json!({ "Android": "" }), json!({ "Android": 3 })] {
            let d = dispatcher(map);
            assert!(d.plan(&action(ActionKind::Push, "a.png")).is_empty());
        }
    }

    #[tokio::test]
    async fn dispatch_without_target_is_a_no_op() {
        let d = dispatcher(json!({ "iOS": "/var/app" }));
        assert!(d.dispatch(&action(ActionKind::Remove, "a.png")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_source_plans_nothing() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let d = dispatcher(json!({ "Android": "/sdcard/app" }));
        let action = SyncAction {
            kind: ActionKind::Push,
            source: PathBuf::from("/proj").join(OsStr::from_bytes(b"bad\xff.png")),
            relative_path: "bad.png".to_string(),
        };
        assert!(d.plan(&action).is_empty());
    }
}
