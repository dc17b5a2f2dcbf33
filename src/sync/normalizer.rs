// src/sync/normalizer.rs

use std::path::PathBuf;

use tracing::{trace, warn};

use crate::config::SyncConfig;
use crate::types::{ActionKind, EventKind, RawEvent, SyncAction};
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::IgnoreMatcher;

/// Turns raw watch events into [`SyncAction`]s.
#[derive(Debug, Clone)]
pub struct EventNormalizer {
    root: PathBuf,
    ignore: IgnoreMatcher,
}

impl EventNormalizer {
    pub fn new(root: impl Into<PathBuf>, ignore: IgnoreMatcher) -> Self {
        Self {
            root: root.into(),
            ignore,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.project_root(), config.settings().ignore.clone())
    }

    /// Map one raw event to at most one action.
    ///
    /// `Ready`, `Raw` and `Error` never produce an action; neither do ignored
    /// paths, paths outside the project root or paths that are not UTF-8.
    pub fn normalize(&self, raw: &RawEvent) -> Option<SyncAction> {
        let kind = action_kind(raw.kind)?;

        if raw.path.to_str().is_none() {
            warn!(path = ?raw.path, "path is not valid UTF-8; not syncing it");
            return None;
        }

        let Some(relative_path) = relative_str(&self.root, &raw.path) else {
            warn!(path = ?raw.path, root = ?self.root, "event path outside project root; dropping");
            return None;
        };

        if self.ignore.is_ignored(&relative_path) {
            trace!(rel = %relative_path, "ignored path");
            return None;
        }

        Some(SyncAction {
            kind,
            source: raw.path.clone(),
            relative_path,
        })
    }
}

/// The event-kind half of normalization.
pub fn action_kind(kind: EventKind) -> Option<ActionKind> {
    match kind {
        EventKind::Add | EventKind::Change => Some(ActionKind::Push),
        EventKind::Unlink => Some(ActionKind::Remove),
        EventKind::AddDir => Some(ActionKind::MakeDirs),
        EventKind::UnlinkDir => Some(ActionKind::RemoveDir),
        EventKind::Ready | EventKind::Raw | EventKind::Error => None,
    }
}
