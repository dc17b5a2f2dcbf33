// src/watch/events.rs

//! Translation of native `notify` events into [`RawEvent`]s.
//!
//! `notify` reports what the OS reports, which is not always enough to tell
//! files from directories (e.g. `Remove(Any)` or renames on macOS). The
//! translator keeps the set of directories it has seen so removals can still
//! be classified after the path is gone.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind as NotifyKind};
use tracing::trace;

use crate::fs::FileSystem;
use crate::types::{EventKind, RawEvent};
use crate::watch::patterns::IgnoreMatcher;
use crate::watch::scan::scan_tree;

#[derive(Debug)]
pub struct EventTranslator {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    ignore: IgnoreMatcher,
    known_dirs: HashSet<PathBuf>,
}

impl EventTranslator {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, ignore: IgnoreMatcher) -> Self {
        Self {
            fs,
            root: root.into(),
            ignore,
            known_dirs: HashSet::new(),
        }
    }

    /// Record the effect of an event on the set of known directories.
    pub fn observe(&mut self, event: &RawEvent) {
        match event.kind {
            EventKind::AddDir => {
                self.known_dirs.insert(event.path.clone());
            }
            EventKind::UnlinkDir => {
                let gone = &event.path;
                self.known_dirs.retain(|d| !d.starts_with(gone));
            }
            _ => {}
        }
    }

    pub fn is_known_dir(&self, path: &Path) -> bool {
        self.known_dirs.contains(path)
    }

    /// Translate one notify event. Every returned event has already been
    /// passed through [`observe`](Self::observe).
    pub fn translate(&mut self, event: Event) -> Vec<RawEvent> {
        let mut out = Vec::new();

        match event.kind {
            NotifyKind::Create(kind) => {
                for path in &event.paths {
                    match kind {
                        CreateKind::File => out.push(RawEvent::new(EventKind::Add, path)),
                        CreateKind::Folder => self.appeared_dir(path, &mut out),
                        CreateKind::Any | CreateKind::Other => self.appeared(path, &mut out),
                    }
                }
            }

            NotifyKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::From => {
                    for path in &event.paths {
                        self.disappeared(path, &mut out);
                    }
                }
                RenameMode::To => {
                    for path in &event.paths {
                        self.appeared(path, &mut out);
                    }
                }
                RenameMode::Both => {
                    if let [from, to, ..] = event.paths.as_slice() {
                        self.disappeared(from, &mut out);
                        self.appeared(to, &mut out);
                    }
                }
                RenameMode::Any | RenameMode::Other => {
                    for path in &event.paths {
                        if self.fs.exists(path) {
                            self.appeared(path, &mut out);
                        } else {
                            self.disappeared(path, &mut out);
                        }
                    }
                }
            },

            NotifyKind::Modify(ModifyKind::Metadata(_)) => {
                for path in &event.paths {
                    out.push(RawEvent::new(EventKind::Raw, path));
                }
            }

            NotifyKind::Modify(_) => {
                for path in &event.paths {
                    let kind = if !self.is_known_dir(path) && self.fs.is_file(path) {
                        EventKind::Change
                    } else {
                        EventKind::Raw
                    };
                    out.push(RawEvent::new(kind, path));
                }
            }

            NotifyKind::Remove(kind) => {
                for path in &event.paths {
                    let raw_kind = match kind {
                        RemoveKind::File => EventKind::Unlink,
                        RemoveKind::Folder => EventKind::UnlinkDir,
                        RemoveKind::Any | RemoveKind::Other => {
                            if self.is_known_dir(path) {
                                EventKind::UnlinkDir
                            } else {
                                EventKind::Unlink
                            }
                        }
                    };
                    out.push(RawEvent::new(raw_kind, path));
                }
            }

            NotifyKind::Access(_) | NotifyKind::Any | NotifyKind::Other => {
                for path in &event.paths {
                    out.push(RawEvent::new(EventKind::Raw, path));
                }
            }
        }

        for raw in &out {
            self.observe(raw);
        }
        trace!(count = out.len(), "translated notify event");
        out
    }

    /// Something appeared at `path`; classify it by looking at the disk.
    fn appeared(&self, path: &Path, out: &mut Vec<RawEvent>) {
        if self.fs.is_dir(path) {
            self.appeared_dir(path, out);
        } else if self.fs.is_file(path) {
            out.push(RawEvent::new(EventKind::Add, path));
        }
        // Already gone again: nothing to mirror.
    }

    /// A directory appeared. Its contents may have been created (or moved
    /// in) before the OS watch covered it, so they are scanned as well.
    fn appeared_dir(&self, path: &Path, out: &mut Vec<RawEvent>) {
        out.extend(scan_tree(
            self.fs.as_ref(),
            &self.root,
            path,
            &self.ignore,
            true,
        ));
    }

    fn disappeared(&self, path: &Path, out: &mut Vec<RawEvent>) {
        let kind = if self.is_known_dir(path) {
            EventKind::UnlinkDir
        } else {
            EventKind::Unlink
        };
        out.push(RawEvent::new(kind, path));
    }
}

/// Convert a notify error into an `Error` event, attributed to the first
/// affected path (or the watch root when notify gives none).
pub fn error_event(root: &Path, err: &notify::Error) -> RawEvent {
    let path = err.paths.first().cloned().unwrap_or_else(|| root.to_path_buf());
    RawEvent::error(path, err.to_string())
}
