// src/watch/scan.rs

//! Directory walk used for the initial scan and for directories that appear
//! while watching (their contents may predate the OS watch on them).

use std::path::Path;

use tracing::warn;

use crate::fs::FileSystem;
use crate::types::{EventKind, RawEvent};
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::IgnoreMatcher;

/// Walk `dir` and return `AddDir` / `Add` events for everything below it.
///
/// - `dir` itself is reported first when `include_self` is set.
/// - A directory is always reported before its children.
/// - Ignored directories (relative to `root`) are pruned, not descended.
/// - Unreadable directories produce an `Error` event and are skipped.
pub fn scan_tree(
    fs: &dyn FileSystem,
    root: &Path,
    dir: &Path,
    ignore: &IgnoreMatcher,
    include_self: bool,
) -> Vec<RawEvent> {
    let mut events = Vec::new();
    if include_self {
        events.push(RawEvent::new(EventKind::AddDir, dir));
    }

    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let entries = match fs.read_dir(&current) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = ?current, error = %err, "failed to read directory during scan");
                events.push(RawEvent::error(&current, format!("{err:#}")));
                continue;
            }
        };

        // Directories are pushed in reverse so the walk visits them in
        // listing order.
        let mut subdirs = Vec::new();
        for path in entries {
            let ignored = relative_str(root, &path)
                .map(|rel| ignore.is_ignored(&rel))
                .unwrap_or(false);
            if ignored {
                continue;
            }

            if fs.is_dir(&path) {
                events.push(RawEvent::new(EventKind::AddDir, &path));
                subdirs.push(path);
            } else if fs.is_file(&path) {
                events.push(RawEvent::new(EventKind::Add, &path));
            }
        }
        stack.extend(subdirs.into_iter().rev());
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::PathBuf;

    fn kinds(events: &[RawEvent]) -> Vec<(EventKind, PathBuf)> {
        events.iter().map(|e| (e.kind, e.path.clone())).collect()
    }

    #[test]
    fn parents_come_before_children() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/config.json", b"{}".to_vec());
        fs.add_file("/proj/assets/icon.png", b"png".to_vec());
        fs.add_file("/proj/assets/sfx/boom.wav", b"wav".to_vec());

        let events = scan_tree(
            &fs,
            Path::new("/proj"),
            Path::new("/proj"),
            &IgnoreMatcher::empty(),
            true,
        );

        assert_eq!(
            kinds(&events),
            vec![
                (EventKind::AddDir, PathBuf::from("/proj")),
                (EventKind::AddDir, PathBuf::from("/proj/assets")),
                (EventKind::Add, PathBuf::from("/proj/config.json")),
                (EventKind::Add, PathBuf::from("/proj/assets/icon.png")),
                (EventKind::AddDir, PathBuf::from("/proj/assets/sfx")),
                (EventKind::Add, PathBuf::from("/proj/assets/sfx/boom.wav")),
            ]
        );
    }

    #[test]
    fn ignored_directories_are_pruned() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/.git/HEAD", b"ref".to_vec());
        fs.add_file("/proj/main.gd", b"extends Node".to_vec());

        let ignore = IgnoreMatcher::new(&[".git".to_string()], None).unwrap();
        let events = scan_tree(&fs, Path::new("/proj"), Path::new("/proj"), &ignore, false);

        assert_eq!(
            kinds(&events),
            vec![(EventKind::Add, PathBuf::from("/proj/main.gd"))]
        );
    }

    #[test]
    fn unreadable_directory_yields_error_event() {
        let fs = MockFileSystem::new();
        let events = scan_tree(
            &fs,
            Path::new("/missing"),
            Path::new("/missing"),
            &IgnoreMatcher::empty(),
            false,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Error);
    }
}
