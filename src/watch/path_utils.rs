// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again. Deleted paths cannot be
///   canonicalized, so their parent is tried instead.
///
/// Returns `None` if the path cannot be related to `root` or is not valid
/// UTF-8. The root itself maps to `""`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return to_slash(rel);
    }

    let root_canon = root.canonicalize().ok()?;

    if let Ok(path_canon) = path.canonicalize() {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return to_slash(rel);
        }
    }

    // The path may already be gone (unlink events).
    let parent = path.parent()?.canonicalize().ok()?;
    let name = path.file_name()?;
    let rel = parent.join(name);
    rel.strip_prefix(&root_canon).ok().and_then(to_slash)
}

/// Join path components with `/` regardless of host separator.
///
/// `None` if any component is not valid UTF-8.
pub fn to_slash(rel: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    parts.map(|p| p.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn strips_root_and_uses_forward_slashes() {
        let root = PathBuf::from("/proj");
        let path = root.join("assets").join("icon.png");
        assert_eq!(relative_str(&root, &path).as_deref(), Some("assets/icon.png"));
    }

    #[test]
    fn root_itself_is_empty() {
        let root = PathBuf::from("/proj");
        assert_eq!(relative_str(&root, &root).as_deref(), Some(""));
    }

    #[test]
    fn unrelated_path_is_none() {
        let root = PathBuf::from("/definitely/not/a/real/root");
        assert_eq!(relative_str(&root, Path::new("/elsewhere/file")), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_have_no_relative_form() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = PathBuf::from("/proj");
        let path = root.join(OsStr::from_bytes(b"bad\xffname.png"));
        assert_eq!(relative_str(&root, &path), None);
    }
}
