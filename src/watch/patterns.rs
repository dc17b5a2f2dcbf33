// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

/// Compiled ignore rules for project-relative paths (e.g. `"assets/a.png"`).
///
/// - Glob patterns are tested against the path and every ancestor
///   directory of it, so `".git"` also drops `".git/HEAD"`.
/// - The optional regex is tested against the full relative path only.
///
/// The project root itself (`""`) is never ignored.
#[derive(Clone)]
pub struct IgnoreMatcher {
    globs: Option<GlobSet>,
    regex: Option<Regex>,
    patterns: Vec<String>,
}

impl fmt::Debug for IgnoreMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreMatcher")
            .field("patterns", &self.patterns)
            .field("regex", &self.regex.as_ref().map(|r| r.as_str()))
            .finish()
    }
}

impl IgnoreMatcher {
    /// Matcher that ignores nothing.
    pub fn empty() -> Self {
        Self {
            globs: None,
            regex: None,
            patterns: Vec::new(),
        }
    }

    pub fn new(globs: &[String], regex: Option<&str>) -> Result<Self> {
        let glob_set = if globs.is_empty() {
            None
        } else {
            Some(build_globset(globs)?)
        };

        let regex = regex
            .filter(|r| !r.is_empty())
            .map(|r| Regex::new(r).with_context(|| format!("invalid ignore regex: {r}")))
            .transpose()?;

        Ok(Self {
            globs: glob_set,
            regex,
            patterns: globs.to_vec(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_none() && self.regex.is_none()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn regex(&self) -> Option<&str> {
        self.regex.as_ref().map(|r| r.as_str())
    }

    /// Returns true if `rel_path` (forward slashes) should not be synced.
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        if rel_path.is_empty() {
            return false;
        }

        if let Some(regex) = &self.regex {
            if regex.is_match(rel_path) {
                return true;
            }
        }

        let Some(globs) = &self.globs else {
            return false;
        };

        if globs.is_match(rel_path) {
            return true;
        }
        // Ancestors: "a", "a/b" for "a/b/c".
        rel_path
            .match_indices('/')
            .any(|(idx, _)| globs.is_match(&rel_path[..idx]))
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(globs: &[&str], regex: Option<&str>) -> IgnoreMatcher {
        let globs: Vec<String> = globs.iter().map(|s| s.to_string()).collect();
        IgnoreMatcher::new(&globs, regex).unwrap()
    }

    #[test]
    fn empty_matcher_ignores_nothing() {
        let m = IgnoreMatcher::empty();
        assert!(m.is_empty());
        assert!(!m.is_ignored("assets/icon.png"));
    }

    #[test]
    fn glob_matches_path_and_descendants() {
        let m = matcher(&[".git", "*.import"], None);
        assert!(m.is_ignored(".git"));
        assert!(m.is_ignored(".git/objects/ab/cdef"));
        assert!(m.is_ignored("assets/icon.png.import"));
        assert!(!m.is_ignored("assets/icon.png"));
        assert!(!m.is_ignored(""));
    }

    #[test]
    fn regex_matches_full_relative_path() {
        let m = matcher(&[], Some(r"\.swp$"));
        assert!(m.is_ignored("scenes/main.tscn.swp"));
        assert!(!m.is_ignored("scenes/main.tscn"));
    }

    #[test]
    fn invalid_patterns_are_errors() {
        assert!(IgnoreMatcher::new(&["a/[".to_string()], None).is_err());
        assert!(IgnoreMatcher::new(&[], Some("(")).is_err());
    }
}
