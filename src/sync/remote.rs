// src/sync/remote.rs

//! Remote path arithmetic and bridge command rendering.
//!
//! Remote devices are POSIX-like, so remote paths always use `/`.

use crate::config::BridgeConfig;
use crate::types::{ActionKind, RemoteCommand};

/// Join a remote base path and a project-relative path.
///
/// Empty and `.` segments of `rel` are dropped and backslashes become `/`,
/// so `join_remote("/sdcard/app/", "assets/icon.png")` is
/// `"/sdcard/app/assets/icon.png"`. An empty `rel` yields the base itself.
pub fn join_remote(base: &str, rel: &str) -> String {
    let base = normalize_base(base);
    let rel = rel.replace('\\', "/");

    let mut joined = base.clone();
    for segment in rel.split('/').filter(|s| !s.is_empty() && *s != ".") {
        joined.push('/');
        joined.push_str(segment);
    }

    if joined.is_empty() { "/".to_string() } else { joined }
}

/// Inverse of [`join_remote`]: the part of `remote` below `base`, or `None`
/// if `remote` is not under `base`.
pub fn strip_remote_base<'a>(base: &str, remote: &'a str) -> Option<&'a str> {
    let base = normalize_base(base);
    if remote == base || (base.is_empty() && remote == "/") {
        return Some("");
    }
    remote.strip_prefix(base.as_str())?.strip_prefix('/')
}

/// Base path with `/` separators and without trailing slashes.
/// `"/"` becomes `""`.
fn normalize_base(base: &str) -> String {
    base.replace('\\', "/").trim_end_matches('/').to_string()
}

/// Quote `s` for a POSIX shell on the device.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Do two remote paths touch the same subtree?
pub fn paths_overlap(a: &str, b: &str) -> bool {
    let a_trim = a.trim_end_matches('/');
    let b_trim = b.trim_end_matches('/');
    a_trim == b_trim
        || a.starts_with(&format!("{b_trim}/"))
        || b.starts_with(&format!("{a_trim}/"))
}

/// Render the bridge template for `action` into a concrete command.
///
/// `source` is the local absolute path; callers skip paths that are not
/// valid UTF-8 rather than passing a lossy rendering.
pub fn render_command(
    target: &str,
    bridge: &BridgeConfig,
    action: ActionKind,
    source: &str,
    remote_path: &str,
) -> RemoteCommand {
    let quoted = shell_quote(remote_path);
    let placeholders = [
        ("{src}", source),
        ("{dst_quoted}", quoted.as_str()),
        ("{dst}", remote_path),
    ];

    let args = bridge
        .args
        .iter()
        .chain(bridge.template(action))
        .map(|arg| substitute(arg, &placeholders))
        .collect();

    RemoteCommand {
        target: target.to_string(),
        action,
        remote_path: remote_path.to_string(),
        program: bridge.program.clone(),
        args,
    }
}

/// Replace placeholders in a single left-to-right pass. Substituted text is
/// copied verbatim and never scanned again.
fn substitute(template: &str, placeholders: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match placeholders.iter().find(|(name, _)| tail.starts_with(*name)) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
