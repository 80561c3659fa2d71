// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dangerous-root and filesystem-root checks shared by request validation
//! and workspace admission control.

use std::path::{Component, Path, PathBuf};

/// Roots that MUST NOT be used as, or contain, a workspace.
///
/// `/var` is intentionally absent: the macOS user-space temp directory
/// `/var/folders/...` must remain usable as a workspace.
pub const DANGEROUS_ROOTS: &[&str] = &[
    "/",
    "/etc",
    "/usr",
    "/System",
    "/bin",
    "/sbin",
    "/var/run",
    "/var/root",
    "/var/db",
    "/var/spool",
];

/// Collapse `.` and `..` components without touching the filesystem (the
/// path may not exist yet at validation time, so this cannot be
/// `std::fs::canonicalize`). A leading `..` past the root is dropped
/// rather than escaping it, matching how an absolute path would actually
/// resolve.
fn lexically_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    Some(Component::RootDir) | None => {}
                    _ => {
                        out.push(component);
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// True if `path`, after lexical resolution (spec §6), equals or is
/// contained (separator-prefixed) by any dangerous root.
///
/// This operates on the path as given — it does not touch the filesystem.
/// Callers that need to defeat symlink tricks must additionally canonicalize
/// before calling the separate admission check against `allowed_roots`.
pub fn is_dangerous_workspace_path(path: &Path) -> bool {
    let normalized = lexically_normalize(path);
    let s = normalized.to_string_lossy();
    for root in DANGEROUS_ROOTS {
        if *root == "/" {
            if s == "/" {
                return true;
            }
            continue;
        }
        if s == *root || s.starts_with(&format!("{root}/")) {
            return true;
        }
    }
    false
}

/// True if `path` is the filesystem root (`/` on Unix).
pub fn is_filesystem_root(path: &Path) -> bool {
    path.parent().is_none() && path.has_root()
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
