// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace admission control (spec §4.5 steps 4–5): symlink-safe
//! resolution of a request's `workspace_path` against an optional
//! `allowed_roots` allowlist.

use std::path::{Path, PathBuf};

use td_core::{is_filesystem_root, ErrorCode, ErrorInfo};

/// Resolve and admit `workspace_path` (spec §4.5 steps 4–5).
///
/// Canonicalizes through symlinks, rejects it if `allowed_roots` is
/// non-empty and the canonical path does not equal or fall strictly
/// beneath some canonical root, and finally confirms the result is a
/// directory. A symlink inside an allowed root that points outside it
/// is rejected because canonicalization resolves it before the
/// containment check runs.
pub fn resolve_workspace(
    workspace_path: &str,
    allowed_roots: &Option<Vec<String>>,
) -> Result<PathBuf, ErrorInfo> {
    let canonical = std::fs::canonicalize(workspace_path).map_err(|_| {
        ErrorInfo::new(
            ErrorCode::WorkspaceNotFound,
            format!("workspace path does not exist: {workspace_path}"),
        )
    })?;

    if let Some(roots) = allowed_roots {
        if !roots.is_empty() {
            admit_against_roots(&canonical, roots)?;
        }
    }

    if !canonical.is_dir() {
        return Err(ErrorInfo::new(
            ErrorCode::WorkspaceNotFound,
            format!("workspace path is not a directory: {}", canonical.display()),
        ));
    }

    Ok(canonical)
}

fn admit_against_roots(canonical: &Path, roots: &[String]) -> Result<(), ErrorInfo> {
    let mut canonical_roots = Vec::with_capacity(roots.len());
    for root in roots {
        let root_path = Path::new(root);
        let resolved = std::fs::canonicalize(root_path).unwrap_or_else(|_| root_path.to_path_buf());
        if is_filesystem_root(&resolved) {
            return Err(ErrorInfo::new(
                ErrorCode::WorkspaceInvalid,
                "allowed_roots contains the filesystem root",
            ));
        }
        canonical_roots.push(resolved);
    }

    let admitted = canonical_roots
        .iter()
        .any(|root| canonical == root || canonical.starts_with(root));

    if !admitted {
        return Err(ErrorInfo::new(
            ErrorCode::WorkspaceInvalid,
            format!(
                "workspace {} is outside the configured allowed_roots",
                canonical.display()
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
