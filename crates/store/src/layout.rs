// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem layout for a single run's directory tree (spec §4.1, §6).
//!
//! ```text
//! <runs_root>/<run_id>/
//!     request.json              pending request; present until consumed
//!     request.processing.json   same bytes, present after atomic rename
//!     session.json              mutable session state machine document
//!     result.json               terminal result (presence == completion signal)
//!     output.txt                 full engine textual output (success only)
//!     context/, logs/, artifacts/  reserved for adapter use
//!     .session.lock, .result.lock  advisory lock files (presence-only)
//! ```

use std::path::{Path, PathBuf};

use td_core::RunId;

use crate::error::StoreError;

/// The run-directory subdirectories created at `createRun` time (spec §3).
pub const RESERVED_SUBDIRS: &[&str] = &["context", "logs", "artifacts"];

/// Resolves paths inside a single run's directory, rejecting any `run_id`
/// that is not a well-formed identifier or that would escape `runs_root`.
#[derive(Debug, Clone)]
pub struct RunLayout {
    root: PathBuf,
}

impl RunLayout {
    /// Validate `run_id` and compute the run directory under `runs_root`.
    ///
    /// Rejects anything that is not a syntactically valid run id (spec
    /// invariant I6) before it ever reaches a filesystem path, so
    /// `../../etc`-style inputs are caught by the id grammar rather than
    /// by path inspection.
    pub fn new(runs_root: &Path, run_id: &str) -> Result<Self, StoreError> {
        let parsed =
            RunId::parse(run_id).ok_or_else(|| StoreError::InvalidRunId(run_id.to_string()))?;
        let root = runs_root.join(parsed.as_str());

        // Belt-and-suspenders: confirm the joined path is still lexically
        // contained in runs_root (RunId::parse already forbids `/` and `..`,
        // but this keeps the guarantee local to the one place that matters).
        if root.parent() != Some(runs_root) {
            return Err(StoreError::PathEscape(run_id.to_string()));
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn request_json(&self) -> PathBuf {
        self.root.join("request.json")
    }

    pub fn request_processing_json(&self) -> PathBuf {
        self.root.join("request.processing.json")
    }

    pub fn session_json(&self) -> PathBuf {
        self.root.join("session.json")
    }

    pub fn result_json(&self) -> PathBuf {
        self.root.join("result.json")
    }

    pub fn output_txt(&self) -> PathBuf {
        self.root.join("output.txt")
    }

    pub fn context_dir(&self) -> PathBuf {
        self.root.join("context")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join("artifacts")
    }

    pub fn reconciliation_log(&self) -> PathBuf {
        self.logs_dir().join("reconciliation.log")
    }

    pub fn session_lock(&self) -> PathBuf {
        self.root.join(".session.lock")
    }

    pub fn result_lock(&self) -> PathBuf {
        self.root.join(".result.lock")
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
