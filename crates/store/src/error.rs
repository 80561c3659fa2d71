// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the filesystem run store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in run store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("run id {0:?} escapes the runs root")]
    PathEscape(String),

    #[error("run id {0:?} is not a valid run identifier")]
    InvalidRunId(String),

    #[error("run directory is missing or corrupt: {0}")]
    CorruptStore(PathBuf),

    #[error("run {0:?} has no pending request to consume")]
    NotPending(String),

    #[error("timed out after {0:?} waiting for lock {1:?}")]
    LockTimeout(std::time::Duration, PathBuf),

    #[error("illegal session transition for run {0:?}: {1}")]
    InvalidTransition(String, #[source] td_core::TransitionError),

    #[error("run {0:?} not found")]
    NotFound(String),
}
