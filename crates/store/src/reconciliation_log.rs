// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only record of reconciler actions (spec §4.6): every decision
//! the reconciler makes about a `running` session is recorded twice —
//! once in a global `reconciliation.log` under the runs root, and once
//! mirrored into the run's own `logs/reconciliation.log` when that
//! directory exists, so a run's directory is self-describing even if
//! copied elsewhere.
//!
//! One line per action: ISO-8601 timestamp, bracketed tag, run id,
//! free-text detail.

use std::path::Path;

use td_core::now_iso8601;

use crate::atomic::append_bytes;
use crate::error::StoreError;
use crate::layout::RunLayout;

/// Record a reconciler action for `run_id`.
pub async fn append_action(
    runs_root: &Path,
    run_id: &str,
    tag: &str,
    detail: &str,
) -> Result<(), StoreError> {
    let line = format!("{} [{}] {} {}\n", now_iso8601(), tag, run_id, detail);

    append_bytes(&runs_root.join("reconciliation.log"), line.as_bytes()).await?;

    if let Ok(layout) = RunLayout::new(runs_root, run_id) {
        if layout.logs_dir().is_dir() {
            append_bytes(&layout.reconciliation_log(), line.as_bytes()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "reconciliation_log_tests.rs"]
mod tests;
