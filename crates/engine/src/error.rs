// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors the runner cannot recover from by writing a failed `result.json`
//! — i.e. the run store itself is unwritable. Every other failure mode is
//! folded into a `failed` [`td_core::RunResult`] (spec §4.5 step 15,
//! invariant P1).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("run store error: {0}")]
    Store(#[from] td_store::StoreError),

    /// A force-stop was requested against a run that is not `running`
    /// (spec §5, §6: the host CLI exits 1 in this case).
    #[error("run {run_id:?} is not running (state: {state})")]
    NotRunning {
        run_id: String,
        state: td_core::SessionState,
    },
}
