// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-initiated cancellation (spec §5 "Cancellation"): `running ->
//! stopping`, `SIGTERM` then `SIGKILL` against `session.pid`, then
//! `stopping -> completed`.

use std::time::Duration;

use td_core::{IdGen, RunResult, RunStatus, SessionPatch, SessionState};
use td_store::RunStore;
use tracing::info;

use crate::error::EngineError;

/// Milliseconds to wait after `SIGTERM` before escalating to `SIGKILL`,
/// when the request did not specify `constraints.force_timeout_ms`.
const DEFAULT_FORCE_TIMEOUT_MS: f64 = 5_000.0;

/// Force-stop a running run. Fails with [`EngineError::NotRunning`] if the
/// target is not currently in state `running` (host CLIs surface this as
/// exit code 1, spec §6).
pub async fn stop_run<G: IdGen>(
    store: &RunStore<G>,
    run_id: &str,
    force_timeout_ms: Option<f64>,
) -> Result<RunResult, EngineError> {
    let session = store.get_status(run_id).await?;
    if session.state != SessionState::Running {
        return Err(EngineError::NotRunning {
            run_id: run_id.to_string(),
            state: session.state,
        });
    }

    store
        .transition(run_id, SessionState::Stopping, SessionPatch::default())
        .await?;

    if let Some(pid) = session.pid {
        if pid > 0 {
            let grace_ms = force_timeout_ms
                .filter(|ms| ms.is_finite() && *ms > 0.0)
                .unwrap_or(DEFAULT_FORCE_TIMEOUT_MS);
            td_supervisor::terminate_pid_then_kill(pid, Duration::from_millis(grace_ms as u64))
                .await;
        }
    }

    store
        .transition(run_id, SessionState::Completed, SessionPatch::default())
        .await?;

    let result = RunResult {
        run_id: run_id.to_string(),
        status: RunStatus::Completed,
        summary: "Task force-stopped by user".to_string(),
        summary_truncated: false,
        output_path: None,
        session_id: session.session_id,
        artifacts: Vec::new(),
        duration_ms: 0,
        token_usage: None,
        files_changed: None,
        error: None,
    };
    store.write_result(run_id, &result).await?;
    info!(run_id, "run force-stopped by user");
    Ok(result)
}

#[cfg(test)]
#[path = "stop_tests.rs"]
mod tests;
