// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash recovery over the run store (spec §4.6, C6): reclassify any
//! `running` session whose process is no longer alive, from `result.json`
//! evidence when present, or as `RUNNER_CRASH_RECOVERY` when not.
//!
//! Called by the daemon on start and periodically between polls (spec
//! §4.7 point 1); idempotent by construction (spec P8) since a session
//! this pass reclassifies is no longer `running` on the next pass.

use td_core::{ErrorCode, ErrorInfo, IdGen, RunResult, RunStatus, Session, SessionPatch, SessionState};
use td_store::RunStore;
use td_supervisor::is_process_alive;
use tracing::info;

use crate::error::EngineError;

/// What the reconciler did about one orphaned run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    MarkedCompleted,
    MarkedFailed,
}

impl ReconcileAction {
    fn tag(self) -> &'static str {
        match self {
            ReconcileAction::MarkedCompleted => "marked_completed",
            ReconcileAction::MarkedFailed => "marked_failed",
        }
    }
}

/// Run one reconciliation pass, returning the actions taken (for
/// logging/metrics by the caller; every action is already appended to
/// `reconciliation.log` as a side effect).
pub async fn reconcile<G: IdGen>(store: &RunStore<G>) -> Result<Vec<ReconcileAction>, EngineError> {
    let sessions = store.list_runs().await?;
    let mut actions = Vec::new();

    for session in sessions {
        if session.state != SessionState::Running {
            continue;
        }
        if session.pid.is_some_and(|pid| pid > 0 && is_process_alive(pid)) {
            continue;
        }
        actions.push(reconcile_one(store, &session).await?);
    }

    Ok(actions)
}

async fn reconcile_one<G: IdGen>(
    store: &RunStore<G>,
    session: &Session,
) -> Result<ReconcileAction, EngineError> {
    let run_id = session.run_id.as_str();

    if let Some(result) = store.read_result(run_id).await? {
        return apply_recorded_result(store, run_id, &result).await;
    }

    // Re-check immediately before declaring a crash: the runner may have
    // written result.json between the pid check above and here. Never
    // overwrite a well-formed result.json with a crash-recovery one
    // (spec §5 "shared-resource policy").
    if let Some(result) = store.read_result(run_id).await? {
        return apply_recorded_result(store, run_id, &result).await;
    }

    store
        .transition(run_id, SessionState::Failed, SessionPatch::default())
        .await?;

    let error = ErrorInfo::new(
        ErrorCode::RunnerCrashRecovery,
        "runner process is gone and no result.json was found",
    );
    let result = RunResult::failed(run_id, error, 0);
    store.write_result(run_id, &result).await?;

    let action = ReconcileAction::MarkedFailed;
    log_action(
        store,
        run_id,
        action,
        "no result.json found; recorded RUNNER_CRASH_RECOVERY",
    )
    .await?;
    Ok(action)
}

async fn apply_recorded_result<G: IdGen>(
    store: &RunStore<G>,
    run_id: &str,
    result: &RunResult,
) -> Result<ReconcileAction, EngineError> {
    let (target, action) = match result.status {
        RunStatus::Completed => (SessionState::Completed, ReconcileAction::MarkedCompleted),
        RunStatus::Failed => (SessionState::Failed, ReconcileAction::MarkedFailed),
    };
    store
        .transition(run_id, target, SessionPatch::default())
        .await?;
    log_action(
        store,
        run_id,
        action,
        "session state matched to the status already recorded in result.json",
    )
    .await?;
    Ok(action)
}

async fn log_action<G: IdGen>(
    store: &RunStore<G>,
    run_id: &str,
    action: ReconcileAction,
    detail: &str,
) -> Result<(), EngineError> {
    info!(run_id, action = action.tag(), detail, "reconciler action");
    td_store::append_action(store.runs_root(), run_id, action.tag(), detail).await?;
    Ok(())
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
