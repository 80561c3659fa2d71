// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The end-to-end run executor (spec §4.5, C5): consume a pending request,
//! re-validate it, admit its workspace, resolve an engine adapter, drive it
//! through the supervisor, and write a terminal `result.json` on every path.

use std::path::Path;
use std::time::Instant;

use td_adapters::{Registry, SendOptions};
use td_core::{ErrorCode, ErrorInfo, IdGen, Mode, Request, RunResult, SessionPatch, SessionState};
use td_store::{RunStore, StoreError};
use tracing::{info, instrument, warn};

use crate::error::EngineError;
use crate::workspace::resolve_workspace;

/// Process one run to completion, writing `result.json` on every path
/// (spec invariant P1). Only returns `Err` when the store itself cannot
/// be written to even for the failure path — a condition the runner
/// cannot paper over.
#[instrument(skip(store, registry))]
pub async fn process_run<G: IdGen>(
    store: &RunStore<G>,
    registry: &Registry,
    run_id: &str,
) -> Result<RunResult, EngineError> {
    let start = Instant::now();
    match run_inner(store, registry, run_id, &start).await {
        Ok(result) => Ok(result),
        Err(error) => {
            warn!(run_id, code = %error.code, message = %error.message, "run failed");
            fail_path(store, run_id, error, &start).await
        }
    }
}

async fn run_inner<G: IdGen>(
    store: &RunStore<G>,
    registry: &Registry,
    run_id: &str,
    start: &Instant,
) -> Result<RunResult, ErrorInfo> {
    let request = consume_request(store, run_id).await?;

    request
        .validate()
        .map_err(|e| ErrorInfo::new(ErrorCode::RequestInvalid, e.to_string()))?;

    let workspace = resolve_workspace(&request.workspace_path, &request.allowed_roots)?;

    let adapter = registry
        .resolve(&request.engine)
        .map_err(|e| ErrorInfo::new(ErrorCode::RequestInvalid, e.to_string()))?;

    let mut entry_patch = SessionPatch::default();
    if request.mode == Mode::Resume {
        if let Some(session_id) = &request.session_id {
            entry_patch.session_id = Some(Some(session_id.clone()));
        }
    }
    store
        .transition(run_id, SessionState::Running, entry_patch)
        .await
        .map_err(crash)?;

    let response = match request.mode {
        Mode::New => adapter.start(&request).await?,
        Mode::Resume => {
            // Re-validated above: resume mode always carries a non-empty session_id.
            let session_id = request.session_id.clone().unwrap_or_default();
            let options = SendOptions {
                timeout_ms: request.constraints.timeout_ms,
                cwd: workspace.clone(),
            };
            adapter.send(&session_id, &request.message, &options).await?
        }
    };

    let mut observed_patch = SessionPatch::default();
    let mut observed_anything = false;
    if let Some(pid) = response.pid {
        if pid > 0 {
            observed_patch.pid = Some(Some(pid));
            observed_anything = true;
        }
    }
    if let Some(session_id) = &response.session_id {
        observed_patch.session_id = Some(Some(session_id.clone()));
        observed_anything = true;
    }
    if observed_anything {
        store.update_session(run_id, observed_patch).await.map_err(crash)?;
    }

    if let Some(error) = response.error {
        return Err(error);
    }

    store
        .write_output_file(run_id, response.output.as_bytes())
        .await
        .map_err(|e| ErrorInfo::new(ErrorCode::OutputWriteFailed, e.to_string()))?;

    store
        .transition(run_id, SessionState::Completed, SessionPatch::default())
        .await
        .map_err(crash)?;

    let output_path = store
        .layout_for(run_id)
        .map_err(crash)?
        .output_txt()
        .to_string_lossy()
        .to_string();
    let files_changed = compute_files_changed(&workspace).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    info!(run_id, duration_ms, "run completed");

    let result = RunResult::completed(
        run_id,
        &response.output,
        Some(output_path),
        response.session_id,
        response.token_usage,
        files_changed,
        duration_ms,
    );
    store.write_result(run_id, &result).await.map_err(crash)?;

    Ok(result)
}

/// Consume the pending request, mapping store-level failures onto the
/// external taxonomy: a missing request is `REQUEST_INVALID` (spec §4.5
/// step 2), as is a request that renamed but did not parse; anything else
/// is an unexpected store failure (`ENGINE_CRASH`, spec step 15).
async fn consume_request<G: IdGen>(
    store: &RunStore<G>,
    run_id: &str,
) -> Result<Request, ErrorInfo> {
    store.consume_request(run_id).await.map_err(|e| match e {
        StoreError::NotPending(_) => {
            ErrorInfo::new(ErrorCode::RequestInvalid, "no pending request to consume")
        }
        StoreError::Json(_) => ErrorInfo::new(
            ErrorCode::RequestInvalid,
            format!("request.json did not parse: {e}"),
        ),
        other => crash(other),
    })
}

/// Top-level catch for a store failure with no more specific mapping
/// (spec §4.5 step 15).
fn crash(e: StoreError) -> ErrorInfo {
    ErrorInfo::new(ErrorCode::EngineCrash, e.to_string())
}

/// Transition the run to `failed` (promoting through `running` first if
/// still `created`) and write a failed `result.json` (spec §4.5 step 14).
async fn fail_path<G: IdGen>(
    store: &RunStore<G>,
    run_id: &str,
    error: ErrorInfo,
    start: &Instant,
) -> Result<RunResult, EngineError> {
    let session = store.get_status(run_id).await?;

    // A concurrent call already reached a terminal state and (per
    // invariant I2) its result.json is the authoritative outcome — a
    // second caller that only just discovered NotPending must not
    // clobber it (spec §8 scenario 5: "the final result.json.status is
    // that of the first call").
    if session.state.is_terminal() {
        if let Some(existing) = store.read_result(run_id).await? {
            return Ok(existing);
        }
    } else {
        if session.state == SessionState::Created {
            store
                .transition(run_id, SessionState::Running, SessionPatch::default())
                .await?;
        }
        store
            .transition(run_id, SessionState::Failed, SessionPatch::default())
            .await?;
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    let result = RunResult::failed(run_id, error, duration_ms);
    store.write_result(run_id, &result).await?;
    Ok(result)
}

/// Compute `files_changed` as the union of `git diff --name-only HEAD` and
/// untracked files, excluding anything under `.runs/` (spec §4.5 step 13).
/// `None` if either command fails, including a repository with no commits.
async fn compute_files_changed(workspace: &Path) -> Option<Vec<String>> {
    let diff = run_git(workspace, &["diff", "--name-only", "HEAD"]).await?;
    let untracked = run_git(workspace, &["ls-files", "--others", "--exclude-standard"]).await?;

    let mut files: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
    for line in diff.lines().chain(untracked.lines()) {
        let line = line.trim();
        if line.is_empty() || line.starts_with(".runs/") {
            continue;
        }
        files.insert(line.to_string());
    }
    Some(files.into_iter().collect())
}

async fn run_git(cwd: &Path, args: &[&str]) -> Option<String> {
    let output = tokio::process::Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
