// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use td_core::{
    Constraints, Intent, Mode, Request, SequentialIdGen, SessionPatch, SessionState,
};
use td_store::RunStore;
use tempfile::tempdir;

use super::*;

fn request(workspace_path: impl Into<String>) -> Request {
    Request {
        task_id: "task-1".to_string(),
        intent: Intent::Coding,
        workspace_path: workspace_path.into(),
        message: "do the thing".to_string(),
        engine: "fake".to_string(),
        model: None,
        mode: Mode::New,
        session_id: None,
        constraints: Constraints::default(),
        allowed_roots: None,
    }
}

#[tokio::test]
async fn stop_run_on_a_non_running_session_fails() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store
        .create_run(&request(workspace.path().to_str().unwrap()))
        .await
        .unwrap();

    let err = stop_run(&store, run_id.as_str(), None).await.unwrap_err();
    match err {
        EngineError::NotRunning { state, .. } => assert_eq!(state, SessionState::Created),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn stop_run_without_a_pid_still_completes() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store
        .create_run(&request(workspace.path().to_str().unwrap()))
        .await
        .unwrap();
    store
        .transition(run_id.as_str(), SessionState::Running, SessionPatch::default())
        .await
        .unwrap();

    let result = stop_run(&store, run_id.as_str(), None).await.unwrap();
    assert_eq!(result.status, td_core::RunStatus::Completed);
    assert_eq!(result.summary, "Task force-stopped by user");
    assert_eq!(result.duration_ms, 0);

    let session = store.get_status(run_id.as_str()).await.unwrap();
    assert_eq!(session.state, SessionState::Completed);
}

#[tokio::test]
async fn stop_run_terminates_the_recorded_pid() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store
        .create_run(&request(workspace.path().to_str().unwrap()))
        .await
        .unwrap();

    let mut child = tokio::process::Command::new("sleep")
        .arg("30")
        .spawn()
        .unwrap();
    let pid = i64::from(child.id().unwrap());

    store
        .transition(run_id.as_str(), SessionState::Running, SessionPatch::default())
        .await
        .unwrap();
    store
        .update_session(run_id.as_str(), SessionPatch::default().with_pid(pid))
        .await
        .unwrap();

    let result = stop_run(&store, run_id.as_str(), Some(300.0)).await.unwrap();
    assert_eq!(result.status, td_core::RunStatus::Completed);

    let status = child.wait().await.unwrap();
    assert!(!status.success());
}
