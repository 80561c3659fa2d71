// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use td_adapters::{AdapterResponse, FakeAdapter, Registry};
use td_core::{
    Constraints, ErrorCode, ErrorInfo, Intent, Mode, Request, SequentialIdGen, SessionState,
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

fn registry_with(adapter: FakeAdapter) -> Registry {
    let mut registry = Registry::empty();
    registry.register("fake", move || adapter.clone());
    registry
}

#[tokio::test]
async fn successful_run_writes_a_completed_result() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store.create_run(&request(workspace.path().to_str().unwrap())).await.unwrap();

    let fake = FakeAdapter::new();
    fake.set_start_response(Ok(AdapterResponse::new("hello from the engine")));
    let registry = registry_with(fake);

    let result = process_run(&store, &registry, run_id.as_str()).await.unwrap();

    assert_eq!(result.status, td_core::RunStatus::Completed);
    assert_eq!(result.summary, "hello from the engine");
    assert!(!result.summary_truncated);
    assert!(result.error.is_none());

    let session = store.get_status(run_id.as_str()).await.unwrap();
    assert_eq!(session.state, SessionState::Completed);

    let output = tokio::fs::read_to_string(store.layout_for(run_id.as_str()).unwrap().output_txt())
        .await
        .unwrap();
    assert_eq!(output, "hello from the engine");

    // The completion signal itself: result.json must exist on disk and
    // match what process_run returned, not just the in-memory value.
    let on_disk = store.read_result(run_id.as_str()).await.unwrap().unwrap();
    assert_eq!(on_disk.status, td_core::RunStatus::Completed);
    assert_eq!(on_disk.summary, "hello from the engine");
}

#[tokio::test]
async fn output_over_the_summary_limit_is_truncated_but_fully_written() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store.create_run(&request(workspace.path().to_str().unwrap())).await.unwrap();

    let long_output = "A".repeat(5000);
    let fake = FakeAdapter::new();
    fake.set_start_response(Ok(AdapterResponse::new(long_output.clone())));
    let registry = registry_with(fake);

    let result = process_run(&store, &registry, run_id.as_str()).await.unwrap();

    assert_eq!(result.summary.chars().count(), td_core::SUMMARY_LIMIT);
    assert!(result.summary_truncated);

    let output = tokio::fs::read_to_string(store.layout_for(run_id.as_str()).unwrap().output_txt())
        .await
        .unwrap();
    assert_eq!(output.len(), 5000);
}

#[tokio::test]
async fn invalid_request_fails_with_request_invalid() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let mut bad_request = request(workspace.path().to_str().unwrap());
    bad_request.message = String::new();
    let run_id = store.create_run(&bad_request).await.unwrap();

    let registry = registry_with(FakeAdapter::new());
    let result = process_run(&store, &registry, run_id.as_str()).await.unwrap();

    assert_eq!(result.status, td_core::RunStatus::Failed);
    assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::RequestInvalid);

    let session = store.get_status(run_id.as_str()).await.unwrap();
    assert_eq!(session.state, SessionState::Failed);
}

#[tokio::test]
async fn missing_workspace_fails_with_workspace_not_found() {
    let runs_root = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store.create_run(&request("/no/such/workspace/anywhere")).await.unwrap();

    let registry = registry_with(FakeAdapter::new());
    let result = process_run(&store, &registry, run_id.as_str()).await.unwrap();

    assert_eq!(
        result.error.as_ref().unwrap().code,
        ErrorCode::WorkspaceNotFound
    );
}

#[tokio::test]
async fn unknown_engine_fails_with_request_invalid() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let mut req = request(workspace.path().to_str().unwrap());
    req.engine = "no-such-engine".to_string();
    let run_id = store.create_run(&req).await.unwrap();

    let registry = Registry::empty();
    let result = process_run(&store, &registry, run_id.as_str()).await.unwrap();

    assert_eq!(
        result.error.as_ref().unwrap().code,
        ErrorCode::RequestInvalid
    );
}

#[tokio::test]
async fn adapter_error_response_is_propagated_as_the_failure() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store.create_run(&request(workspace.path().to_str().unwrap())).await.unwrap();

    let fake = FakeAdapter::new();
    fake.set_start_response(Err(ErrorInfo::new(ErrorCode::EngineAuth, "not logged in")));
    let registry = registry_with(fake);

    let result = process_run(&store, &registry, run_id.as_str()).await.unwrap();
    assert_eq!(result.status, td_core::RunStatus::Failed);
    assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::EngineAuth);
}

#[tokio::test]
async fn zero_pid_in_response_is_ignored_but_run_still_completes() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store.create_run(&request(workspace.path().to_str().unwrap())).await.unwrap();

    let fake = FakeAdapter::new();
    fake.set_start_response(Ok(AdapterResponse {
        pid: Some(0),
        ..AdapterResponse::new("done")
    }));
    let registry = registry_with(fake);

    let result = process_run(&store, &registry, run_id.as_str()).await.unwrap();
    assert_eq!(result.status, td_core::RunStatus::Completed);

    let session = store.get_status(run_id.as_str()).await.unwrap();
    assert_eq!(session.pid, None);
}

#[tokio::test]
async fn second_process_run_on_the_same_run_observes_not_pending() {
    let runs_root = tempdir().unwrap();
    let workspace = tempdir().unwrap();
    let store = RunStore::with_id_gen(runs_root.path(), SequentialIdGen::new("t"));
    let run_id = store.create_run(&request(workspace.path().to_str().unwrap())).await.unwrap();

    let fake = FakeAdapter::new();
    fake.set_start_response(Ok(AdapterResponse::new("first")));
    let registry = registry_with(fake);

    let first = process_run(&store, &registry, run_id.as_str()).await.unwrap();
    assert_eq!(first.status, td_core::RunStatus::Completed);

    let second = process_run(&store, &registry, run_id.as_str()).await.unwrap();
    assert_eq!(second.status, td_core::RunStatus::Completed);
    assert!(second.error.is_none());

    // The completed result from the first call must not be overwritten.
    let on_disk = store.read_result(run_id.as_str()).await.unwrap().unwrap();
    assert_eq!(on_disk.status, td_core::RunStatus::Completed);
    assert_eq!(on_disk.summary, "first");
}
