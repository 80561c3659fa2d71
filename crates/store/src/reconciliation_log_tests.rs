// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const RUN_ID: &str = "run-abcdefghijkl";

#[tokio::test]
async fn action_appears_in_global_log() {
    let dir = tempfile::tempdir().unwrap();
    append_action(dir.path(), RUN_ID, "RUNNER_CRASH_RECOVERY", "pid no longer alive")
        .await
        .unwrap();

    let global = tokio::fs::read_to_string(dir.path().join("reconciliation.log"))
        .await
        .unwrap();
    assert!(global.contains("[RUNNER_CRASH_RECOVERY]"));
    assert!(global.contains(RUN_ID));
}

#[tokio::test]
async fn action_mirrors_into_run_logs_dir_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let layout = RunLayout::new(dir.path(), RUN_ID).unwrap();
    tokio::fs::create_dir_all(layout.logs_dir()).await.unwrap();

    append_action(dir.path(), RUN_ID, "marked_completed", "matched result.json")
        .await
        .unwrap();

    let per_run = tokio::fs::read_to_string(layout.reconciliation_log())
        .await
        .unwrap();
    assert!(per_run.contains("marked_completed"));
}

#[tokio::test]
async fn action_skips_per_run_mirror_when_logs_dir_absent() {
    let dir = tempfile::tempdir().unwrap();
    append_action(dir.path(), RUN_ID, "marked_failed", "no result.json")
        .await
        .unwrap();

    let layout = RunLayout::new(dir.path(), RUN_ID).unwrap();
    assert!(!layout.reconciliation_log().exists());
}

#[tokio::test]
async fn multiple_actions_append_as_separate_lines() {
    let dir = tempfile::tempdir().unwrap();
    append_action(dir.path(), RUN_ID, "TAG_ONE", "first").await.unwrap();
    append_action(dir.path(), RUN_ID, "TAG_TWO", "second").await.unwrap();

    let global = tokio::fs::read_to_string(dir.path().join("reconciliation.log"))
        .await
        .unwrap();
    let lines: Vec<_> = global.lines().collect();
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn invalid_run_id_still_writes_global_log() {
    let dir = tempfile::tempdir().unwrap();
    append_action(dir.path(), "not-a-run-id", "TAG", "detail")
        .await
        .unwrap();

    let global = tokio::fs::read_to_string(dir.path().join("reconciliation.log"))
        .await
        .unwrap();
    assert!(global.contains("not-a-run-id"));
}
