// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const VALID: &str = "run-abcdefghijkl";

#[test]
fn valid_run_id_resolves_under_root() {
    let root = Path::new("/var/tmp/runs");
    let layout = RunLayout::new(root, VALID).unwrap();
    assert_eq!(layout.root(), root.join(VALID));
}

#[test]
fn path_traversal_run_id_rejected() {
    let root = Path::new("/var/tmp/runs");
    let err = RunLayout::new(root, "run-../../etc/passwd").unwrap_err();
    assert!(matches!(err, StoreError::InvalidRunId(_)));
}

#[test]
fn missing_prefix_rejected() {
    let root = Path::new("/var/tmp/runs");
    let err = RunLayout::new(root, "abcdefghijkl").unwrap_err();
    assert!(matches!(err, StoreError::InvalidRunId(_)));
}

#[test]
fn too_short_rejected() {
    let root = Path::new("/var/tmp/runs");
    let err = RunLayout::new(root, "run-short").unwrap_err();
    assert!(matches!(err, StoreError::InvalidRunId(_)));
}

#[test]
fn derived_paths_are_nested_under_run_root() {
    let root = Path::new("/var/tmp/runs");
    let layout = RunLayout::new(root, VALID).unwrap();
    assert_eq!(layout.request_json(), layout.root().join("request.json"));
    assert_eq!(layout.session_json(), layout.root().join("session.json"));
    assert_eq!(layout.result_json(), layout.root().join("result.json"));
    assert_eq!(layout.output_txt(), layout.root().join("output.txt"));
    assert_eq!(
        layout.request_processing_json(),
        layout.root().join("request.processing.json")
    );
    assert_eq!(
        layout.reconciliation_log(),
        layout.root().join("logs/reconciliation.log")
    );
    assert_eq!(layout.session_lock(), layout.root().join(".session.lock"));
    assert_eq!(layout.result_lock(), layout.root().join(".result.lock"));
}
