// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ErrorCode;

#[test]
fn summary_at_3999_chars_is_not_truncated() {
    let output = "A".repeat(3999);
    let r = RunResult::completed("run-abcdefghijkl", &output, None, None, None, None, 0);
    assert_eq!(r.summary.chars().count(), 3999);
    assert!(!r.summary_truncated);
}

#[test]
fn summary_at_4000_chars_is_not_truncated() {
    let output = "A".repeat(4000);
    let r = RunResult::completed("run-abcdefghijkl", &output, None, None, None, None, 0);
    assert_eq!(r.summary.chars().count(), 4000);
    assert!(!r.summary_truncated);
}

#[test]
fn summary_at_4001_chars_is_truncated_to_4000() {
    let output = "A".repeat(4001);
    let r = RunResult::completed("run-abcdefghijkl", &output, None, None, None, None, 0);
    assert_eq!(r.summary.chars().count(), 4000);
    assert!(r.summary_truncated);
}

#[test]
fn completed_result_has_no_error() {
    let r = RunResult::completed("run-abcdefghijkl", "ok", None, None, None, None, 5);
    assert!(r.has_consistent_error_field());
    assert!(r.error.is_none());
}

#[test]
fn failed_result_always_has_error() {
    let err = ErrorInfo::new(ErrorCode::EngineCrash, "boom");
    let r = RunResult::failed("run-abcdefghijkl", err, 0);
    assert!(r.has_consistent_error_field());
    assert!(r.error.is_some());
    assert!(!r.summary_truncated);
    assert_eq!(r.summary, "boom");
}

#[test]
fn failed_result_has_null_output_path() {
    let err = ErrorInfo::new(ErrorCode::WorkspaceNotFound, "nope");
    let r = RunResult::failed("run-abcdefghijkl", err, 0);
    assert!(r.output_path.is_none());
}

#[test]
fn round_trip_preserves_fields() {
    let r = RunResult::completed(
        "run-abcdefghijkl",
        "hello",
        Some("/tmp/ws/output.txt".to_string()),
        Some("sess-1".to_string()),
        Some(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 20,
            total_tokens: 30,
        }),
        Some(vec!["a.rs".to_string()]),
        42,
    );
    let json = serde_json::to_string(&r).unwrap();
    let back: RunResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.run_id, r.run_id);
    assert_eq!(back.duration_ms, r.duration_ms);
    assert_eq!(back.output_path, r.output_path);
}
