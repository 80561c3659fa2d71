// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn retryable_codes_match_taxonomy() {
    assert!(ErrorCode::EngineTimeout.retryable());
    assert!(ErrorCode::EngineCrash.retryable());
    assert!(ErrorCode::NetworkError.retryable());
    assert!(ErrorCode::RunnerCrashRecovery.retryable());
    assert!(ErrorCode::OutputWriteFailed.retryable());
}

#[test]
fn non_retryable_codes_match_taxonomy() {
    assert!(!ErrorCode::EngineAuth.retryable());
    assert!(!ErrorCode::WorkspaceInvalid.retryable());
    assert!(!ErrorCode::WorkspaceNotFound.retryable());
    assert!(!ErrorCode::RequestInvalid.retryable());
    assert!(!ErrorCode::TaskStopped.retryable());
}

#[test]
fn display_matches_wire_string() {
    assert_eq!(ErrorCode::EngineTimeout.to_string(), "ENGINE_TIMEOUT");
    assert_eq!(ErrorCode::RequestInvalid.to_string(), "REQUEST_INVALID");
}

#[test]
fn error_info_derives_retryable_from_code() {
    let info = ErrorInfo::new(ErrorCode::EngineCrash, "boom");
    assert!(info.retryable);
    assert!(info.suggestion.is_none());
}

#[test]
fn error_info_serializes_code_as_screaming_snake_case() {
    let info = ErrorInfo::new(ErrorCode::WorkspaceNotFound, "missing");
    let v = serde_json::to_value(&info).unwrap();
    assert_eq!(v["code"], "WORKSPACE_NOT_FOUND");
}
