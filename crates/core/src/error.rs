// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The external error taxonomy (spec §7) and the wire-level error object
//! embedded in a failed `result.json`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes that are part of the external contract — their spelling and
/// retryability must not change across implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    EngineTimeout,
    EngineCrash,
    EngineAuth,
    NetworkError,
    WorkspaceInvalid,
    WorkspaceNotFound,
    RequestInvalid,
    RunnerCrashRecovery,
    TaskStopped,
    OutputWriteFailed,
}

impl ErrorCode {
    /// Whether a client may reasonably retry the same request unchanged.
    pub fn retryable(self) -> bool {
        matches!(
            self,
            ErrorCode::EngineTimeout
                | ErrorCode::EngineCrash
                | ErrorCode::NetworkError
                | ErrorCode::RunnerCrashRecovery
                | ErrorCode::OutputWriteFailed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EngineTimeout => "ENGINE_TIMEOUT",
            ErrorCode::EngineCrash => "ENGINE_CRASH",
            ErrorCode::EngineAuth => "ENGINE_AUTH",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::WorkspaceInvalid => "WORKSPACE_INVALID",
            ErrorCode::WorkspaceNotFound => "WORKSPACE_NOT_FOUND",
            ErrorCode::RequestInvalid => "REQUEST_INVALID",
            ErrorCode::RunnerCrashRecovery => "RUNNER_CRASH_RECOVERY",
            ErrorCode::TaskStopped => "TASK_STOPPED",
            ErrorCode::OutputWriteFailed => "OUTPUT_WRITE_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The structured error object carried by a failed `result.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            retryable: code.retryable(),
            code,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Errors raised while constructing or validating core domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
