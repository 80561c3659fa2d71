// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The terminal result entity (spec §3 "Result entity", §8 boundary tests).

use serde::{Deserialize, Serialize};

use crate::error::ErrorInfo;

/// Maximum number of characters kept in `summary` (spec §4.5 step 13).
pub const SUMMARY_LIMIT: usize = 4000;

/// Hard cap, in bytes, on combined stdout+stderr capture (spec §4.4 point 3).
pub const OUTPUT_CAP_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Token accounting reported by an engine adapter, when available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// The terminal outcome of a run; its presence as `result.json` is the
/// completion signal (spec invariant I2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    pub status: RunStatus,
    pub summary: String,
    pub summary_truncated: bool,
    pub output_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub artifacts: Vec<String>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_changed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl RunResult {
    /// Build a `completed` result, truncating `output` to `SUMMARY_LIMIT`
    /// characters for the `summary` field (spec §4.5 step 13).
    #[allow(clippy::too_many_arguments)]
    pub fn completed(
        run_id: impl Into<String>,
        output: &str,
        output_path: Option<String>,
        session_id: Option<String>,
        token_usage: Option<TokenUsage>,
        files_changed: Option<Vec<String>>,
        duration_ms: u64,
    ) -> Self {
        let char_count = output.chars().count();
        let truncated = char_count > SUMMARY_LIMIT;
        let summary: String = output.chars().take(SUMMARY_LIMIT).collect();
        Self {
            run_id: run_id.into(),
            status: RunStatus::Completed,
            summary,
            summary_truncated: truncated,
            output_path,
            session_id,
            artifacts: Vec::new(),
            duration_ms,
            token_usage,
            files_changed,
            error: None,
        }
    }

    /// Build a `failed` result. `summary` is always the error message,
    /// never truncated (spec §4.5 step 14).
    pub fn failed(run_id: impl Into<String>, error: ErrorInfo, duration_ms: u64) -> Self {
        Self {
            run_id: run_id.into(),
            status: RunStatus::Failed,
            summary: error.message.clone(),
            summary_truncated: false,
            output_path: None,
            session_id: None,
            artifacts: Vec::new(),
            duration_ms,
            token_usage: None,
            files_changed: None,
            error: Some(error),
        }
    }

    /// True iff the `error` field is present exactly when `status = failed`
    /// (spec §3 invariant on the Result entity).
    pub fn has_consistent_error_field(&self) -> bool {
        match self.status {
            RunStatus::Completed => self.error.is_none(),
            RunStatus::Failed => self.error.is_some(),
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
