// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared NDJSON/JSON scanning helpers for engine-specific output dialects
//! (spec §4.3 parsing contract, §9 "fallback output").
//!
//! Every adapter's output dialect is its own business, but the validation
//! rules that apply to the fields they extract are the same across
//! engines, so they live here rather than being copy-pasted per adapter.

use serde_json::Value;
use td_core::TokenUsage;

/// Split `bytes` into lines and parse every line that looks like a JSON
/// value, silently skipping anything else — including log-prefix lines
/// that don't start with `{` or `[` (spec §6: "adapters must be tolerant
/// of log prefix lines").
pub fn scan_json_lines(bytes: &[u8]) -> Vec<Value> {
    let text = String::from_utf8_lossy(bytes);
    text.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                serde_json::from_str(trimmed).ok()
            } else {
                None
            }
        })
        .collect()
}

/// `session_id` MUST be a non-empty string if captured; empty strings and
/// non-string types are rejected (spec §4.3 parsing contract).
pub fn sanitize_session_id(value: Option<&Value>) -> Option<String> {
    match value?.as_str() {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

/// A plain key/value record with non-negative integer counts, or `None`
/// (spec §4.3: arrays, non-objects, and missing required fields yield
/// null).
pub fn sanitize_token_usage(prompt: Option<&Value>, completion: Option<&Value>) -> Option<TokenUsage> {
    let prompt_tokens = non_negative_u64(prompt?)?;
    let completion_tokens = non_negative_u64(completion?)?;
    Some(TokenUsage {
        prompt_tokens,
        completion_tokens,
        total_tokens: prompt_tokens + completion_tokens,
    })
}

fn non_negative_u64(value: &Value) -> Option<u64> {
    let n = value.as_i64()?;
    if n < 0 {
        return None;
    }
    Some(n as u64)
}

/// The trimmed raw capture, used when no recognized event structure is
/// found in the output (spec §9: "intentional but noisy").
pub fn raw_fallback(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout).trim().to_string()
}

#[cfg(test)]
#[path = "dialect_tests.rs"]
mod tests;
