// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `claude-code` engine adapter: drives the Claude Code CLI in
//! non-interactive, structured-output mode (spec §4.3, §6 "Engine-adapter
//! CLI contract").

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use td_core::{ErrorCode, ErrorInfo, Request, TokenUsage};
use td_supervisor::SpawnSpec;

use crate::dialect::{raw_fallback, sanitize_session_id, sanitize_token_usage, scan_json_lines};
use crate::response::AdapterResponse;
use crate::{EngineAdapter, SendOptions};

/// Construction options recognized by [`ClaudeCodeAdapter::new`] (spec §9
/// "dynamic configuration objects" — a named record, not an open bag).
/// `default_args` exists so tests can point the adapter at a stub binary
/// without touching the real `claude` CLI.
#[derive(Debug, Clone)]
pub struct ClaudeCodeAdapter {
    command: String,
    default_args: Vec<String>,
}

impl Default for ClaudeCodeAdapter {
    fn default() -> Self {
        Self::new("claude", Vec::new())
    }
}

impl ClaudeCodeAdapter {
    pub fn new(command: impl Into<String>, default_args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            default_args,
        }
    }

    fn spawn_spec(&self, args: Vec<String>, cwd: &Path, timeout_ms: f64) -> SpawnSpec {
        let mut full_args = self.default_args.clone();
        full_args.extend(args);
        SpawnSpec {
            program: self.command.clone(),
            args: full_args,
            cwd: cwd.to_path_buf(),
            timeout: Duration::from_millis(timeout_ms.max(1.0) as u64),
            home: dirs::home_dir(),
        }
    }
}

#[async_trait]
impl EngineAdapter for ClaudeCodeAdapter {
    async fn start(&self, request: &Request) -> Result<AdapterResponse, ErrorInfo> {
        let mut args = vec![
            "--print".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
        ];
        if let Some(model) = &request.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        args.push(request.message.clone());

        let spec = self.spawn_spec(
            args,
            Path::new(&request.workspace_path),
            request.constraints.timeout_ms,
        );
        td_supervisor::supervise(spec, parse_claude_output).await
    }

    async fn send(
        &self,
        session_id: &str,
        message: &str,
        options: &SendOptions,
    ) -> Result<AdapterResponse, ErrorInfo> {
        let args = vec![
            "--print".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
            "--resume".to_string(),
            session_id.to_string(),
            message.to_string(),
        ];
        let spec = self.spawn_spec(args, &options.cwd, options.timeout_ms);
        td_supervisor::supervise(spec, parse_claude_output).await
    }
}

/// Parse the Claude Code `stream-json` NDJSON dialect: a stream of typed
/// events terminated by one `type: "result"` event carrying the final
/// text, `session_id`, and token usage. Falls back to the raw trimmed
/// capture if no `result` event is found (spec §9).
fn parse_claude_output(pid: Option<u32>, stdout: &[u8], _stderr: &[u8]) -> AdapterResponse {
    let events = scan_json_lines(stdout);

    let mut session_id = None;
    let mut token_usage: Option<TokenUsage> = None;
    let mut result_text: Option<String> = None;
    let mut error: Option<ErrorInfo> = None;

    for event in &events {
        if session_id.is_none() {
            session_id = sanitize_session_id(event.get("session_id"));
        }

        if event.get("type").and_then(Value::as_str) != Some("result") {
            continue;
        }

        if let Some(usage) = event.get("usage") {
            token_usage = sanitize_token_usage(
                usage.get("input_tokens"),
                usage.get("output_tokens"),
            )
            .or(token_usage);
        }

        let is_error = event
            .get("is_error")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let text = event.get("result").and_then(Value::as_str);

        if is_error {
            let message = text
                .unwrap_or("the engine reported an error with no message")
                .to_string();
            error = Some(classify_error(&message));
        } else if let Some(text) = text {
            result_text = Some(text.to_string());
        }
    }

    let output = result_text.unwrap_or_else(|| {
        tracing::debug!("no result event found in claude-code output, falling back to raw capture");
        raw_fallback(stdout)
    });

    AdapterResponse {
        output,
        pid: pid.map(i64::from),
        exit_code: Some(0),
        session_id,
        token_usage,
        error,
    }
}

/// Classify a `result`-event error message into the external error
/// taxonomy (spec §7). Anything not recognized as an auth or network
/// failure is surfaced as `ENGINE_CRASH` — the supervisor only sees a
/// clean exit here, so this is the adapter's one chance to report it.
fn classify_error(message: &str) -> ErrorInfo {
    let lower = message.to_lowercase();
    if lower.contains("auth") || lower.contains("login") || lower.contains("api key") {
        ErrorInfo::new(ErrorCode::EngineAuth, message.to_string())
    } else if lower.contains("network") || lower.contains("connection") || lower.contains("dns") {
        ErrorInfo::new(ErrorCode::NetworkError, message.to_string())
    } else {
        ErrorInfo::new(ErrorCode::EngineCrash, message.to_string())
    }
}

#[cfg(test)]
#[path = "claude_code_tests.rs"]
mod tests;
