// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The request schema (spec §3, §6) and its semantic validation.
//!
//! Validation here covers only what spec §6 calls out as the core's
//! responsibility: shape and the dangerous-root/null-byte checks. Workspace
//! *existence* and `allowed_roots` admission require the filesystem and
//! live in `td-engine::workspace`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::is_dangerous_workspace_path;

/// The kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Coding,
    Refactor,
    Debug,
    Ops,
}

/// Whether this request starts a fresh engine session or resumes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    New,
    Resume,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::New
    }
}

fn default_timeout_ms() -> f64 {
    1_800_000.0
}

fn default_allow_network() -> bool {
    true
}

fn default_engine() -> String {
    "claude-code".to_string()
}

/// Resource and behavioral constraints on the engine invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: f64,
    #[serde(default = "default_allow_network")]
    pub allow_network: bool,
    /// Milliseconds to wait after `SIGTERM` before escalating to `SIGKILL`
    /// on a user-initiated force stop. Defaults to 5000 (spec §5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_timeout_ms: Option<f64>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            allow_network: default_allow_network(),
            force_timeout_ms: None,
        }
    }
}

/// A validated task-delegation request (spec §3 "Request entity").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub task_id: String,
    pub intent: Intent,
    pub workspace_path: String,
    pub message: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_roots: Option<Vec<String>>,
}

/// Validation failures for a `Request` (spec §6, §7 `REQUEST_INVALID`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("task_id must not be empty or whitespace-only")]
    EmptyTaskId,
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("workspace_path must not be empty")]
    EmptyWorkspacePath,
    #[error("workspace_path must not contain a null byte")]
    WorkspacePathNullByte,
    #[error("workspace_path resolves to a dangerous root")]
    DangerousWorkspacePath,
    #[error("session_id is required and non-empty when mode is resume")]
    ResumeRequiresSessionId,
    #[error("constraints.timeout_ms must be a finite positive number")]
    InvalidTimeout,
    #[error("engine must not be empty")]
    EmptyEngine,
}

impl Request {
    /// Re-check semantic constraints not expressible in the type itself
    /// (spec §4.5 step 3: "Re-validate the parsed request against the
    /// schema").
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.task_id.trim().is_empty() {
            return Err(RequestError::EmptyTaskId);
        }
        if self.message.is_empty() {
            return Err(RequestError::EmptyMessage);
        }
        if self.engine.is_empty() {
            return Err(RequestError::EmptyEngine);
        }
        if self.workspace_path.is_empty() {
            return Err(RequestError::EmptyWorkspacePath);
        }
        if self.workspace_path.contains('\0') {
            return Err(RequestError::WorkspacePathNullByte);
        }
        if is_dangerous_workspace_path(std::path::Path::new(&self.workspace_path)) {
            return Err(RequestError::DangerousWorkspacePath);
        }
        if self.mode == Mode::Resume
            && self.session_id.as_deref().unwrap_or("").is_empty()
        {
            return Err(RequestError::ResumeRequiresSessionId);
        }
        if !self.constraints.timeout_ms.is_finite() || self.constraints.timeout_ms <= 0.0 {
            return Err(RequestError::InvalidTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
