// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! td-adapters: the engine-adapter interface (spec §4.3) and the registry
//! that maps an engine name to a concrete adapter (spec §4.8).
//!
//! An adapter builds an argument vector from a request, hands it to
//! `td_supervisor::supervise` to actually run, and parses the captured
//! streams back into an [`AdapterResponse`]. It never forks, times out,
//! caps, or kills a process itself — that is `td-supervisor`'s job.

mod claude_code;
mod dialect;
mod error;
mod registry;
mod response;

pub use claude_code::ClaudeCodeAdapter;
pub use error::AdapterError;
pub use registry::Registry;
pub use response::AdapterResponse;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{AdapterCall, FakeAdapter};

use std::path::PathBuf;

use async_trait::async_trait;
use td_core::{ErrorInfo, Request};

/// Per-call options for [`EngineAdapter::send`] (spec §4.3, §9 "dynamic
/// configuration objects" — the recognized named set, not an open bag).
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub timeout_ms: f64,
    pub cwd: PathBuf,
}

/// One external coding-agent CLI, exposed as the capability set
/// `{start, send, stop}` (spec §4.3).
///
/// Implementations are constructed fresh per call by the [`Registry`] —
/// they must not carry mutable state shared across invocations.
#[async_trait]
pub trait EngineAdapter: Send + Sync {
    /// Start a brand-new engine session for `request` (`mode = new`).
    async fn start(&self, request: &Request) -> Result<AdapterResponse, ErrorInfo>;

    /// Resume an existing engine session and send it a message
    /// (`mode = resume`).
    async fn send(
        &self,
        session_id: &str,
        message: &str,
        options: &SendOptions,
    ) -> Result<AdapterResponse, ErrorInfo>;

    /// Stop a running engine subprocess by pid (spec §5 cancellation).
    /// The default implementation escalates `SIGTERM` → `SIGKILL` exactly
    /// as the supervisor does for timeout/cap kills; adapters with their
    /// own shutdown protocol may override it.
    async fn stop(&self, pid: i64) -> Result<(), ErrorInfo> {
        td_supervisor::terminate_pid_then_kill(pid, std::time::Duration::from_secs(3)).await;
        Ok(())
    }
}
