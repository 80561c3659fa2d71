// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The response every adapter operation returns (spec §4.3).

use td_core::{ErrorInfo, TokenUsage};

/// The tuple an adapter's `start`/`send` returns on a clean (exit-0)
/// subprocess run. `error` here is an adapter-determined failure (e.g.
/// `ENGINE_AUTH`, `NETWORK_ERROR`) detected from the parsed output itself —
/// distinct from a supervisor-level failure (`ENGINE_TIMEOUT`,
/// `ENGINE_CRASH`), which is returned as `Err` from the call, never
/// wrapped in a response.
#[derive(Debug, Clone, Default)]
pub struct AdapterResponse {
    pub output: String,
    pub pid: Option<i64>,
    pub exit_code: Option<i32>,
    pub session_id: Option<String>,
    pub token_usage: Option<TokenUsage>,
    pub error: Option<ErrorInfo>,
}

impl AdapterResponse {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Default::default()
        }
    }
}
