// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A deterministic in-memory adapter for tests in downstream crates
//! (`td-engine`, `td-daemon`) that need to drive the runner/reconciler
//! without spawning a real subprocess.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use td_core::{ErrorInfo, Request};

use crate::response::AdapterResponse;
use crate::{EngineAdapter, SendOptions};

/// One recorded call to a [`FakeAdapter`].
#[derive(Debug, Clone)]
pub enum AdapterCall {
    Start { task_id: String },
    Send { session_id: String, message: String },
    Stop { pid: i64 },
}

/// Fake adapter whose `start`/`send` responses are configured up front
/// and whose calls are recorded for assertions.
#[derive(Clone, Default)]
pub struct FakeAdapter {
    inner: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<AdapterCall>,
    start_response: Option<Result<AdapterResponse, ErrorInfo>>,
    send_response: Option<Result<AdapterResponse, ErrorInfo>>,
    stop_error: Option<ErrorInfo>,
}

impl FakeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.inner.lock().calls.clone()
    }

    /// Set the response returned by the next (and every subsequent)
    /// `start` call, until replaced.
    pub fn set_start_response(&self, response: Result<AdapterResponse, ErrorInfo>) {
        self.inner.lock().start_response = Some(response);
    }

    pub fn set_send_response(&self, response: Result<AdapterResponse, ErrorInfo>) {
        self.inner.lock().send_response = Some(response);
    }

    pub fn set_stop_error(&self, error: ErrorInfo) {
        self.inner.lock().stop_error = Some(error);
    }
}

#[async_trait]
impl EngineAdapter for FakeAdapter {
    async fn start(&self, request: &Request) -> Result<AdapterResponse, ErrorInfo> {
        let mut inner = self.inner.lock();
        inner.calls.push(AdapterCall::Start {
            task_id: request.task_id.clone(),
        });
        inner
            .start_response
            .clone()
            .unwrap_or_else(|| Ok(AdapterResponse::new("fake output")))
    }

    async fn send(
        &self,
        session_id: &str,
        message: &str,
        _options: &SendOptions,
    ) -> Result<AdapterResponse, ErrorInfo> {
        let mut inner = self.inner.lock();
        inner.calls.push(AdapterCall::Send {
            session_id: session_id.to_string(),
            message: message.to_string(),
        });
        inner
            .send_response
            .clone()
            .unwrap_or_else(|| Ok(AdapterResponse::new("fake resume output")))
    }

    async fn stop(&self, pid: i64) -> Result<(), ErrorInfo> {
        let mut inner = self.inner.lock();
        inner.calls.push(AdapterCall::Stop { pid });
        match inner.stop_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
