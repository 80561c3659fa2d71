// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The filesystem-backed run store (spec §4.1): creation, enumeration,
//! request consumption, session mutation, and result/output writing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use td_core::{
    check_transition, IdGen, Request, RunId, RunResult, Session, SessionPatch, SessionState,
    UuidIdGen,
};
use tracing::warn;

use crate::atomic::{atomic_write_bytes, atomic_write_json};
use crate::error::StoreError;
use crate::layout::{RunLayout, RESERVED_SUBDIRS};
use crate::lock::LockGuard;

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Filesystem-backed run store rooted at a single directory `R`.
///
/// Generic over the id generator so tests can substitute a deterministic
/// one (`SequentialIdGen`); production code uses the default `UuidIdGen`.
pub struct RunStore<G: IdGen = UuidIdGen> {
    runs_root: PathBuf,
    id_gen: G,
}

impl RunStore<UuidIdGen> {
    pub fn new(runs_root: impl Into<PathBuf>) -> Self {
        Self {
            runs_root: runs_root.into(),
            id_gen: UuidIdGen,
        }
    }
}

impl<G: IdGen> RunStore<G> {
    pub fn with_id_gen(runs_root: impl Into<PathBuf>, id_gen: G) -> Self {
        Self {
            runs_root: runs_root.into(),
            id_gen,
        }
    }

    pub fn runs_root(&self) -> &Path {
        &self.runs_root
    }

    fn layout(&self, run_id: &str) -> Result<RunLayout, StoreError> {
        RunLayout::new(&self.runs_root, run_id)
    }

    /// Create a new run directory: reserved subdirectories, `request.json`,
    /// and `session.json` in state `created`.
    pub async fn create_run(&self, request: &Request) -> Result<RunId, StoreError> {
        tokio::fs::create_dir_all(&self.runs_root).await?;

        let run_id = self.id_gen.next_run_id();
        let layout = self.layout(run_id.as_str())?;

        tokio::fs::create_dir_all(layout.root()).await?;
        for sub in RESERVED_SUBDIRS {
            tokio::fs::create_dir_all(layout.root().join(sub)).await?;
        }

        atomic_write_json(&layout.request_json(), request).await?;

        let session = Session::new_created(run_id.as_str(), &request.engine);
        atomic_write_json(&layout.session_json(), &session).await?;

        Ok(run_id)
    }

    /// Read `session.json` for `run_id`. A corrupt or missing file is
    /// fatal here (spec §4.1: `getStatus` never leaks a raw parse error,
    /// but does surface `CorruptStore`).
    pub async fn get_status(&self, run_id: &str) -> Result<Session, StoreError> {
        let layout = self.layout(run_id)?;
        read_session(&layout).await
    }

    /// Enumerate every run under the runs root, skipping (never aborting
    /// on) any entry whose `session.json` is missing, empty, or
    /// unparseable.
    pub async fn list_runs(&self) -> Result<Vec<Session>, StoreError> {
        let mut sessions = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.runs_root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(sessions),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if !file_type.is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().into_owned();
            let layout = match self.layout(&run_id) {
                Ok(layout) => layout,
                Err(_) => continue,
            };
            match read_session(&layout).await {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    warn!(run_id = %run_id, error = %e, "skipping unreadable run during listRuns");
                    continue;
                }
            }
        }

        Ok(sessions)
    }

    /// Atomically rename `request.json` to `request.processing.json`, then
    /// parse it. A second call on the same run returns `NotPending`.
    pub async fn consume_request(&self, run_id: &str) -> Result<Request, StoreError> {
        let layout = self.layout(run_id)?;

        match tokio::fs::rename(layout.request_json(), layout.request_processing_json()).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotPending(run_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let bytes = tokio::fs::read(layout.request_processing_json()).await?;
        let request: Request = serde_json::from_slice(&bytes)?;
        Ok(request)
    }

    /// Under `.session.lock`: read, merge `patch` into the session, bump
    /// `last_active_at`, and atomically rewrite `session.json`.
    pub async fn update_session(
        &self,
        run_id: &str,
        patch: SessionPatch,
    ) -> Result<Session, StoreError> {
        let layout = self.layout(run_id)?;
        let _guard = LockGuard::acquire(&layout.session_lock(), LOCK_TIMEOUT).await?;

        let mut session = read_session(&layout).await?;
        session.apply(patch);
        atomic_write_json(&layout.session_json(), &session).await?;
        Ok(session)
    }

    /// Validate and apply a session-state transition, delegating the
    /// write to [`Self::update_session`] (spec §4.2).
    pub async fn transition(
        &self,
        run_id: &str,
        new_state: SessionState,
        patch: SessionPatch,
    ) -> Result<Session, StoreError> {
        let layout = self.layout(run_id)?;
        let _guard = LockGuard::acquire(&layout.session_lock(), LOCK_TIMEOUT).await?;

        let current = read_session(&layout).await?;
        check_transition(current.state, new_state)
            .map_err(|e| StoreError::InvalidTransition(run_id.to_string(), e))?;

        let mut patch = patch;
        patch.state = Some(new_state);
        let mut session = current;
        session.apply(patch);
        atomic_write_json(&layout.session_json(), &session).await?;
        Ok(session)
    }

    /// The only escape hatch back to `created`; admitted only from a
    /// terminal state. Clears both `pid` and `session_id`.
    pub async fn reset_for_resume(&self, run_id: &str) -> Result<Session, StoreError> {
        let layout = self.layout(run_id)?;
        let _guard = LockGuard::acquire(&layout.session_lock(), LOCK_TIMEOUT).await?;

        let mut session = read_session(&layout).await?;
        if !session.state.is_terminal() {
            return Err(StoreError::InvalidTransition(
                run_id.to_string(),
                td_core::TransitionError {
                    from: session.state,
                    to: SessionState::Created,
                },
            ));
        }
        session.apply(SessionPatch::reset_for_resume());
        atomic_write_json(&layout.session_json(), &session).await?;
        Ok(session)
    }

    /// Write `result.json` under `.result.lock` (spec §4.1).
    pub async fn write_result(&self, run_id: &str, result: &RunResult) -> Result<(), StoreError> {
        let layout = self.layout(run_id)?;
        let _guard = LockGuard::acquire(&layout.result_lock(), LOCK_TIMEOUT).await?;
        atomic_write_json(&layout.result_json(), result).await
    }

    /// Read `result.json` if present; `Ok(None)` if missing, empty, or
    /// unparseable (used by the reconciler, which treats all three the
    /// same way).
    pub async fn read_result(&self, run_id: &str) -> Result<Option<RunResult>, StoreError> {
        let layout = self.layout(run_id)?;
        match tokio::fs::read(layout.result_json()).await {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes).ok()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the full captured engine output (spec invariant I3: must
    /// happen before `writeResult`). Not itself atomic; `result.json`'s
    /// presence is the completion signal readers should trust.
    pub async fn write_output_file(&self, run_id: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let layout = self.layout(run_id)?;
        atomic_write_bytes(&layout.output_txt(), bytes).await
    }

    pub fn layout_for(&self, run_id: &str) -> Result<RunLayout, StoreError> {
        self.layout(run_id)
    }
}

async fn read_session(layout: &RunLayout) -> Result<Session, StoreError> {
    let bytes = tokio::fs::read(layout.session_json())
        .await
        .map_err(|_| StoreError::CorruptStore(layout.root().to_path_buf()))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(path = %layout.session_json().display(), error = %e, "corrupt session.json");
        StoreError::CorruptStore(layout.root().to_path_buf())
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
