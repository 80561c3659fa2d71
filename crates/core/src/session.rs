// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The session state machine (spec §4.2) and the mutable per-run record.
//!
//! This module defines the *legal* transition graph as a pure function.
//! Serializing it into `session.json` and serializing the transition
//! under the per-run lock is `td-store`'s job (spec §4.1); this module only
//! answers "is this transition allowed" and holds the record's shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::now_iso8601;

/// The five states a run's session can be in. `Completed` and `Failed` are
/// terminal: no further mutation of `state` is legal from them, except the
/// escape hatch `resetForResume` back to `Created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Created,
    Running,
    Stopping,
    Completed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionState::Created => "created",
            SessionState::Running => "running",
            SessionState::Stopping => "stopping",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a requested transition is not in the legal graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("illegal transition from {from} to {to}")]
pub struct TransitionError {
    pub from: SessionState,
    pub to: SessionState,
}

/// Whether `to` is reachable directly from `from` per the graph in spec §4.2:
///
/// ```text
/// created  -> running
/// running  -> completed, failed, stopping
/// stopping -> completed, failed
/// ```
///
/// `resetForResume` (terminal -> created) is deliberately NOT part of this
/// graph — it is a distinct, explicitly-named escape hatch, checked
/// separately so it can never be reached by an ordinary `transition` call.
pub fn is_legal_transition(from: SessionState, to: SessionState) -> bool {
    matches!(
        (from, to),
        (SessionState::Created, SessionState::Running)
            | (SessionState::Running, SessionState::Completed)
            | (SessionState::Running, SessionState::Failed)
            | (SessionState::Running, SessionState::Stopping)
            | (SessionState::Stopping, SessionState::Completed)
            | (SessionState::Stopping, SessionState::Failed)
    )
}

/// Check a transition and return the typed error spec §4.2 calls for.
pub fn check_transition(from: SessionState, to: SessionState) -> Result<(), TransitionError> {
    if is_legal_transition(from, to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// The mutable record describing the state, process, and engine identifier
/// of a run (spec §3 "Session entity").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub run_id: String,
    pub engine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub state: SessionState,
    /// OS process id of the spawned engine subprocess. Zero and negative
    /// values are invalid (spec invariant I4) and must never be stored —
    /// callers validate before merging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    pub created_at: String,
    pub last_active_at: String,
}

impl Session {
    /// Construct a freshly-created session in state `Created`.
    pub fn new_created(run_id: impl Into<String>, engine: impl Into<String>) -> Self {
        let now = now_iso8601();
        Self {
            run_id: run_id.into(),
            engine: engine.into(),
            session_id: None,
            state: SessionState::Created,
            pid: None,
            created_at: now.clone(),
            last_active_at: now,
        }
    }

    /// A partial update applied under the per-run lock by `td-store`.
    pub fn apply(&mut self, partial: SessionPatch) {
        if let Some(state) = partial.state {
            self.state = state;
        }
        if let Some(pid) = partial.pid {
            self.pid = pid;
        }
        if let Some(session_id) = partial.session_id {
            self.session_id = session_id;
        }
        self.last_active_at = now_iso8601();
    }
}

/// Fields that may be merged into a `Session` by `updateSession`.
///
/// `Some(None)` clears a nullable field; `None` leaves it untouched — this
/// distinguishes "don't touch" from "set to null", which `resetForResume`
/// relies on to clear `pid` and `session_id` together.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub state: Option<SessionState>,
    pub pid: Option<Option<i64>>,
    pub session_id: Option<Option<String>>,
}

impl SessionPatch {
    pub fn to_state(state: SessionState) -> Self {
        Self {
            state: Some(state),
            ..Default::default()
        }
    }

    pub fn with_pid(mut self, pid: i64) -> Self {
        self.pid = Some(Some(pid));
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(Some(session_id.into()));
        self
    }

    /// The patch used by `resetForResume`: clears both `pid` and
    /// `session_id` so no stale value leaks into the next run (spec §4.2).
    pub fn reset_for_resume() -> Self {
        Self {
            state: Some(SessionState::Created),
            pid: Some(None),
            session_id: Some(None),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
