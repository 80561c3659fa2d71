// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn created_to_running_is_legal() {
    assert!(is_legal_transition(SessionState::Created, SessionState::Running));
}

#[test]
fn running_can_reach_all_three_successors() {
    assert!(is_legal_transition(SessionState::Running, SessionState::Completed));
    assert!(is_legal_transition(SessionState::Running, SessionState::Failed));
    assert!(is_legal_transition(SessionState::Running, SessionState::Stopping));
}

#[test]
fn stopping_can_only_reach_terminal_states() {
    assert!(is_legal_transition(SessionState::Stopping, SessionState::Completed));
    assert!(is_legal_transition(SessionState::Stopping, SessionState::Failed));
    assert!(!is_legal_transition(SessionState::Stopping, SessionState::Running));
}

#[test]
fn terminal_states_have_no_outgoing_transitions() {
    for to in [
        SessionState::Created,
        SessionState::Running,
        SessionState::Stopping,
        SessionState::Completed,
        SessionState::Failed,
    ] {
        assert!(!is_legal_transition(SessionState::Completed, to));
        assert!(!is_legal_transition(SessionState::Failed, to));
    }
}

#[test]
fn created_cannot_skip_to_completed() {
    assert!(!is_legal_transition(SessionState::Created, SessionState::Completed));
}

#[test]
fn check_transition_returns_typed_error() {
    let err = check_transition(SessionState::Created, SessionState::Failed).unwrap_err();
    assert_eq!(err.from, SessionState::Created);
    assert_eq!(err.to, SessionState::Failed);
}

#[test]
fn apply_updates_last_active_at() {
    let mut session = Session::new_created("run-abcdefghijkl", "claude-code");
    let created = session.last_active_at.clone();
    std::thread::sleep(std::time::Duration::from_millis(5));
    session.apply(SessionPatch::to_state(SessionState::Running));
    assert_eq!(session.state, SessionState::Running);
    assert_ne!(session.last_active_at, created);
}

#[test]
fn reset_for_resume_clears_pid_and_session_id() {
    let mut session = Session::new_created("run-abcdefghijkl", "claude-code");
    session.apply(
        SessionPatch::to_state(SessionState::Running)
            .with_pid(123)
            .with_session_id("sess-1"),
    );
    session.apply(SessionPatch::to_state(SessionState::Failed));
    assert!(session.state.is_terminal());

    session.apply(SessionPatch::reset_for_resume());
    assert_eq!(session.state, SessionState::Created);
    assert_eq!(session.pid, None);
    assert_eq!(session.session_id, None);
}

#[test]
fn is_terminal_matches_completed_and_failed_only() {
    assert!(SessionState::Completed.is_terminal());
    assert!(SessionState::Failed.is_terminal());
    assert!(!SessionState::Running.is_terminal());
    assert!(!SessionState::Stopping.is_terminal());
    assert!(!SessionState::Created.is_terminal());
}
