// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SIGTERM` → grace period → `SIGKILL` escalation, shared by the
//! output-cap and timeout paths (spec §4.4 points 3–4).

use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::Child;
use tracing::warn;

/// Send `SIGTERM` to `child`, wait up to `grace` for it to exit, then send
/// `SIGKILL` if it is still running. Returns the child's exit status if one
/// could be observed.
pub async fn terminate_then_kill(child: &mut Child, grace: Duration) -> Option<std::process::ExitStatus> {
    if let Some(pid) = child.id() {
        if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            warn!(pid, error = %e, "failed to send SIGTERM");
        }
    } else {
        // Already reaped; nothing to signal.
        return child.wait().await.ok();
    }

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => Some(status),
        _ => {
            if let Some(pid) = child.id() {
                if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                    warn!(pid, error = %e, "failed to send SIGKILL");
                }
            }
            child.wait().await.ok()
        }
    }
}

/// Whether the OS reports `pid` as alive, via `kill(pid, 0)` (spec §4.6).
pub fn is_process_alive(pid: i64) -> bool {
    if pid <= 0 {
        return false;
    }
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// `SIGTERM` → grace period → `SIGKILL` escalation against a bare pid,
/// for callers (force-stop, an adapter's own `stop`) that have no live
/// [`Child`] handle in this process — only the pid recorded in
/// `session.json` (spec §5 cancellation).
pub async fn terminate_pid_then_kill(pid: i64, grace: Duration) {
    if pid <= 0 {
        return;
    }
    let nix_pid = Pid::from_raw(pid as i32);
    if kill(nix_pid, Signal::SIGTERM).is_err() {
        // Already gone, or not ours to signal; nothing more to do.
        return;
    }

    let deadline = tokio::time::Instant::now() + grace;
    while tokio::time::Instant::now() < deadline {
        if !is_process_alive(pid) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    if is_process_alive(pid) {
        if let Err(e) = kill(nix_pid, Signal::SIGKILL) {
            warn!(pid, error = %e, "failed to send SIGKILL");
        }
    }
}

#[cfg(test)]
#[path = "kill_tests.rs"]
mod tests;
