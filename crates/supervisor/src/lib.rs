// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! td-supervisor: bounded subprocess execution (spec §4.4).
//!
//! Spawns a single child process with a composed `PATH`, captures its
//! combined stdout/stderr up to a hard cap, enforces a timeout, and
//! escalates `SIGTERM` → `SIGKILL` on either boundary. Deliberately knows
//! nothing about engine-specific argument vectors or output dialects —
//! callers supply those, and a parse closure to turn a successful
//! capture into their own response type. This keeps `td-adapters`
//! downstream of this crate rather than the other way around.

mod capture;
mod env;
mod kill;

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use td_core::{ErrorCode, ErrorInfo};
use tokio::process::Command;

pub use capture::{capture, CaptureOutcome, Captured};
pub use env::augmented_path;
pub use kill::{is_process_alive, terminate_pid_then_kill, terminate_then_kill};

/// Everything needed to spawn and bound one engine subprocess invocation.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Duration,
    /// Caller's `$HOME`, used only to extend `PATH` (spec §4.4 point 1).
    pub home: Option<PathBuf>,
}

/// Spawn, supervise, and — on a clean exit — parse one subprocess
/// invocation.
///
/// `parse` receives the child's pid (if it could be read before exit)
/// and the captured `(stdout, stderr)` bytes, and is only invoked on a
/// zero exit code; a non-zero exit never reaches it (spec §4.4 point 5:
/// structured stdout on a failing run is dropped, not parsed).
pub async fn supervise<F, T>(spec: SpawnSpec, parse: F) -> Result<T, ErrorInfo>
where
    F: FnOnce(Option<u32>, &[u8], &[u8]) -> T,
{
    let inherited = std::env::var("PATH").ok();
    let path = augmented_path(spec.home.as_deref(), inherited.as_deref());

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.cwd)
        .env("PATH", path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| ErrorInfo::new(ErrorCode::EngineCrash, e.to_string()))?;

    let pid = child.id();

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ErrorInfo::new(ErrorCode::EngineCrash, "child stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| ErrorInfo::new(ErrorCode::EngineCrash, "child stderr was not piped"))?;

    let captured = capture::capture(child, stdout, stderr, spec.timeout).await;

    match captured.outcome {
        CaptureOutcome::TimedOut => {
            Err(ErrorInfo::new(ErrorCode::EngineTimeout, "engine timed out"))
        }
        CaptureOutcome::Overflowed => Err(ErrorInfo::new(
            ErrorCode::EngineCrash,
            "output exceeded 10 MiB",
        )),
        CaptureOutcome::Exited(status) if status.success() => {
            Ok(parse(pid, &captured.stdout, &captured.stderr))
        }
        CaptureOutcome::Exited(status) => {
            let code = status.code().unwrap_or(-1);
            let stderr_tail = String::from_utf8_lossy(&captured.stderr).trim().to_string();
            let message = if stderr_tail.is_empty() {
                format!("exited with code {code}")
            } else {
                stderr_tail
            };
            Err(ErrorInfo::new(ErrorCode::EngineCrash, message))
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
