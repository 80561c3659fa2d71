// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming stdout/stderr capture with a combined output cap and a
//! single timeout timer (spec §4.4 points 2–4).

use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout};

use td_core::OUTPUT_CAP_BYTES;

use crate::kill::terminate_then_kill;

const CHUNK_SIZE: usize = 8192;
const OVERFLOW_GRACE: Duration = Duration::from_secs(1);
const TIMEOUT_GRACE: Duration = Duration::from_secs(3);

/// How a supervised child's I/O capture ended.
pub enum CaptureOutcome {
    /// The timeout elapsed before the child exited.
    TimedOut,
    /// Combined stdout+stderr crossed [`OUTPUT_CAP_BYTES`].
    Overflowed,
    /// The child exited on its own within the cap and timeout.
    Exited(std::process::ExitStatus),
}

pub struct Captured {
    pub outcome: CaptureOutcome,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Push `chunk` into `buf`, respecting the remaining combined budget
/// tracked by `total`. Returns `false` once the budget is exhausted,
/// after appending the exact bytes that fit (spec: "capture the prefix
/// up to exactly the cap, no more").
/// A synthetic non-zero exit status for the rare case where `wait()`
/// itself errors (the child was already reaped out from under us).
fn fallback_exit_status() -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(-1)
}

fn push_capped(buf: &mut Vec<u8>, chunk: &[u8], total: &mut usize) -> bool {
    let remaining = OUTPUT_CAP_BYTES.saturating_sub(*total);
    let take = chunk.len().min(remaining);
    buf.extend_from_slice(&chunk[..take]);
    *total += take;
    take == chunk.len()
}

/// Capture a child's combined stdout/stderr until it exits, the combined
/// cap is crossed, or `timeout` elapses — escalating `SIGTERM` →
/// `SIGKILL` on the latter two. `stdout`/`stderr` must be the handles
/// taken from `child` immediately after spawning it with both streams
/// piped.
pub async fn capture(
    mut child: Child,
    mut stdout: ChildStdout,
    mut stderr: ChildStderr,
    timeout: Duration,
) -> Captured {
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();
    let mut total = 0usize;
    let mut stdout_done = false;
    let mut stderr_done = false;

    let mut chunk = [0u8; CHUNK_SIZE];
    let mut chunk2 = [0u8; CHUNK_SIZE];

    let sleep = tokio::time::sleep(timeout);
    tokio::pin!(sleep);

    loop {
        if stdout_done && stderr_done {
            let outcome = match child.wait().await {
                Ok(status) => CaptureOutcome::Exited(status),
                Err(_) => CaptureOutcome::Exited(fallback_exit_status()),
            };
            return Captured {
                outcome,
                stdout: stdout_buf,
                stderr: stderr_buf,
            };
        }

        tokio::select! {
            biased;

            () = &mut sleep => {
                terminate_then_kill(&mut child, TIMEOUT_GRACE).await;
                return Captured { outcome: CaptureOutcome::TimedOut, stdout: stdout_buf, stderr: stderr_buf };
            }

            res = stdout.read(&mut chunk), if !stdout_done => {
                match res {
                    Ok(0) => stdout_done = true,
                    Ok(n) => {
                        if !push_capped(&mut stdout_buf, &chunk[..n], &mut total) {
                            terminate_then_kill(&mut child, OVERFLOW_GRACE).await;
                            return Captured { outcome: CaptureOutcome::Overflowed, stdout: stdout_buf, stderr: stderr_buf };
                        }
                    }
                    Err(_) => stdout_done = true,
                }
            }

            res = stderr.read(&mut chunk2), if !stderr_done => {
                match res {
                    Ok(0) => stderr_done = true,
                    Ok(n) => {
                        if !push_capped(&mut stderr_buf, &chunk2[..n], &mut total) {
                            terminate_then_kill(&mut child, OVERFLOW_GRACE).await;
                            return Captured { outcome: CaptureOutcome::Overflowed, stdout: stdout_buf, stderr: stderr_buf };
                        }
                    }
                    Err(_) => stderr_done = true,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
