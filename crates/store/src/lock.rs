// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory per-run locking via exclusive file creation.
//!
//! Unlike the daemon's own singleton lock (an `fs2` `flock` held for the
//! process lifetime), a run's `.session.lock` / `.result.lock` files are
//! held only for the duration of a single read-modify-write and are
//! expected to be contended by short-lived `td` invocations racing each
//! other, not by one long-lived holder. `O_CREAT|O_EXCL` creation is the
//! mechanism spec §4.1 describes directly: "a caller creates a lock file
//! exclusively... and unlinks it when done".

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::sleep;

use crate::error::StoreError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A held advisory lock. Unlinks its lock file on drop.
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    /// Create `path` exclusively, retrying on `AlreadyExists` until
    /// `timeout` elapses.
    pub async fn acquire(path: &Path, timeout: Duration) -> Result<Self, StoreError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .await
            {
                Ok(_file) => return Ok(LockGuard { path: path.to_path_buf() }),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(StoreError::LockTimeout(timeout, path.to_path_buf()));
                    }
                    sleep(POLL_INTERVAL).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Acquire with the default 5 second timeout.
    pub async fn acquire_default(path: &Path) -> Result<Self, StoreError> {
        Self::acquire(path, DEFAULT_TIMEOUT).await
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
