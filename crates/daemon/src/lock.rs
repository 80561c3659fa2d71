// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's own singleton-process lock (spec appendix A3): an
//! exclusive `fs2` lock on a `daemon.pid` file, held for the lifetime of
//! the process. Unrelated to the per-run `.session.lock`/`.result.lock`
//! advisory files `td-store` manages — this guards against a second
//! `taskd` starting against the same runs root, not against concurrent
//! mutation of a single run.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SingletonLockError {
    #[error("another daemon instance already holds the lock at {0}")]
    AlreadyRunning(PathBuf),
    #[error("IO error acquiring singleton lock: {0}")]
    Io(#[from] std::io::Error),
}

/// Held for as long as this value is alive; the lock is released when it
/// drops (process exit or explicit `drop`).
pub struct SingletonLock {
    _file: File,
}

impl SingletonLock {
    /// Acquire the lock at `path`, creating the file and its parent
    /// directory if needed, then overwrite it with this process's pid.
    pub fn acquire(path: &Path) -> Result<Self, SingletonLockError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).write(true).open(path)?;
        file.try_lock_exclusive()
            .map_err(|_| SingletonLockError::AlreadyRunning(path.to_path_buf()))?;

        let mut file = file;
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self { _file: file })
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
