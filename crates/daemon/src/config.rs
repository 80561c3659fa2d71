// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration (spec appendix A3): CLI flags take priority over
//! environment variables, which take priority over built-in defaults.
//! `td-daemon` only resolves the environment/defaults tier; the CLI layer
//! overrides individual fields from flags before handing a `Config` here.

use std::path::{Path, PathBuf};

use thiserror::Error;

const DEFAULT_MAX_CONCURRENT: usize = 4;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a home directory to build the default runs root")]
    NoHomeDir,
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidInteger { name: &'static str, value: String },
}

/// Resolved daemon configuration: where runs live, how many may execute
/// concurrently, and how often the scheduler polls (spec §4.7).
#[derive(Debug, Clone)]
pub struct Config {
    pub runs_root: PathBuf,
    pub max_concurrent: usize,
    pub poll_interval_ms: u64,
}

impl Config {
    /// Resolve from `TASKD_RUNS_ROOT` / `TASKD_MAX_CONCURRENT` /
    /// `TASKD_POLL_INTERVAL_MS`, falling back to `~/.taskd/runs`,
    /// concurrency 4, and a 500ms poll interval.
    pub fn load() -> Result<Self, ConfigError> {
        let runs_root = match std::env::var("TASKD_RUNS_ROOT") {
            Ok(value) => PathBuf::from(value),
            Err(_) => default_runs_root()?,
        };
        let max_concurrent = parse_env("TASKD_MAX_CONCURRENT", DEFAULT_MAX_CONCURRENT)?;
        let poll_interval_ms = parse_env("TASKD_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;

        Ok(Self {
            runs_root,
            max_concurrent,
            poll_interval_ms,
        })
    }

    /// The directory holding the daemon's own lock and log files. When
    /// `runs_root` is the conventional `<state_dir>/runs`, that's its
    /// parent; otherwise `runs_root` doubles as the state directory.
    pub fn state_dir(&self) -> PathBuf {
        match self.runs_root.file_name() {
            Some(name) if name == "runs" => self
                .runs_root
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.runs_root.clone()),
            _ => self.runs_root.clone(),
        }
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir().join("daemon.pid")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir().join("logs").join("daemon.log")
    }
}

fn default_runs_root() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".taskd").join("runs"))
}

fn parse_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidInteger { name, value }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
