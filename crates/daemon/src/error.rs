// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors that can abort the daemon outright — distinct from a single
/// run's failure, which the runner always folds into a written
/// `result.json` instead of propagating here.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Store(#[from] td_store::StoreError),

    #[error(transparent)]
    Engine(#[from] td_engine::EngineError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Lock(#[from] crate::lock::SingletonLockError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
