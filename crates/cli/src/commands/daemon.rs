// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `td daemon` - run the polling scheduler in the foreground. A separate
//! `taskd` binary exists for process supervisors (systemd, launchd, ...)
//! that want a dedicated entry point; this subcommand is the same
//! scheduler, convenient for ad-hoc or debugging use.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use td_adapters::Registry;
use td_daemon::{Config, Scheduler, SingletonLock};
use td_store::RunStore;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Args)]
pub struct DaemonArgs {}

pub async fn run(_args: DaemonArgs, config: Config) -> Result<()> {
    let _singleton = SingletonLock::acquire(&config.lock_path())?;

    tokio::fs::create_dir_all(&config.runs_root).await?;
    let store = Arc::new(RunStore::new(config.runs_root.clone()));
    let registry = Arc::new(Registry::default());

    let shutdown = CancellationToken::new();
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
        }
        signal_shutdown.cancel();
    });

    info!(runs_root = %config.runs_root.display(), "daemon running in foreground");
    let scheduler = Scheduler::new(store, registry, config);
    scheduler.run(shutdown).await?;
    Ok(())
}
