// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! taskd — the background scheduler that polls a runs root and dispatches
//! `created` runs to workers.
//!
//! Typically started by the `td` CLI's `daemon` subcommand rather than
//! invoked directly.

use std::sync::Arc;

use td_adapters::Registry;
use td_daemon::{Config, Scheduler, SingletonLock};
use td_store::RunStore;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("taskd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("taskd {}", env!("CARGO_PKG_VERSION"));
                println!("Polling scheduler for filesystem-backed task delegation runs");
                println!();
                println!("USAGE:");
                println!("    taskd");
                println!();
                println!("Configuration is read from TASKD_RUNS_ROOT, TASKD_MAX_CONCURRENT,");
                println!("and TASKD_POLL_INTERVAL_MS, defaulting to ~/.taskd/runs,");
                println!("concurrency 4, and a 500ms poll interval.");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: taskd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    let _log_guard = setup_logging(&config)?;
    info!(runs_root = %config.runs_root.display(), max_concurrent = config.max_concurrent, "starting taskd");

    let _singleton = match SingletonLock::acquire(&config.lock_path()) {
        Ok(lock) => lock,
        Err(e) => {
            eprintln!("taskd is already running");
            eprintln!("  lock: {}", config.lock_path().display());
            eprintln!("  {e}");
            std::process::exit(1);
        }
    };

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

    println!("READY");
    info!("taskd ready");

    let scheduler = Scheduler::new(store, registry, config);
    scheduler.run(shutdown).await?;

    info!("taskd exiting");
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_name = log_path
        .file_name()
        .ok_or("log path has no file name")?
        .to_owned();
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().ok_or("log path has no parent directory")?,
        file_name,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
