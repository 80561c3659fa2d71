// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! td - CLI for the filesystem-backed task-delegation runtime.

mod commands;
mod exit_error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use td_adapters::Registry;
use td_daemon::Config;
use td_store::RunStore;

#[derive(Parser)]
#[command(name = "td", version, about = "Delegate coding tasks to an engine adapter")]
struct Cli {
    /// Override the runs root (defaults to TASKD_RUNS_ROOT or ~/.taskd/runs)
    #[arg(long, global = true)]
    runs_root: Option<PathBuf>,

    /// Output format for read commands (status, list)
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a run
    Submit(commands::submit::SubmitArgs),
    /// Show one run's session state
    Status(commands::status::StatusArgs),
    /// List every run under the runs root
    List(commands::list::ListArgs),
    /// Force-stop a running run
    Stop(commands::stop::StopArgs),
    /// Run the polling scheduler in the foreground
    Daemon(commands::daemon::DaemonArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        match e.downcast_ref::<exit_error::ExitError>() {
            Some(exit) => std::process::exit(exit.code),
            None => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(runs_root) = cli.runs_root {
        config.runs_root = runs_root;
    }
    tokio::fs::create_dir_all(&config.runs_root).await?;

    match cli.command {
        Commands::Submit(args) => {
            let store = RunStore::new(config.runs_root.clone());
            let registry = Registry::default();
            commands::submit::run(args, &store, &registry).await
        }
        Commands::Status(args) => {
            let store = RunStore::new(config.runs_root.clone());
            commands::status::run(args, &store, cli.output).await
        }
        Commands::List(args) => {
            let store = RunStore::new(config.runs_root.clone());
            commands::list::run(args, &store, cli.output).await
        }
        Commands::Stop(args) => {
            let store = RunStore::new(config.runs_root.clone());
            commands::stop::run(args, &store).await
        }
        Commands::Daemon(args) => commands::daemon::run(args, config).await,
    }
}
