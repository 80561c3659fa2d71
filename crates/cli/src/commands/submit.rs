// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `td submit` - create a run, optionally driving it to completion inline.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use td_adapters::Registry;
use td_core::{Constraints, Intent, Mode, Request};
use td_store::RunStore;

#[derive(Args)]
pub struct SubmitArgs {
    /// Free-form identifier for the task being delegated
    #[arg(long)]
    pub task_id: String,

    /// The kind of work this task represents
    #[arg(long, value_enum, default_value = "coding")]
    pub intent: IntentArg,

    /// Directory the engine should operate in
    #[arg(long)]
    pub workspace: PathBuf,

    /// The instruction to hand the engine
    #[arg(long)]
    pub message: String,

    /// Registered engine adapter name
    #[arg(long, default_value = "claude-code")]
    pub engine: String,

    /// Optional model override passed through to the adapter
    #[arg(long)]
    pub model: Option<String>,

    /// Resume an existing engine session instead of starting a new one
    #[arg(long)]
    pub session_id: Option<String>,

    /// Milliseconds before the supervisor kills the subprocess
    #[arg(long, default_value_t = 1_800_000.0)]
    pub timeout_ms: f64,

    /// Additional roots the workspace must fall within
    #[arg(long = "allowed-root")]
    pub allowed_roots: Vec<String>,

    /// Drive the run to completion in this process instead of leaving it
    /// for the daemon to pick up
    #[arg(long)]
    pub wait: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum IntentArg {
    Coding,
    Refactor,
    Debug,
    Ops,
}

impl From<IntentArg> for Intent {
    fn from(value: IntentArg) -> Self {
        match value {
            IntentArg::Coding => Intent::Coding,
            IntentArg::Refactor => Intent::Refactor,
            IntentArg::Debug => Intent::Debug,
            IntentArg::Ops => Intent::Ops,
        }
    }
}

pub async fn run(args: SubmitArgs, store: &RunStore, registry: &Registry) -> Result<()> {
    let mode = if args.session_id.is_some() {
        Mode::Resume
    } else {
        Mode::New
    };

    let request = Request {
        task_id: args.task_id,
        intent: args.intent.into(),
        workspace_path: args.workspace.to_string_lossy().to_string(),
        message: args.message,
        engine: args.engine,
        model: args.model,
        mode,
        session_id: args.session_id,
        constraints: Constraints {
            timeout_ms: args.timeout_ms,
            ..Constraints::default()
        },
        allowed_roots: if args.allowed_roots.is_empty() {
            None
        } else {
            Some(args.allowed_roots)
        },
    };
    request.validate()?;

    let run_id = store.create_run(&request).await?;

    if args.wait {
        let result = td_engine::process_run(store, registry, run_id.as_str()).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let session = store.get_status(run_id.as_str()).await?;
        println!("{}", serde_json::to_string_pretty(&session)?);
    }

    Ok(())
}
