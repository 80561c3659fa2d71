// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `td stop` - force-stop a running run (spec §5 cancellation). Exits
//! with code 1 when the target is not currently `running` (spec §6).

use anyhow::Result;
use clap::Args;
use td_engine::EngineError;
use td_store::RunStore;

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct StopArgs {
    /// The run to force-stop
    pub run_id: String,

    /// Milliseconds to wait after SIGTERM before escalating to SIGKILL
    #[arg(long)]
    pub force_timeout_ms: Option<f64>,
}

pub async fn run(args: StopArgs, store: &RunStore) -> Result<()> {
    match td_engine::stop_run(store, &args.run_id, args.force_timeout_ms).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(EngineError::NotRunning { run_id, state }) => {
            eprintln!("run {run_id} is not running (current state: {state})");
            Err(ExitError::new(1).into())
        }
        Err(e) => Err(e.into()),
    }
}
