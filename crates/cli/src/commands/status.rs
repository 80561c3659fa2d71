// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `td status` - print one run's current session state.

use anyhow::Result;
use clap::Args;
use td_store::RunStore;

use crate::output::{print_session, OutputFormat};

#[derive(Args)]
pub struct StatusArgs {
    /// The run to inspect
    pub run_id: String,
}

pub async fn run(args: StatusArgs, store: &RunStore, format: OutputFormat) -> Result<()> {
    let session = store.get_status(&args.run_id).await?;
    print_session(&session, format);
    Ok(())
}
