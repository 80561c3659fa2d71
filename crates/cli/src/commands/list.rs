// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `td list` - enumerate every run under the runs root.

use anyhow::Result;
use clap::Args;
use td_core::SessionState;
use td_store::RunStore;

use crate::output::{print_sessions, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Only show runs in this state
    #[arg(long, value_enum)]
    pub state: Option<StateArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StateArg {
    Created,
    Running,
    Stopping,
    Completed,
    Failed,
}

impl From<StateArg> for SessionState {
    fn from(value: StateArg) -> Self {
        match value {
            StateArg::Created => SessionState::Created,
            StateArg::Running => SessionState::Running,
            StateArg::Stopping => SessionState::Stopping,
            StateArg::Completed => SessionState::Completed,
            StateArg::Failed => SessionState::Failed,
        }
    }
}

pub async fn run(args: ListArgs, store: &RunStore, format: OutputFormat) -> Result<()> {
    let mut sessions = store.list_runs().await?;
    if let Some(state) = args.state {
        let state: SessionState = state.into();
        sessions.retain(|s| s.state == state);
    }
    sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    print_sessions(&sessions, format);
    Ok(())
}
