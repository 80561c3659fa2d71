// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output rendering for read-path commands (`status`, `list`): either a
//! human-readable table or raw JSON, selected by the global `-o/--output`
//! flag. `submit` and `stop` always print the result JSON verbatim (spec
//! §6: "The CLI prints the result JSON to standard output on success").

use clap::ValueEnum;
use td_core::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn print_session(session: &Session, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(session).unwrap_or_default());
        }
        OutputFormat::Table => print_session_table(std::slice::from_ref(session)),
    }
}

pub fn print_sessions(sessions: &[Session], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(sessions).unwrap_or_default());
        }
        OutputFormat::Table => print_session_table(sessions),
    }
}

fn print_session_table(sessions: &[Session]) {
    let columns = ["RUN_ID", "ENGINE", "STATE", "PID", "CREATED_AT"];
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();

    let rows: Vec<[String; 5]> = sessions
        .iter()
        .map(|s| {
            [
                s.run_id.clone(),
                s.engine.clone(),
                s.state.to_string(),
                s.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
                s.created_at.clone(),
            ]
        })
        .collect();

    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    print_row(&columns.map(|c| c.to_string()), &widths);
    for row in &rows {
        print_row(row, &widths);
    }
}

fn print_row(cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    println!("{}", line.join("  ").trim_end());
}
