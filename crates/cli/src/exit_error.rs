// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A marker error carrying the process exit code a command wants,
//! distinct from the message `anyhow` prints. `main` downcasts for this
//! before falling back to exit code 1 for any other error.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
}

impl ExitError {
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exiting with code {}", self.code)
    }
}

impl std::error::Error for ExitError {}
