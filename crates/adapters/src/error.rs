// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the adapter interface itself, as opposed to the
//! per-invocation [`td_core::ErrorInfo`] carried in an `AdapterResponse`.

use thiserror::Error;

/// Failures from resolving or constructing an adapter (spec §4.8).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// An exact-match lookup failed. The offending name is truncated to at
    /// most 64 characters before it reaches this message, since it is
    /// untrusted input and must never blow up a log line.
    #[error("unknown engine {0:?}")]
    UnknownEngine(String),
}

const MAX_NAME_LEN: usize = 64;

/// Truncate untrusted engine-name input to [`MAX_NAME_LEN`] characters.
pub(crate) fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LEN).collect()
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
