// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! td-store: the filesystem-backed run store.
//!
//! Owns the on-disk layout of a single runs root `R`: atomic writes,
//! advisory per-run locks, run enumeration, and request/session/result
//! lifecycle operations. Carries no knowledge of subprocesses or engine
//! adapters — those live in `td-supervisor`, `td-adapters`, and `td-engine`.

mod atomic;
mod error;
mod layout;
mod lock;
mod reconciliation_log;
mod store;

pub use atomic::{append_bytes, atomic_write_bytes, atomic_write_json};
pub use error::StoreError;
pub use layout::{RunLayout, RESERVED_SUBDIRS};
pub use lock::LockGuard;
pub use reconciliation_log::append_action;
pub use store::RunStore;
