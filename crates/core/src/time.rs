// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamp formatting shared across crates.

use chrono::Utc;

/// The current instant formatted as RFC 3339 / ISO-8601 (UTC, millisecond precision).
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
