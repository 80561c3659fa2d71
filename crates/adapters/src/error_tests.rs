// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn truncate_name_leaves_short_names_untouched() {
    assert_eq!(truncate_name("claude-code"), "claude-code");
}

#[test]
fn truncate_name_caps_at_64_chars() {
    let long = "x".repeat(500);
    let truncated = truncate_name(&long);
    assert_eq!(truncated.chars().count(), MAX_NAME_LEN);
}

#[test]
fn unknown_engine_display_includes_the_name() {
    let err = AdapterError::UnknownEngine("bogus".to_string());
    assert!(err.to_string().contains("bogus"));
}
