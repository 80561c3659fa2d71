// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn run_id_parse_accepts_minimum_length() {
    let id = RunId::parse("run-abcdefghijkl").unwrap();
    assert_eq!(id.as_str(), "run-abcdefghijkl");
}

#[test]
fn run_id_parse_accepts_underscores_and_dashes() {
    assert!(RunId::parse("run-abc_def-ghi12").is_some());
}

#[test]
fn run_id_parse_rejects_short_suffix() {
    assert!(RunId::parse("run-short").is_none());
}

#[test]
fn run_id_parse_rejects_missing_prefix() {
    assert!(RunId::parse("abcdefghijklmnop").is_none());
}

#[test]
fn run_id_parse_rejects_path_separators() {
    assert!(RunId::parse("run-../../etc/passwd").is_none());
}

#[test]
fn run_id_parse_rejects_non_ascii() {
    assert!(RunId::parse("run-abcdefg\u{1F600}hijk").is_none());
}

#[test]
fn uuid_id_gen_produces_distinct_ids() {
    let gen = UuidIdGen;
    let a = gen.next_run_id();
    let b = gen.next_run_id();
    assert_ne!(a, b);
    assert!(a.as_str().starts_with("run-"));
}

#[test]
fn sequential_id_gen_is_deterministic() {
    let gen = SequentialIdGen::new("t");
    let a = gen.next_run_id();
    let b = gen.next_run_id();
    assert_ne!(a, b);
}

#[test]
fn define_id_display_and_borrow() {
    use std::borrow::Borrow;
    let id = RunId::new("run-abcdefghijkl");
    assert_eq!(format!("{id}"), "run-abcdefghijkl");
    let s: &str = id.borrow();
    assert_eq!(s, "run-abcdefghijkl");
}
