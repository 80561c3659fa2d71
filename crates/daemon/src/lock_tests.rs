// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tempfile::tempdir;

use super::*;

#[test]
fn acquiring_twice_from_the_same_process_fails_the_second_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon.pid");

    let first = SingletonLock::acquire(&path).unwrap();
    let second = SingletonLock::acquire(&path);
    assert!(matches!(second, Err(SingletonLockError::AlreadyRunning(_))));

    drop(first);
    assert!(SingletonLock::acquire(&path).is_ok());
}

#[test]
fn acquiring_creates_parent_directories_and_records_the_pid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("daemon.pid");

    let _lock = SingletonLock::acquire(&path).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim(), std::process::id().to_string());
}
