// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

#[tokio::test]
async fn acquire_creates_and_releases_lock_file() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join(".session.lock");
    {
        let _guard = LockGuard::acquire_default(&lock_path).await.unwrap();
        assert!(lock_path.exists());
    }
    assert!(!lock_path.exists());
}

#[tokio::test]
async fn second_acquire_times_out_while_first_is_held() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join(".session.lock");
    let _guard = LockGuard::acquire_default(&lock_path).await.unwrap();

    let err = LockGuard::acquire(&lock_path, Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::LockTimeout(_, _)));
}

#[tokio::test]
async fn acquire_succeeds_once_prior_holder_drops() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join(".result.lock");
    let guard = LockGuard::acquire_default(&lock_path).await.unwrap();
    drop(guard);

    let _second = LockGuard::acquire(&lock_path, Duration::from_millis(500))
        .await
        .unwrap();
}
