// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic file writes: write to a uniquely-named temp file in the same
//! directory, `sync_all`, then rename over the destination. A crash or
//! concurrent reader never observes a partially-written file (spec
//! invariant I1: "a reader of `session.json` or `result.json` never
//! observes a partial write").
//!
//! The temp suffix carries the writer's pid, a timestamp, and a random
//! token so that two processes racing to write the same path never
//! collide on the same temp file (unlike a single-writer daemon, this
//! store is written to by many short-lived `td` runner invocations).

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::StoreError;

fn temp_path_for(dest: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let token: u64 = {
        use rand::Rng;
        rand::rng().random()
    };
    let file_name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("tmp");
    dest.with_file_name(format!(".{file_name}.{pid}.{nanos}.{token:x}.tmp"))
}

/// Write `bytes` to `dest` atomically. Creates `dest`'s parent directory
/// if missing.
pub async fn atomic_write_bytes(dest: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = temp_path_for(dest);

    let result = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    tokio::fs::rename(&tmp, dest).await?;
    Ok(())
}

/// Serialize `value` as pretty JSON and write it atomically to `dest`.
pub async fn atomic_write_json<T: serde::Serialize>(
    dest: &Path,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    atomic_write_bytes(dest, &bytes).await
}

/// Append `bytes` to `dest`, creating it (and its parent directory) if
/// missing. Not atomic across processes by itself; callers that need
/// exclusivity should hold the relevant lock file first.
pub async fn append_bytes(dest: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dest)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
