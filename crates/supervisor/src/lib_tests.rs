// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use td_core::ErrorCode;

use super::*;

fn spec(program: &str, args: &[&str], timeout: Duration) -> SpawnSpec {
    SpawnSpec {
        program: program.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
        cwd: std::env::temp_dir(),
        timeout,
        home: None,
    }
}

#[tokio::test]
async fn successful_run_invokes_parser_with_captured_stdout() {
    let spec = spec("sh", &["-c", "echo hi"], Duration::from_secs(5));
    let result: String = supervise(spec, |_pid, stdout, _stderr| {
        String::from_utf8_lossy(stdout).trim().to_string()
    })
    .await
    .unwrap();
    assert_eq!(result, "hi");
}

#[tokio::test]
async fn successful_run_passes_a_pid_to_the_parser() {
    let spec = spec("sh", &["-c", "echo hi"], Duration::from_secs(5));
    let pid: Option<u32> = supervise(spec, |pid, _stdout, _stderr| pid)
        .await
        .unwrap();
    assert!(pid.is_some_and(|p| p > 0));
}

#[tokio::test]
async fn nonzero_exit_never_invokes_parser() {
    let spec = spec("sh", &["-c", "echo should_not_be_seen; exit 3"], Duration::from_secs(5));
    let err = supervise(spec, |_pid, _stdout, _stderr| {
        panic!("parser must not run on non-zero exit");
    })
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::EngineCrash);
}

#[tokio::test]
async fn nonzero_exit_prefers_stderr_as_message() {
    let spec = spec(
        "sh",
        &["-c", "echo boom 1>&2; exit 1"],
        Duration::from_secs(5),
    );
    let err = supervise(spec, |_pid, _o, _e| ()).await.unwrap_err();
    assert_eq!(err.message, "boom");
}

#[tokio::test]
async fn timeout_surfaces_engine_timeout() {
    let spec = spec("sleep", &["30"], Duration::from_millis(100));
    let err = supervise(spec, |_pid, _o, _e| ()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EngineTimeout);
    assert!(err.retryable);
}

#[tokio::test]
async fn spawn_failure_surfaces_engine_crash() {
    let spec = spec(
        "/definitely/not/a/real/binary-xyz",
        &[],
        Duration::from_secs(5),
    );
    let err = supervise(spec, |_pid, _o, _e| ()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EngineCrash);
}
