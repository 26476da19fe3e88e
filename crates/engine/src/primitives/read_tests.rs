// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn reads_full_file_content() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("notes.md"), "line1\nline2\nline3")
        .await
        .unwrap();
    let ctx = PrimitiveContext::manager(dir.path());

    let obs = read(&ctx, "notes.md", None, None, None).await;
    assert!(obs.ok);
    assert_eq!(obs.data.unwrap()["total_lines"], 3);
}

#[tokio::test]
async fn respects_start_line_and_max_lines() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("notes.md"), "a\nb\nc\nd")
        .await
        .unwrap();
    let ctx = PrimitiveContext::manager(dir.path());

    let obs = read(&ctx, "notes.md", Some(1), Some(2), None).await;
    assert_eq!(obs.data.unwrap()["content"], "b\nc");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = PrimitiveContext::manager(dir.path());
    let obs = read(&ctx, "missing.md", None, None, None).await;
    assert!(!obs.ok);
    assert_eq!(obs.error_code, Some(xbot_core::ErrorCode::NotFound));
}

#[tokio::test]
async fn sensitive_path_is_denied_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = PrimitiveContext::manager(dir.path());
    let obs = read(&ctx, ".env", None, None, None).await;
    assert!(!obs.ok);
    assert_eq!(obs.error_code, Some(xbot_core::ErrorCode::PathDenied));
}

#[tokio::test]
async fn escaping_the_worker_root_is_denied() {
    let root = tempfile::tempdir().unwrap();
    let worker_dir = root.path().join("workers/w-1");
    tokio::fs::create_dir_all(&worker_dir).await.unwrap();
    let ctx = PrimitiveContext::worker(&worker_dir);

    let obs = read(&ctx, "../../etc/passwd", None, None, None).await;
    assert!(!obs.ok);
    assert_eq!(obs.error_code, Some(xbot_core::ErrorCode::PathDenied));
}

#[tokio::test]
async fn unsupported_encoding_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = PrimitiveContext::manager(dir.path());
    let obs = read(&ctx, "anything.md", None, None, Some("latin1")).await;
    assert!(!obs.ok);
    assert_eq!(obs.error_code, Some(xbot_core::ErrorCode::InvalidInput));
}
