// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::context::UnifiedChat;
use xbot_core::WorkerId;

#[tokio::test]
async fn fake_context_records_replies() {
    let ctx = FakeUnifiedContext::new();
    let chat = UnifiedChat { id: "c-1".to_string() };
    ctx.reply(&chat, "hi there", None).await.unwrap();
    assert_eq!(ctx.last_reply_text().as_deref(), Some("hi there"));
    assert_eq!(ctx.calls().len(), 1);
}

#[tokio::test]
async fn fake_context_records_edits_and_callbacks() {
    let ctx = FakeUnifiedContext::new();
    let chat = UnifiedChat { id: "c-1".to_string() };
    let msg_id = ctx.reply(&chat, "first", None).await.unwrap();
    ctx.edit_message(&chat, &msg_id, "updated", None).await.unwrap();
    ctx.answer_callback("cb-1").await.unwrap();
    assert_eq!(ctx.calls().len(), 3);
}

fn sample_config(worker_id: &str) -> WorkerSpawnConfig {
    WorkerSpawnConfig {
        worker_id: WorkerId::new(worker_id),
        task_id: "t-1".to_string(),
        instruction: "do the thing".to_string(),
        workspace_path: PathBuf::from("/tmp/ws"),
        soul_path: PathBuf::from("/tmp/soul.md"),
        metadata: HashMap::new(),
        timeout_secs: 60,
    }
}

#[tokio::test]
async fn fake_backend_records_spawn_and_assigns_run_id() {
    let backend = FakeWorkerBackend::new();
    let handle = backend.spawn(sample_config("w-1")).await.unwrap();
    assert_eq!(handle.worker_id, WorkerId::new("w-1"));
    assert_eq!(backend.spawned_configs().len(), 1);
}

#[tokio::test]
async fn fake_backend_poll_reports_none_until_outcome_is_set() {
    let backend = FakeWorkerBackend::new();
    let handle = backend.spawn(sample_config("w-1")).await.unwrap();
    assert!(backend.poll(&handle).await.unwrap().is_none());

    backend.set_outcome(
        handle.run_id.clone(),
        WorkerOutcome::Done {
            summary: "done".to_string(),
        },
    );
    let outcome = backend.poll(&handle).await.unwrap();
    assert!(matches!(outcome, Some(WorkerOutcome::Done { .. })));
    // outcome is consumed; a second poll sees nothing new.
    assert!(backend.poll(&handle).await.unwrap().is_none());
}

#[tokio::test]
async fn fake_backend_spawn_error_is_returned_once() {
    let backend = FakeWorkerBackend::new();
    backend.set_spawn_error("boom");
    let err = backend.spawn(sample_config("w-1")).await.unwrap_err();
    assert!(matches!(err, WorkerBackendError::SpawnFailed(_)));
    // error is consumed; next spawn succeeds.
    assert!(backend.spawn(sample_config("w-1")).await.is_ok());
}

#[tokio::test]
async fn fake_backend_records_kill() {
    let backend = FakeWorkerBackend::new();
    let handle = backend.spawn(sample_config("w-1")).await.unwrap();
    backend.kill(&handle).await.unwrap();
    assert_eq!(backend.inner.lock().killed.len(), 1);
}
