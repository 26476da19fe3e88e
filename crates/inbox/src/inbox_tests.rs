// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::store;
use xbot_core::test_support::sample_task_config;
use xbot_core::{FakeClock, SequentialIdGen, TaskStatus};

fn test_inbox() -> (tempfile::TempDir, Inbox<FakeClock, SequentialIdGen>) {
    let dir = tempfile::tempdir().unwrap();
    let inbox = Inbox::new(dir.path(), FakeClock::default(), SequentialIdGen::new("t"));
    (dir, inbox)
}

#[tokio::test]
async fn submit_returns_a_pending_envelope() {
    let (_dir, inbox) = test_inbox();
    let envelope = inbox.submit(sample_task_config("hello")).await.unwrap();
    assert_eq!(envelope.status, TaskStatus::Pending);
    assert_eq!(envelope.goal, "hello");
}

#[tokio::test]
async fn get_returns_the_submitted_envelope() {
    let (_dir, inbox) = test_inbox();
    let envelope = inbox.submit(sample_task_config("hello")).await.unwrap();
    let fetched = inbox.get(&envelope.task_id).await.unwrap();
    assert_eq!(fetched.task_id, envelope.task_id);
}

#[tokio::test]
async fn get_on_unknown_id_is_none() {
    let (_dir, inbox) = test_inbox();
    assert!(inbox.get(&xbot_core::TaskId::new("missing")).await.is_none());
}

#[tokio::test]
async fn status_transitions_are_monotonic() {
    let (_dir, inbox) = test_inbox();
    let envelope = inbox.submit(sample_task_config("hello")).await.unwrap();

    // pending -> completed directly is illegal; must pass through running.
    let skipped = inbox
        .update_status(&envelope.task_id, TaskStatus::Completed)
        .await;
    assert!(matches!(skipped, Err(InboxError::InvalidTransition { .. })));

    let running = inbox
        .update_status(&envelope.task_id, TaskStatus::Running)
        .await
        .unwrap();
    assert_eq!(running.status, TaskStatus::Running);

    // running -> pending is also illegal: terminal states only go forward.
    let backward = inbox.update_status(&envelope.task_id, TaskStatus::Pending).await;
    assert!(matches!(backward, Err(InboxError::InvalidTransition { .. })));
}

#[tokio::test]
async fn complete_requires_running_state() {
    let (_dir, inbox) = test_inbox();
    let envelope = inbox.submit(sample_task_config("hello")).await.unwrap();

    let err = inbox.complete(&envelope.task_id, None, "done").await;
    assert!(matches!(err, Err(InboxError::InvalidTransition { .. })));

    inbox
        .update_status(&envelope.task_id, TaskStatus::Running)
        .await
        .unwrap();
    let completed = inbox.complete(&envelope.task_id, None, "done").await.unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);
    assert_eq!(completed.final_output.as_deref(), Some("done"));
}

#[tokio::test]
async fn fail_increments_retry_count() {
    let (_dir, inbox) = test_inbox();
    let envelope = inbox.submit(sample_task_config("hello")).await.unwrap();
    inbox
        .update_status(&envelope.task_id, TaskStatus::Running)
        .await
        .unwrap();
    let failed = inbox.fail(&envelope.task_id, "exec_failure").await.unwrap();
    assert_eq!(failed.status, TaskStatus::Failed);
    assert_eq!(failed.retry_count, 1);
}

#[tokio::test]
async fn assign_worker_rejects_double_assignment() {
    let (_dir, inbox) = test_inbox();
    let envelope = inbox.submit(sample_task_config("deploy")).await.unwrap();
    inbox
        .assign_worker(&envelope.task_id, xbot_core::WorkerId::new("w-1"), "capability match")
        .await
        .unwrap();
    let err = inbox
        .assign_worker(&envelope.task_id, xbot_core::WorkerId::new("w-2"), "retry")
        .await;
    assert!(matches!(err, Err(InboxError::AlreadyAssigned(_))));
}

#[tokio::test]
async fn list_pending_orders_by_priority_then_fifo() {
    let (_dir, inbox) = test_inbox();
    let mut low = sample_task_config("low");
    low.priority = xbot_core::Priority::Low;
    let mut high = sample_task_config("high");
    high.priority = xbot_core::Priority::High;
    let normal = sample_task_config("normal");

    let low = inbox.submit(low).await.unwrap();
    let normal = inbox.submit(normal).await.unwrap();
    let high = inbox.submit(high).await.unwrap();

    let pending = inbox.list_pending(10).await;
    let ids: Vec<_> = pending.iter().map(|t| t.task_id.clone()).collect();
    assert_eq!(ids, vec![high.task_id, normal.task_id, low.task_id]);
}

#[tokio::test]
async fn list_pending_respects_limit() {
    let (_dir, inbox) = test_inbox();
    for i in 0..5 {
        inbox
            .submit(sample_task_config(&format!("goal-{i}")))
            .await
            .unwrap();
    }
    assert_eq!(inbox.list_pending(2).await.len(), 2);
}

#[tokio::test]
async fn list_all_includes_terminal_envelopes_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let clock = FakeClock::default();
    let inbox = Inbox::new(dir.path(), clock.clone(), SequentialIdGen::new("t"));
    let first = inbox.submit(sample_task_config("first")).await.unwrap();
    clock.advance(std::time::Duration::from_secs(1));
    let second = inbox.submit(sample_task_config("second")).await.unwrap();
    inbox
        .update_status(&first.task_id, xbot_core::TaskStatus::Running)
        .await
        .unwrap();
    inbox
        .complete(&first.task_id, None, "done")
        .await
        .unwrap();

    let all = inbox.list_all().await;
    let ids: Vec<_> = all.iter().map(|t| t.task_id.clone()).collect();
    assert_eq!(ids, vec![second.task_id, first.task_id]);
}

#[tokio::test]
async fn has_active_user_chat_true_while_non_terminal() {
    let (_dir, inbox) = test_inbox();
    let envelope = inbox.submit(sample_task_config("hi")).await.unwrap();
    assert!(
        inbox
            .has_active_user_chat(&envelope.user_id, &envelope.platform)
            .await
    );
    inbox
        .update_status(&envelope.task_id, TaskStatus::Running)
        .await
        .unwrap();
    inbox.complete(&envelope.task_id, None, "done").await.unwrap();
    assert!(
        !inbox
            .has_active_user_chat(&envelope.user_id, &envelope.platform)
            .await
    );
}

#[tokio::test]
async fn hydrate_reloads_envelopes_persisted_by_a_prior_process() {
    let dir = tempfile::tempdir().unwrap();
    {
        let inbox = Inbox::new(dir.path(), FakeClock::default(), SequentialIdGen::new("t"));
        inbox.submit(sample_task_config("hello")).await.unwrap();
    }
    let inbox = Inbox::new(dir.path(), FakeClock::default(), SequentialIdGen::new("t"));
    let loaded = inbox.hydrate().await.unwrap();
    assert_eq!(loaded, 1);
    assert_eq!(inbox.list_pending(10).await.len(), 1);
}

#[tokio::test]
async fn sweep_terminal_drops_old_terminal_envelopes_from_memory_only() {
    let dir = tempfile::tempdir().unwrap();
    let clock = FakeClock::default();
    let inbox = Inbox::new(dir.path(), clock.clone(), SequentialIdGen::new("t"));
    let envelope = inbox.submit(sample_task_config("hi")).await.unwrap();
    inbox
        .update_status(&envelope.task_id, TaskStatus::Running)
        .await
        .unwrap();
    inbox.complete(&envelope.task_id, None, "done").await.unwrap();

    clock.advance(std::time::Duration::from_millis(DEFAULT_RETENTION_MS + 1));
    let dropped = inbox.sweep_terminal(DEFAULT_RETENTION_MS).await;
    assert_eq!(dropped, 1);
    assert!(inbox.get(&envelope.task_id).await.is_none());
    // but the file on disk survives for replay-task
    assert!(store::read_task(dir.path(), &envelope.task_id).is_ok());
}
