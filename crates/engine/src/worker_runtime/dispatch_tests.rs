// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;
use xbot_adapters::fake::FakeWorkerBackend;
use xbot_core::test_support::sample_worker;
use xbot_core::{FakeClock, SequentialIdGen};

#[tokio::test]
async fn dispatch_runs_a_worker_to_completion_and_frees_the_slot() {
    let dir = tempfile::tempdir().unwrap();
    let store = WorkerStore::new(dir.path());
    store.register(sample_worker("w-1", "alice")).unwrap();

    let backend = FakeWorkerBackend::new();
    backend.set_outcome(
        "run-0",
        WorkerOutcome::Done {
            summary: "deployed".to_string(),
        },
    );

    let clock = FakeClock::default();
    let id_gen = SequentialIdGen::new("t");
    let outcome = dispatch_worker(
        &store,
        &backend,
        &clock,
        &id_gen,
        dir.path(),
        &xbot_core::WorkerId::new("w-1"),
        "deploy the thing",
        HashMap::new(),
        &|_msg| {},
    )
    .await
    .unwrap();

    assert!(matches!(outcome, WorkerOutcome::Done { summary } if summary == "deployed"));
    let record = store.get(&xbot_core::WorkerId::new("w-1")).unwrap();
    assert_eq!(record.status, xbot_core::WorkerStatus::Idle);

    let entries = task_log::read_all(dir.path()).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].status, WorkerTaskStatus::Queued);
    assert_eq!(entries[1].status, WorkerTaskStatus::Running);
    assert_eq!(entries[2].status, WorkerTaskStatus::Done);
    assert!(entries[2].started_at.is_some());
    assert_eq!(entries[2].events.len(), 3);
}

#[tokio::test]
async fn dispatch_rejects_a_busy_worker() {
    let dir = tempfile::tempdir().unwrap();
    let store = WorkerStore::new(dir.path());
    let mut worker = sample_worker("w-1", "alice");
    worker.status = xbot_core::WorkerStatus::Busy;
    store.register(worker).unwrap();

    let backend = FakeWorkerBackend::new();
    let clock = FakeClock::default();
    let id_gen = SequentialIdGen::new("t");

    let err = dispatch_worker(
        &store,
        &backend,
        &clock,
        &id_gen,
        dir.path(),
        &xbot_core::WorkerId::new("w-1"),
        "go",
        HashMap::new(),
        &|_msg| {},
    )
    .await;
    assert!(err.is_err());
    assert!(backend.spawned_configs().is_empty());
}

#[tokio::test]
async fn dispatch_unknown_worker_errors() {
    let dir = tempfile::tempdir().unwrap();
    let store = WorkerStore::new(dir.path());
    let backend = FakeWorkerBackend::new();
    let clock = FakeClock::default();
    let id_gen = SequentialIdGen::new("t");

    let err = dispatch_worker(
        &store,
        &backend,
        &clock,
        &id_gen,
        dir.path(),
        &xbot_core::WorkerId::new("missing"),
        "go",
        HashMap::new(),
        &|_msg| {},
    )
    .await;
    assert!(matches!(err, Err(EngineError::ToolNotFound(_))));
}

#[tokio::test]
async fn spawn_failure_marks_the_worker_errored_and_logs_failed() {
    let dir = tempfile::tempdir().unwrap();
    let store = WorkerStore::new(dir.path());
    store.register(sample_worker("w-1", "alice")).unwrap();

    let backend = FakeWorkerBackend::new();
    backend.set_spawn_error("boom");

    let clock = FakeClock::default();
    let id_gen = SequentialIdGen::new("t");
    let err = dispatch_worker(
        &store,
        &backend,
        &clock,
        &id_gen,
        dir.path(),
        &xbot_core::WorkerId::new("w-1"),
        "go",
        HashMap::new(),
        &|_msg| {},
    )
    .await;
    assert!(err.is_err());

    let record = store.get(&xbot_core::WorkerId::new("w-1")).unwrap();
    assert_eq!(record.status, xbot_core::WorkerStatus::Error);

    let entries = task_log::read_all(dir.path()).unwrap();
    assert_eq!(entries.last().unwrap().status, WorkerTaskStatus::Failed);
}

#[tokio::test]
async fn failed_outcome_leaves_the_worker_in_error_status() {
    let dir = tempfile::tempdir().unwrap();
    let store = WorkerStore::new(dir.path());
    store.register(sample_worker("w-1", "alice")).unwrap();

    let backend = FakeWorkerBackend::new();
    backend.set_outcome(
        "run-0",
        WorkerOutcome::Failed {
            error: "exit 1".to_string(),
        },
    );

    let clock = FakeClock::default();
    let id_gen = SequentialIdGen::new("t");
    let outcome = dispatch_worker(
        &store,
        &backend,
        &clock,
        &id_gen,
        dir.path(),
        &xbot_core::WorkerId::new("w-1"),
        "go",
        HashMap::new(),
        &|_msg| {},
    )
    .await
    .unwrap();

    assert!(matches!(outcome, WorkerOutcome::Failed { .. }));
    let record = store.get(&xbot_core::WorkerId::new("w-1")).unwrap();
    assert_eq!(record.status, xbot_core::WorkerStatus::Error);
}
