// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use xbot_core::WorkerId;

fn entry(task_id: &str, status: WorkerTaskStatus) -> WorkerTaskLogEntry {
    WorkerTaskLogEntry {
        task_id: task_id.to_string(),
        worker_id: WorkerId::new("w-1"),
        status,
        source: "manager_dispatch".to_string(),
        created_at: 1,
        started_at: None,
        ended_at: None,
        error: None,
        retry_count: 0,
        summary: None,
        events: Vec::new(),
    }
}

#[test]
fn appends_and_reads_back_entries_in_order() {
    let dir = tempfile::tempdir().unwrap();
    append(dir.path(), &entry("t-1", WorkerTaskStatus::Queued)).unwrap();
    append(dir.path(), &entry("t-2", WorkerTaskStatus::Queued)).unwrap();

    let entries = read_all(dir.path()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].task_id, "t-1");
    assert_eq!(entries[1].task_id, "t-2");
}

#[test]
fn read_all_on_missing_log_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_all(dir.path()).unwrap().is_empty());
}

#[test]
fn entries_with_terminal_fields_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut done = entry("t-1", WorkerTaskStatus::Done);
    done.started_at = Some(5);
    done.ended_at = Some(42);
    done.retry_count = 2;
    done.summary = Some("deployed".to_string());
    done.events.push(WorkerTaskEvent {
        ts: 5,
        kind: "running".to_string(),
        note: "backend spawn started".to_string(),
    });
    done.events.push(WorkerTaskEvent {
        ts: 42,
        kind: "done".to_string(),
        note: "deployed".to_string(),
    });
    append(dir.path(), &done).unwrap();

    let entries = read_all(dir.path()).unwrap();
    assert_eq!(entries[0].started_at, Some(5));
    assert_eq!(entries[0].ended_at, Some(42));
    assert_eq!(entries[0].retry_count, 2);
    assert_eq!(entries[0].summary.as_deref(), Some("deployed"));
    assert_eq!(entries[0].events.len(), 2);
    assert_eq!(entries[0].events[1].kind, "done");
}

#[test]
fn log_file_is_wrapped_in_the_canonical_marker_block() {
    let dir = tempfile::tempdir().unwrap();
    append(dir.path(), &entry("t-1", WorkerTaskStatus::Queued)).unwrap();
    append(dir.path(), &entry("t-2", WorkerTaskStatus::Running)).unwrap();

    let content = std::fs::read_to_string(dir.path().join("WORKER_TASKS.jsonl")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], xbot_state::STATE_BEGIN_MARKER);
    assert_eq!(
        lines[lines.len() - 1],
        xbot_state::STATE_END_MARKER,
        "{content}"
    );
    assert!(lines[1].starts_with("{\"task_id\":\"t-1\""), "{content}");
    assert!(lines[2].starts_with("{\"task_id\":\"t-2\""), "{content}");
}

#[test]
fn appending_past_an_existing_marker_block_stays_well_formed() {
    let dir = tempfile::tempdir().unwrap();
    append(dir.path(), &entry("t-1", WorkerTaskStatus::Queued)).unwrap();
    append(dir.path(), &entry("t-1", WorkerTaskStatus::Running)).unwrap();
    append(dir.path(), &entry("t-1", WorkerTaskStatus::Done)).unwrap();

    let content = std::fs::read_to_string(dir.path().join("WORKER_TASKS.jsonl")).unwrap();
    assert_eq!(
        content.matches(xbot_state::STATE_BEGIN_MARKER).count(),
        1,
        "{content}"
    );
    assert_eq!(
        content.matches(xbot_state::STATE_END_MARKER).count(),
        1,
        "{content}"
    );

    let entries = read_all(dir.path()).unwrap();
    assert_eq!(entries.len(), 3);
}
