// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use xbot_core::{FakeClock, SequentialIdGen};

struct AlwaysChanged;

#[async_trait]
impl SubJob for AlwaysChanged {
    fn name(&self) -> &str {
        "watchlist"
    }
    async fn run(&self, _user_id: &str, _data_dir: &Path) -> SubJobResult {
        SubJobResult {
            changed: true,
            summary: Some("2 new items".to_string()),
        }
    }
}

struct NeverChanged;

#[async_trait]
impl SubJob for NeverChanged {
    fn name(&self) -> &str {
        "rss"
    }
    async fn run(&self, _user_id: &str, _data_dir: &Path) -> SubJobResult {
        SubJobResult::default()
    }
}

fn seed_status(data_dir: &Path, user_id: &str, status: &HeartbeatStatus) {
    let path = xbot_state::user_path(data_dir, user_id, &["STATUS.json"]);
    let value = serde_json::to_value(status).unwrap();
    xbot_state::write_state(&path, &value).unwrap();
}

#[tokio::test]
async fn due_users_finds_only_users_past_their_next_due() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = FakeClock::new(10_000_000);

    let due_status = HeartbeatStatus::new("alice", 300, 0);
    seed_status(tmp.path(), "alice", &due_status);

    let mut not_due = HeartbeatStatus::new("bob", 300, 0);
    not_due.next_due_ms = clock.epoch_ms() + 60_000;
    seed_status(tmp.path(), "bob", &not_due);

    let dispatcher = HeartbeatDispatcher::new(clock, tmp.path(), vec![]);
    assert_eq!(dispatcher.due_users(), vec!["alice".to_string()]);
}

#[tokio::test]
async fn paused_user_is_excluded_even_when_due() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = FakeClock::new(10_000_000);
    let mut status = HeartbeatStatus::new("alice", 300, 0);
    status.paused_until_ms = Some(clock.epoch_ms() + 60_000);
    seed_status(tmp.path(), "alice", &status);

    let dispatcher = HeartbeatDispatcher::new(clock, tmp.path(), vec![]);
    assert!(dispatcher.due_users().is_empty());
}

#[tokio::test]
async fn all_sub_jobs_silent_yields_heartbeat_ok_sentinel_and_grade_ok() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = FakeClock::new(10_000_000);
    let status = HeartbeatStatus::new("alice", 300, 0);
    seed_status(tmp.path(), "alice", &status);

    let dispatcher = HeartbeatDispatcher::new(
        clock.clone(),
        tmp.path(),
        vec![Arc::new(NeverChanged)],
    );
    let inbox = Inbox::new(tmp.path(), clock, SequentialIdGen::new("t"));
    dispatcher.run_for_user("alice", &inbox).await.unwrap();

    let log = std::fs::read_to_string(tmp.path().join("users/alice/HEARTBEAT.md")).unwrap();
    assert!(log.contains("OK"));
    assert!(log.contains(HEARTBEAT_OK_SENTINEL));
}

#[tokio::test]
async fn a_changed_sub_job_yields_notice_and_is_not_suppressed() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = FakeClock::new(10_000_000);
    let status = HeartbeatStatus::new("alice", 300, 0);
    seed_status(tmp.path(), "alice", &status);

    let dispatcher = HeartbeatDispatcher::new(
        clock.clone(),
        tmp.path(),
        vec![Arc::new(AlwaysChanged)],
    );
    let inbox = Inbox::new(tmp.path(), clock, SequentialIdGen::new("t"));
    dispatcher.run_for_user("alice", &inbox).await.unwrap();

    let log = std::fs::read_to_string(tmp.path().join("users/alice/HEARTBEAT.md")).unwrap();
    assert!(log.contains("NOTICE"));
    assert!(log.contains("2 new items"));
}

#[tokio::test]
async fn run_for_user_advances_next_due_by_every_seconds() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = FakeClock::new(10_000_000);
    let status = HeartbeatStatus::new("alice", 300, 0);
    seed_status(tmp.path(), "alice", &status);

    let dispatcher = HeartbeatDispatcher::new(clock.clone(), tmp.path(), vec![]);
    let inbox = Inbox::new(tmp.path(), clock.clone(), SequentialIdGen::new("t"));
    dispatcher.run_for_user("alice", &inbox).await.unwrap();

    let path = xbot_state::user_path(tmp.path(), "alice", &["STATUS.json"]);
    let payload = xbot_state::read_state(&path).unwrap();
    let reloaded: HeartbeatStatus = serde_json::from_value(payload.data).unwrap();
    assert_eq!(reloaded.next_due_ms, clock.epoch_ms() + 300_000);
}

#[tokio::test]
async fn missing_status_file_is_skipped_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("users/alice")).unwrap();
    let clock = FakeClock::new(10_000_000);
    let dispatcher = HeartbeatDispatcher::new(clock, tmp.path(), vec![]);
    assert!(dispatcher.due_users().is_empty());
}
