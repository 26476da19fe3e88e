// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat Worker (§4.7, §4.7a): drives per-user periodic maintenance
//! without a user prompt. A single [`HeartbeatDispatcher`] scans the user
//! set on each tick; for every user whose pulse is due, within active
//! hours, and not paused, it runs the registered sub-jobs synchronously,
//! submits a `source=heartbeat` task recording the outcome, and appends one
//! line to `HEARTBEAT.md` regardless of whether anything was delivered.

mod sub_jobs;

pub use sub_jobs::{
    MemoryCompactionSubJob, ReminderSweepSubJob, RssCheckSubJob, WatchlistRefreshSubJob,
};

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use xbot_core::{
    Clock, HeartbeatGrade, HeartbeatStatus, IdGen, Priority, TaskConfig, TaskSource,
    HEARTBEAT_OK_SENTINEL,
};
use xbot_inbox::Inbox;

use crate::EngineError;

/// Outcome of one sub-job's run against a user's state.
#[derive(Debug, Clone, Default)]
pub struct SubJobResult {
    pub changed: bool,
    pub summary: Option<String>,
}

/// One unit of periodic per-user maintenance: RSS check, watchlist refresh,
/// reminder sweep, memory compaction. Memory consolidation runs as an
/// ordinary sub-job rather than a deferred background task, so its cost is
/// bounded by the same per-tick budget as everything else (§4.7a).
#[async_trait]
pub trait SubJob: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self, user_id: &str, data_dir: &Path) -> SubJobResult;
}

/// Drives the per-tick scan and per-user maintenance run.
pub struct HeartbeatDispatcher<C: Clock> {
    clock: C,
    data_dir: PathBuf,
    sub_jobs: Vec<Arc<dyn SubJob>>,
}

impl<C: Clock> HeartbeatDispatcher<C> {
    pub fn new(clock: C, data_dir: impl Into<PathBuf>, sub_jobs: Vec<Arc<dyn SubJob>>) -> Self {
        Self {
            clock,
            data_dir: data_dir.into(),
            sub_jobs,
        }
    }

    fn status_path(&self, user_id: &str) -> PathBuf {
        xbot_state::user_path(&self.data_dir, user_id, &["STATUS.json"])
    }

    fn heartbeat_log_path(&self, user_id: &str) -> PathBuf {
        xbot_state::user_path(&self.data_dir, user_id, &["HEARTBEAT.md"])
    }

    fn load_status(&self, user_id: &str) -> Option<HeartbeatStatus> {
        let path = self.status_path(user_id);
        if !path.exists() {
            return None;
        }
        match xbot_state::read_state(&path) {
            Ok(payload) => serde_json::from_value(payload.data).ok(),
            Err(err) => {
                tracing::warn!(user_id, error = %err, "unreadable heartbeat status, skipping tick");
                None
            }
        }
    }

    fn save_status(&self, status: &HeartbeatStatus) -> Result<(), EngineError> {
        let path = self.status_path(&status.user_id);
        let value = serde_json::to_value(status).unwrap_or_default();
        xbot_state::write_state(&path, &value)?;
        Ok(())
    }

    /// Every enabled user directory under `data_dir/users/` whose
    /// `STATUS.json` parses and is due, unpaused, and within active hours.
    pub fn due_users(&self) -> Vec<String> {
        let now = self.clock.epoch_ms();
        let users_dir = self.data_dir.join("users");
        let Ok(entries) = std::fs::read_dir(&users_dir) else {
            return Vec::new();
        };
        let mut due = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            if !entry.path().is_dir() {
                continue;
            }
            let Some(user_id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(status) = self.load_status(&user_id) else {
                continue;
            };
            if status.is_paused(now) {
                continue;
            }
            if !status.active_hours.contains(HeartbeatStatus::hour_of(now)) {
                continue;
            }
            if status.is_due(now) {
                due.push(user_id);
            }
        }
        due.sort();
        due
    }

    /// Run every sub-job for `user_id`, submit the outcome as a task, log
    /// to `HEARTBEAT.md`, and rewrite `STATUS.json` with the new pulse.
    pub async fn run_for_user<I: IdGen>(
        &self,
        user_id: &str,
        inbox: &Inbox<C, I>,
    ) -> Result<(), EngineError> {
        let now = self.clock.epoch_ms();
        let mut status = self
            .load_status(user_id)
            .unwrap_or_else(|| HeartbeatStatus::new(user_id, 300, now));

        let mut changed_any = false;
        let mut summaries = Vec::new();
        for job in &self.sub_jobs {
            let result = job.run(user_id, &self.data_dir).await;
            if result.changed {
                changed_any = true;
                if let Some(summary) = result.summary {
                    summaries.push(format!("{}: {summary}", job.name()));
                }
            }
        }

        let grade = if !changed_any {
            HeartbeatGrade::Ok
        } else if summaries.len() == 1 {
            HeartbeatGrade::Notice
        } else {
            HeartbeatGrade::Action
        };

        let final_output = if grade == HeartbeatGrade::Ok {
            HEARTBEAT_OK_SENTINEL.to_string()
        } else {
            summaries.join("\n")
        };

        let mut payload = HashMap::new();
        payload.insert("grade".to_string(), serde_json::json!(grade.to_string()));
        let envelope = inbox
            .submit(TaskConfig {
                source: TaskSource::Heartbeat,
                goal: "run heartbeat sub-jobs".to_string(),
                user_id: user_id.to_string(),
                platform: "heartbeat".to_string(),
                payload,
                priority: Priority::Normal,
                requires_reply: grade.requires_reply(),
            })
            .await?;

        self.append_log(user_id, now, grade, &final_output)?;

        status.last_pulse_ms = now;
        status.next_due_ms = now + status.every_seconds.saturating_mul(1000);
        status.active_task_id = Some(envelope.task_id.to_string());
        self.save_status(&status)?;

        Ok(())
    }

    fn append_log(
        &self,
        user_id: &str,
        now_ms: u64,
        grade: HeartbeatGrade,
        summary: &str,
    ) -> Result<(), EngineError> {
        use std::io::Write;
        let path = self.heartbeat_log_path(user_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| xbot_state::StateError::io(parent, e))?;
        }
        let timestamp = chrono::DateTime::<Utc>::from_timestamp((now_ms / 1000) as i64, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();
        let one_line = summary.lines().next().unwrap_or("");
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| xbot_state::StateError::io(&path, e))?;
        writeln!(file, "{timestamp} {grade} {one_line}")
            .map_err(|e| xbot_state::StateError::io(&path, e))?;
        Ok(())
    }

    /// Run a full tick: every due user, in order.
    pub async fn tick<I: IdGen>(&self, inbox: &Inbox<C, I>) -> Result<usize, EngineError> {
        let due = self.due_users();
        for user_id in &due {
            self.run_for_user(user_id, inbox).await?;
        }
        Ok(due.len())
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
