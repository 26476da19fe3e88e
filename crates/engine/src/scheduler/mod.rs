// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler (§4.8, §4.8a): hot-reloadable cron-style triggers feeding the
//! Task Inbox. A 30-second tick reconciles each user's live schedule
//! against `data/users/<uid>/automation/scheduled_tasks.md` (detected by
//! mtime) and submits `source=cron` tasks for entries whose `next_run` has
//! passed.

mod cron;

pub use cron::{parse_cron, CronError, CronSchedule};

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use parking_lot::Mutex;
use xbot_core::{Clock, IdGen, Priority, ScheduledTaskEntry, ScheduledTasksDoc, TaskConfig, TaskSource};
use xbot_inbox::Inbox;

use crate::EngineError;

/// Per-user cache of the schedule file's last-observed mtime, so an
/// unchanged file is skipped on most ticks instead of re-parsed every 30s.
#[derive(Default)]
struct ScanCache {
    mtimes: HashMap<String, u64>,
}

pub struct Scheduler<C: Clock> {
    clock: C,
    data_dir: PathBuf,
    cache: Mutex<ScanCache>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            clock,
            data_dir: data_dir.into(),
            cache: Mutex::new(ScanCache::default()),
        }
    }

    fn schedule_path(&self, user_id: &str) -> PathBuf {
        xbot_state::user_path(&self.data_dir, user_id, &["automation", "scheduled_tasks.md"])
    }

    /// Every user directory under `data_dir/users/`.
    pub fn list_user_ids(&self) -> Vec<String> {
        let users_dir = self.data_dir.join("users");
        let Ok(entries) = std::fs::read_dir(&users_dir) else {
            return Vec::new();
        };
        let mut ids: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        ids.sort();
        ids
    }

    /// Reconcile every user's schedule file. Returns the total number of
    /// entries fired across all users.
    pub async fn reconcile<I: IdGen>(&self, inbox: &Inbox<C, I>) -> Result<usize, EngineError> {
        let mut fired = 0;
        for user_id in self.list_user_ids() {
            fired += self.reconcile_user(&user_id, inbox).await?;
        }
        Ok(fired)
    }

    /// Reconcile one user's schedule file, firing any entry whose
    /// `next_run` has passed and persisting the recomputed `next_run`
    /// immediately so a restart mid-tick can't double-fire the same
    /// minute.
    pub async fn reconcile_user<I: IdGen>(
        &self,
        user_id: &str,
        inbox: &Inbox<C, I>,
    ) -> Result<usize, EngineError> {
        let path = self.schedule_path(user_id);
        let Ok(metadata) = std::fs::metadata(&path) else {
            return Ok(0);
        };
        let mtime_ms = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        {
            let mut cache = self.cache.lock();
            let unchanged = cache.mtimes.get(user_id) == Some(&mtime_ms);
            if unchanged {
                return Ok(0);
            }
            cache.mtimes.insert(user_id.to_string(), mtime_ms);
        }

        let payload = xbot_state::read_state(&path)?;
        let mut doc: ScheduledTasksDoc = serde_json::from_value(payload.data).unwrap_or_default();

        let now_ms = self.clock.epoch_ms();
        let now = DateTime::<Utc>::from_timestamp((now_ms / 1000) as i64, 0).unwrap_or_default();
        let mut fired = 0;
        let mut dirty = false;

        for entry in &mut doc.tasks {
            if !entry.enabled {
                continue;
            }
            let schedule = match parse_cron(&entry.crontab) {
                Ok(s) => s,
                Err(err) => {
                    tracing::warn!(user_id, task_id = %entry.id, error = %err, "malformed crontab, skipping entry");
                    continue;
                }
            };

            let due = entry.next_run.map(|n| now_ms >= n).unwrap_or_else(|| schedule.is_due(&now));
            if !due {
                if entry.next_run.is_none() {
                    entry.next_run = schedule.next_run_after(&now).map(|dt| dt.timestamp_millis() as u64);
                    dirty = true;
                }
                continue;
            }

            inbox
                .submit(TaskConfig {
                    source: TaskSource::Cron,
                    goal: entry.instruction.clone(),
                    user_id: user_id.to_string(),
                    platform: "cron".to_string(),
                    payload: HashMap::new(),
                    priority: Priority::Low,
                    requires_reply: false,
                })
                .await?;

            entry.last_run = Some(now_ms);
            entry.next_run = schedule.next_run_after(&now).map(|dt| dt.timestamp_millis() as u64);
            fired += 1;
            dirty = true;
        }

        if dirty {
            let value = serde_json::to_value(&doc).unwrap_or_default();
            xbot_state::write_state(&path, &value)?;
        }

        Ok(fired)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
