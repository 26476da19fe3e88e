// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete [`SubJob`] implementations the Heartbeat Worker runs per tick
//! (§4.7: "RSS check, watchlist refresh, reminder sweep, memory
//! compaction"). Reminder sweeping is fully owned here, since it is only a
//! state-file scan against `automation/reminders.md` — the same kind of
//! thing the Scheduler already does against `scheduled_tasks.md`. RSS
//! fetching, watchlist pricing, and memory-graph consolidation all require
//! an external collaborator (network fetch, a quote provider, the MCP
//! memory service) that §1 places out of this core's scope, so those three
//! report "no change" rather than fabricate business logic that belongs to
//! a skill or adapter.

use async_trait::async_trait;
use std::path::Path;
use xbot_core::RemindersDoc;

use super::{SubJob, SubJobResult};

fn reminders_path(data_dir: &Path, user_id: &str) -> std::path::PathBuf {
    xbot_state::user_path(data_dir, user_id, &["automation", "reminders.md"])
}

/// Scans `automation/reminders.md` for entries whose `due_at_ms` has
/// passed and haven't fired yet, marks them fired, and reports the fired
/// reminders' text as the sub-job's summary.
pub struct ReminderSweepSubJob<C: xbot_core::Clock> {
    clock: C,
}

impl<C: xbot_core::Clock> ReminderSweepSubJob<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl<C: xbot_core::Clock> SubJob for ReminderSweepSubJob<C> {
    fn name(&self) -> &str {
        "reminders"
    }

    async fn run(&self, user_id: &str, data_dir: &Path) -> SubJobResult {
        let path = reminders_path(data_dir, user_id);
        if !path.exists() {
            return SubJobResult::default();
        }

        let payload = match xbot_state::read_state(&path) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(user_id, error = %err, "unreadable reminders doc, skipping sweep");
                return SubJobResult::default();
            }
        };
        let mut doc: RemindersDoc = serde_json::from_value(payload.data).unwrap_or_default();

        let now_ms = self.clock.epoch_ms();
        let mut fired_texts = Vec::new();
        let mut dirty = false;
        for reminder in &mut doc.reminders {
            if !reminder.fired && now_ms >= reminder.due_at_ms {
                reminder.fired = true;
                fired_texts.push(reminder.text.clone());
                dirty = true;
            }
        }

        if !dirty {
            return SubJobResult::default();
        }

        let value = serde_json::to_value(&doc).unwrap_or_default();
        if let Err(err) = xbot_state::write_state(&path, &value) {
            tracing::warn!(user_id, error = %err, "failed to persist fired reminders");
            return SubJobResult::default();
        }

        SubJobResult {
            changed: true,
            summary: Some(fired_texts.join("; ")),
        }
    }
}

/// Placeholder for the RSS-subscription check: fetching feed content is an
/// external network call, out of this core's scope per §1. The seam is
/// kept as a `SubJob` so a real adapter-backed implementation drops in
/// without touching the dispatcher.
pub struct RssCheckSubJob;

#[async_trait]
impl SubJob for RssCheckSubJob {
    fn name(&self) -> &str {
        "rss"
    }
    async fn run(&self, _user_id: &str, _data_dir: &Path) -> SubJobResult {
        SubJobResult::default()
    }
}

/// Placeholder for the stock-watchlist refresh: quote lookups are an
/// external collaborator, out of this core's scope per §1.
pub struct WatchlistRefreshSubJob;

#[async_trait]
impl SubJob for WatchlistRefreshSubJob {
    fn name(&self) -> &str {
        "watchlist"
    }
    async fn run(&self, _user_id: &str, _data_dir: &Path) -> SubJobResult {
        SubJobResult::default()
    }
}

/// Placeholder for memory-graph consolidation: it talks to the MCP memory
/// service, an external collaborator out of this core's scope per §1 (see
/// the Open Question on synchronous-vs-deferred consolidation in
/// DESIGN.md).
pub struct MemoryCompactionSubJob;

#[async_trait]
impl SubJob for MemoryCompactionSubJob {
    fn name(&self) -> &str {
        "memory_compaction"
    }
    async fn run(&self, _user_id: &str, _data_dir: &Path) -> SubJobResult {
        SubJobResult::default()
    }
}

#[cfg(test)]
#[path = "sub_jobs_tests.rs"]
mod tests;
