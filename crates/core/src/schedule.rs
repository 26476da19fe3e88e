// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ScheduledTaskEntry`: one row of a user's
//! `automation/scheduled_tasks.md` (§4.8). Cron evaluation itself lives in
//! `xbot-engine`'s scheduler module, which is the only thing that needs to
//! walk the filesystem or do date arithmetic; this crate only holds the
//! entry shape every other crate agrees on.

use serde::{Deserialize, Serialize};

/// One cron-triggered entry a user (or the Manager, editing on their
/// behalf) has configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTaskEntry {
    pub id: String,
    /// Standard 5-field crontab syntax (§4.8a).
    pub crontab: String,
    pub instruction: String,
    #[serde(default = "ScheduledTaskEntry::default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run: Option<u64>,
}

impl ScheduledTaskEntry {
    fn default_enabled() -> bool {
        true
    }
}

/// The whole-document shape of `automation/scheduled_tasks.md`'s YAML
/// payload: a flat list under one key, like every other domain state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledTasksDoc {
    #[serde(default)]
    pub tasks: Vec<ScheduledTaskEntry>,
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
