// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ReminderEntry`: one row of a user's `automation/reminders.md` (§3).
//! The heartbeat's reminder-sweep sub-job is the only thing that evaluates
//! due-ness or mutates `fired`; this crate only holds the shape every other
//! crate agrees on, mirroring [`crate::schedule::ScheduledTaskEntry`].

use serde::{Deserialize, Serialize};

/// One reminder a user has set, fired at most once at or after `due_at_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderEntry {
    pub id: String,
    pub text: String,
    pub due_at_ms: u64,
    #[serde(default)]
    pub fired: bool,
}

/// The whole-document shape of `automation/reminders.md`'s YAML payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemindersDoc {
    #[serde(default)]
    pub reminders: Vec<ReminderEntry>,
}

#[cfg(test)]
#[path = "reminder_tests.rs"]
mod tests;
