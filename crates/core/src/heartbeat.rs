// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-user Heartbeat Worker state (§3 `HeartbeatState`, §4.7): the pulse
//! schedule, suppression policy, and grade vocabulary a heartbeat tick is
//! evaluated against. `STATUS.json` is a canonical state file despite its
//! extension — see `xbot-engine`'s heartbeat dispatcher, which is the only
//! thing that reads or writes it.

use serde::{Deserialize, Serialize};

/// How loud a heartbeat tick's result is, chosen by the Manager from
/// sub-job outcomes (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartbeatGrade {
    /// Nothing changed; the adapter suppresses delivery entirely.
    Ok,
    /// A single line is worth surfacing.
    Notice,
    /// Full message with items, always delivered.
    Action,
}

impl HeartbeatGrade {
    pub fn requires_reply(&self) -> bool {
        !matches!(self, HeartbeatGrade::Ok)
    }
}

impl std::fmt::Display for HeartbeatGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HeartbeatGrade::Ok => "OK",
            HeartbeatGrade::Notice => "NOTICE",
            HeartbeatGrade::Action => "ACTION",
        };
        write!(f, "{s}")
    }
}

/// Sentinel `final_output` a heartbeat task completes with when every
/// sub-job reported no change; the adapter checks for this exact string to
/// decide whether to suppress delivery (§4.7).
pub const HEARTBEAT_OK_SENTINEL: &str = "HEARTBEAT_OK";

/// `[start_hour, end_hour)` in the user's configured local hour-of-day,
/// wrapping past midnight when `start_hour > end_hour` (e.g. `22..6`
/// covers 22:00 through 05:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveHours {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl Default for ActiveHours {
    fn default() -> Self {
        // Always active unless a user narrows it.
        Self {
            start_hour: 0,
            end_hour: 24,
        }
    }
}

impl ActiveHours {
    pub fn contains(&self, hour: u8) -> bool {
        if self.start_hour == self.end_hour {
            return true; // degenerate window means "always"
        }
        if self.start_hour < self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// The `STATUS.json` record (§3, §4.7a): lock+pulse timestamps, the
/// suppression window, and which task (if any) the heartbeat is currently
/// running as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatStatus {
    pub user_id: String,
    pub every_seconds: u64,
    #[serde(default)]
    pub active_hours: ActiveHours,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_until_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_task_id: Option<String>,
    #[serde(default)]
    pub last_pulse_ms: u64,
    #[serde(default)]
    pub next_due_ms: u64,
}

impl HeartbeatStatus {
    pub fn new(user_id: impl Into<String>, every_seconds: u64, now_ms: u64) -> Self {
        Self {
            user_id: user_id.into(),
            every_seconds,
            active_hours: ActiveHours::default(),
            paused_until_ms: None,
            active_task_id: None,
            last_pulse_ms: 0,
            next_due_ms: now_ms,
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.next_due_ms
    }

    pub fn is_paused(&self, now_ms: u64) -> bool {
        self.paused_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Hour-of-day derived from an epoch-ms timestamp in UTC, the
    /// dispatcher's due-ness check against `active_hours`.
    pub fn hour_of(epoch_ms: u64) -> u8 {
        ((epoch_ms / 1000 / 3600) % 24) as u8
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
