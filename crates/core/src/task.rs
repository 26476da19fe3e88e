// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TaskEnvelope`: the unit of scheduling that flows through the Task Inbox.
//!
//! Every request the core handles — a chat message, a cron firing, a
//! heartbeat tick — is normalized into one of these before anything else
//! happens. Status transitions are monotonic along
//! `pending -> running -> (completed|failed|cancelled)`; see
//! [`TaskStatus::can_transition_to`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::worker::WorkerId;

crate::define_id! {
    /// Unique identifier for a task envelope.
    pub struct TaskId;
}

/// Where a task originated. Drives queue ordering (heartbeat/cron yield to
/// an active `user_chat` for the same user) and retry/backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    UserChat,
    UserCmd,
    Heartbeat,
    Cron,
    System,
}

impl fmt::Display for TaskSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskSource::UserChat => "user_chat",
            TaskSource::UserCmd => "user_cmd",
            TaskSource::Heartbeat => "heartbeat",
            TaskSource::Cron => "cron",
            TaskSource::System => "system",
        };
        write!(f, "{s}")
    }
}

/// Scheduling priority. `list_pending` orders `high < normal < low`, then
/// `created_at` ascending within a priority band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Normal,
    Low,
}

/// Lifecycle status of a task envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    /// Whether moving from `self` to `next` respects the monotonic
    /// `pending -> running -> (completed|failed|cancelled)` invariant.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        match (self, next) {
            (Pending, Running) => true,
            (Pending, Cancelled) => true,
            (Running, Completed | Failed | Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// One entry of a task's append-only audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    pub ts: u64,
    pub kind: TaskEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskEventKind {
    Submitted,
    StatusChanged { from: TaskStatus, to: TaskStatus },
    WorkerAssigned { worker_id: WorkerId, reason: String },
    ToolCalled { name: String },
    Completed,
    Failed { error_code: String },
    Cancelled,
}

/// The unit of scheduling that flows through the Task Inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub task_id: TaskId,
    pub source: TaskSource,
    pub goal: String,
    #[serde(default)]
    pub payload: HashMap<String, serde_json::Value>,
    pub priority: Priority,
    pub user_id: String,
    pub platform: String,
    pub requires_reply: bool,
    pub created_at: u64,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_worker_id: Option<WorkerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_output: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default)]
    pub events: Vec<TaskEvent>,
}

/// Configuration for creating a new task envelope (mirrors `submit`'s
/// parameter list in the spec).
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub source: TaskSource,
    pub goal: String,
    pub user_id: String,
    pub platform: String,
    pub payload: HashMap<String, serde_json::Value>,
    pub priority: Priority,
    pub requires_reply: bool,
}

impl TaskEnvelope {
    pub fn new(task_id: TaskId, config: TaskConfig, created_at_epoch_ms: u64) -> Self {
        Self {
            task_id,
            source: config.source,
            goal: config.goal,
            payload: config.payload,
            priority: config.priority,
            user_id: config.user_id,
            platform: config.platform,
            requires_reply: config.requires_reply,
            created_at: created_at_epoch_ms,
            status: TaskStatus::Pending,
            assigned_worker_id: None,
            dispatch_reason: None,
            result: None,
            final_output: None,
            retry_count: 0,
            events: vec![TaskEvent {
                ts: created_at_epoch_ms,
                kind: TaskEventKind::Submitted,
                note: None,
            }],
        }
    }

    /// Append an audit event with the given timestamp. Callers pass the
    /// clock reading explicitly so this type stays free of I/O.
    pub fn push_event(&mut self, ts: u64, kind: TaskEventKind) {
        self.events.push(TaskEvent {
            ts,
            kind,
            note: None,
        });
    }

    /// Transition to `next`, recording the event. Returns `false` (and
    /// leaves state untouched) if the transition violates monotonicity —
    /// callers should treat that as a programming error, not a recoverable
    /// one, since only the Inbox mutates status and it always checks first.
    pub fn transition(&mut self, ts: u64, next: TaskStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        let from = self.status;
        self.status = next;
        self.push_event(
            ts,
            TaskEventKind::StatusChanged {
                from,
                to: next,
            },
        );
        true
    }

    pub fn is_same_session(&self, user_id: &str, platform: &str) -> bool {
        self.user_id == user_id && self.platform == platform
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
