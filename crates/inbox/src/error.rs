// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use xbot_core::TaskId;
use xbot_state::StateError;

/// Failure modes raised by the Task Inbox.
#[derive(Debug, Error)]
pub enum InboxError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidTransition {
        task_id: TaskId,
        from: String,
        to: String,
    },
    #[error("worker already assigned to task {0}")]
    AlreadyAssigned(TaskId),
    #[error(transparent)]
    State(#[from] StateError),
}
