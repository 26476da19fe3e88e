// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence of `TaskEnvelope`s through the canonical state protocol.
//! Every mutation the [`crate::Inbox`] makes is written here before the
//! in-memory lock is released.

use crate::error::InboxError;
use crate::paths::{task_path, tasks_dir};
use std::path::Path;
use xbot_core::TaskEnvelope;

#[allow(clippy::expect_used)]
pub fn persist_task(data_dir: &Path, envelope: &TaskEnvelope) -> Result<(), InboxError> {
    let path = task_path(data_dir, &envelope.task_id);
    let value = serde_json::to_value(envelope)
        .expect("TaskEnvelope always serializes: no non-finite floats or non-string map keys");
    xbot_state::write_state(&path, &value)?;
    Ok(())
}

pub fn read_task(data_dir: &Path, task_id: &xbot_core::TaskId) -> Result<TaskEnvelope, InboxError> {
    let path = task_path(data_dir, task_id);
    let payload = xbot_state::read_state(&path)?;
    serde_json::from_value(payload.data).map_err(|e| {
        InboxError::State(xbot_state::StateError::Parse(xbot_state::ParseError {
            path,
            reason: e.to_string(),
        }))
    })
}

/// Every task id with a persisted envelope file, for startup rehydration.
pub fn list_task_ids(data_dir: &Path) -> Vec<xbot_core::TaskId> {
    let dir = tasks_dir(data_dir);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".md").map(|id| xbot_core::TaskId::new(id))
        })
        .collect()
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
