// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Task Inbox: the only way a new unit of work enters the system.
//!
//! A single [`tokio::sync::Mutex`] guards the in-memory map; every mutation
//! persists the touched envelope through [`crate::store`] before the lock is
//! released, so a crash between "decided" and "persisted" never happens.

use crate::error::InboxError;
use crate::store;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use xbot_core::{
    Clock, IdGen, TaskConfig, TaskEnvelope, TaskEventKind, TaskId, TaskStatus, WorkerId,
};

/// Terminal envelopes older than this are dropped from the in-memory map on
/// a maintenance sweep (the on-disk record is left for `replay-task`).
pub const DEFAULT_RETENTION_MS: u64 = 24 * 60 * 60 * 1000;

struct InboxState {
    tasks: HashMap<TaskId, TaskEnvelope>,
}

/// The single submission point and lifecycle store for every unit of work.
pub struct Inbox<C, I> {
    clock: C,
    id_gen: I,
    data_dir: PathBuf,
    state: Mutex<InboxState>,
}

impl<C: Clock, I: IdGen> Inbox<C, I> {
    /// Construct an empty inbox. Call [`Inbox::hydrate`] afterward to
    /// re-load any envelopes persisted by a previous process.
    pub fn new(data_dir: impl Into<PathBuf>, clock: C, id_gen: I) -> Self {
        Self {
            clock,
            id_gen,
            data_dir: data_dir.into(),
            state: Mutex::new(InboxState {
                tasks: HashMap::new(),
            }),
        }
    }

    /// Re-hydrate every persisted envelope from disk into the in-memory
    /// map. Called once at process start.
    pub async fn hydrate(&self) -> Result<usize, InboxError> {
        let ids = store::list_task_ids(&self.data_dir);
        let mut guard = self.state.lock().await;
        let mut loaded = 0;
        for id in ids {
            match store::read_task(&self.data_dir, &id) {
                Ok(envelope) => {
                    guard.tasks.insert(id, envelope);
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(task_id = %id, error = %e, "failed to rehydrate task envelope");
                }
            }
        }
        tracing::info!(loaded, "inbox rehydrated from disk");
        Ok(loaded)
    }

    pub async fn submit(&self, config: TaskConfig) -> Result<TaskEnvelope, InboxError> {
        let task_id = TaskId::new(self.id_gen.next());
        let envelope = TaskEnvelope::new(task_id, config, self.clock.epoch_ms());
        store::persist_task(&self.data_dir, &envelope)?;
        let mut guard = self.state.lock().await;
        guard.tasks.insert(envelope.task_id.clone(), envelope.clone());
        tracing::info!(
            task_id = %envelope.task_id,
            source = %envelope.source,
            "task submitted"
        );
        Ok(envelope)
    }

    pub async fn get(&self, task_id: &TaskId) -> Option<TaskEnvelope> {
        self.state.lock().await.tasks.get(task_id).cloned()
    }

    /// Transition `task_id` to `next`, persisting the envelope before
    /// releasing the lock. Fails with [`InboxError::InvalidTransition`] if
    /// the move would violate monotonicity.
    pub async fn update_status(
        &self,
        task_id: &TaskId,
        next: TaskStatus,
    ) -> Result<TaskEnvelope, InboxError> {
        let mut guard = self.state.lock().await;
        let envelope = guard
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| InboxError::NotFound(task_id.clone()))?;
        let from = envelope.status;
        let ts = self.clock.epoch_ms();
        if !envelope.transition(ts, next) {
            return Err(InboxError::InvalidTransition {
                task_id: task_id.clone(),
                from: from.to_string(),
                to: next.to_string(),
            });
        }
        let snapshot = envelope.clone();
        store::persist_task(&self.data_dir, &snapshot)?;
        Ok(snapshot)
    }

    pub async fn assign_worker(
        &self,
        task_id: &TaskId,
        worker_id: WorkerId,
        reason: impl Into<String>,
    ) -> Result<TaskEnvelope, InboxError> {
        let mut guard = self.state.lock().await;
        let envelope = guard
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| InboxError::NotFound(task_id.clone()))?;
        if envelope.assigned_worker_id.is_some() {
            return Err(InboxError::AlreadyAssigned(task_id.clone()));
        }
        let reason = reason.into();
        envelope.assigned_worker_id = Some(worker_id.clone());
        envelope.dispatch_reason = Some(reason.clone());
        let ts = self.clock.epoch_ms();
        envelope.push_event(ts, TaskEventKind::WorkerAssigned { worker_id, reason });
        let snapshot = envelope.clone();
        store::persist_task(&self.data_dir, &snapshot)?;
        Ok(snapshot)
    }

    pub async fn complete(
        &self,
        task_id: &TaskId,
        result: Option<serde_json::Value>,
        final_output: impl Into<String>,
    ) -> Result<TaskEnvelope, InboxError> {
        let mut guard = self.state.lock().await;
        let envelope = guard
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| InboxError::NotFound(task_id.clone()))?;
        let from = envelope.status;
        let ts = self.clock.epoch_ms();
        if !envelope.transition(ts, TaskStatus::Completed) {
            return Err(InboxError::InvalidTransition {
                task_id: task_id.clone(),
                from: from.to_string(),
                to: TaskStatus::Completed.to_string(),
            });
        }
        envelope.result = result;
        envelope.final_output = Some(final_output.into());
        envelope.push_event(ts, TaskEventKind::Completed);
        let snapshot = envelope.clone();
        store::persist_task(&self.data_dir, &snapshot)?;
        tracing::info!(task_id = %task_id, "task completed");
        Ok(snapshot)
    }

    pub async fn fail(
        &self,
        task_id: &TaskId,
        error_code: impl Into<String>,
    ) -> Result<TaskEnvelope, InboxError> {
        let mut guard = self.state.lock().await;
        let envelope = guard
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| InboxError::NotFound(task_id.clone()))?;
        let from = envelope.status;
        let ts = self.clock.epoch_ms();
        if !envelope.transition(ts, TaskStatus::Failed) {
            return Err(InboxError::InvalidTransition {
                task_id: task_id.clone(),
                from: from.to_string(),
                to: TaskStatus::Failed.to_string(),
            });
        }
        let error_code = error_code.into();
        envelope.retry_count += 1;
        envelope.push_event(ts, TaskEventKind::Failed { error_code });
        let snapshot = envelope.clone();
        store::persist_task(&self.data_dir, &snapshot)?;
        tracing::warn!(task_id = %task_id, "task failed");
        Ok(snapshot)
    }

    pub async fn cancel(&self, task_id: &TaskId) -> Result<TaskEnvelope, InboxError> {
        let mut guard = self.state.lock().await;
        let envelope = guard
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| InboxError::NotFound(task_id.clone()))?;
        let from = envelope.status;
        let ts = self.clock.epoch_ms();
        if !envelope.transition(ts, TaskStatus::Cancelled) {
            return Err(InboxError::InvalidTransition {
                task_id: task_id.clone(),
                from: from.to_string(),
                to: TaskStatus::Cancelled.to_string(),
            });
        }
        envelope.push_event(ts, TaskEventKind::Cancelled);
        let snapshot = envelope.clone();
        store::persist_task(&self.data_dir, &snapshot)?;
        Ok(snapshot)
    }

    /// Pending envelopes ordered `high < normal < low`, then `created_at`
    /// ascending within a priority band, capped at `limit`.
    pub async fn list_pending(&self, limit: usize) -> Vec<TaskEnvelope> {
        let guard = self.state.lock().await;
        let mut pending: Vec<TaskEnvelope> = guard
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.created_at.cmp(&b.created_at))
        });
        pending.truncate(limit);
        pending
    }

    /// Every envelope currently in memory, most recently created first —
    /// used by the `list-tasks` CLI operation, not the hot dispatch path.
    pub async fn list_all(&self) -> Vec<TaskEnvelope> {
        let guard = self.state.lock().await;
        let mut all: Vec<TaskEnvelope> = guard.tasks.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Whether a `user_chat` task is currently active (pending or running)
    /// for `(user_id, platform)` — heartbeat/cron submissions for the same
    /// user yield to it per the ordering guarantees in §5.
    pub async fn has_active_user_chat(&self, user_id: &str, platform: &str) -> bool {
        let guard = self.state.lock().await;
        guard.tasks.values().any(|t| {
            t.is_same_session(user_id, platform)
                && matches!(t.source, xbot_core::TaskSource::UserChat)
                && !t.status.is_terminal()
        })
    }

    /// Drop terminal envelopes older than `retention_ms` from the in-memory
    /// map. The persisted file is untouched — `replay-task` still works.
    pub async fn sweep_terminal(&self, retention_ms: u64) -> usize {
        let now = self.clock.epoch_ms();
        let mut guard = self.state.lock().await;
        let before = guard.tasks.len();
        guard.tasks.retain(|_, t| {
            if !t.status.is_terminal() {
                return true;
            }
            let age = now.saturating_sub(t.created_at);
            age < retention_ms
        });
        before - guard.tasks.len()
    }
}

pub type SharedInbox<C, I> = Arc<Inbox<C, I>>;

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
