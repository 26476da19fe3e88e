// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic fakes for `UnifiedContext` and `WorkerBackend`, gated
//! behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::context::{AdapterError, UiPrimitive, UnifiedChat, UnifiedContext};
use crate::worker_backend::{
    WorkerBackend, WorkerBackendError, WorkerHandle, WorkerOutcome, WorkerSpawnConfig,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One recorded call to `FakeUnifiedContext`.
#[derive(Debug, Clone)]
pub enum ContextCall {
    Reply { chat_id: String, text: String },
    EditMessage { chat_id: String, message_id: String, text: String },
    ReplyPhoto { chat_id: String, path: PathBuf },
    AnswerCallback { callback_id: String },
}

#[derive(Clone, Default)]
pub struct FakeUnifiedContext {
    inner: Arc<Mutex<Vec<ContextCall>>>,
}

impl FakeUnifiedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ContextCall> {
        self.inner.lock().clone()
    }

    pub fn last_reply_text(&self) -> Option<String> {
        self.inner.lock().iter().rev().find_map(|c| match c {
            ContextCall::Reply { text, .. } => Some(text.clone()),
            _ => None,
        })
    }
}

#[async_trait]
impl UnifiedContext for FakeUnifiedContext {
    async fn reply(
        &self,
        chat: &UnifiedChat,
        text: &str,
        _ui: Option<UiPrimitive>,
    ) -> Result<String, AdapterError> {
        let message_id = format!("fake-msg-{}", self.inner.lock().len());
        self.inner.lock().push(ContextCall::Reply {
            chat_id: chat.id.clone(),
            text: text.to_string(),
        });
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        chat: &UnifiedChat,
        message_id: &str,
        text: &str,
        _ui: Option<UiPrimitive>,
    ) -> Result<(), AdapterError> {
        self.inner.lock().push(ContextCall::EditMessage {
            chat_id: chat.id.clone(),
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_photo(
        &self,
        chat: &UnifiedChat,
        path: &Path,
        _caption: Option<&str>,
    ) -> Result<String, AdapterError> {
        let message_id = format!("fake-photo-{}", self.inner.lock().len());
        self.inner.lock().push(ContextCall::ReplyPhoto {
            chat_id: chat.id.clone(),
            path: path.to_path_buf(),
        });
        Ok(message_id)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), AdapterError> {
        self.inner.lock().push(ContextCall::AnswerCallback {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }
}

/// A scripted outcome `FakeWorkerBackend` returns the first time `poll` is
/// called for a given run; before that it reports still-in-flight.
#[derive(Clone)]
pub struct FakeWorkerBackend {
    inner: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    spawned: Vec<WorkerSpawnConfig>,
    sent: Vec<(WorkerHandle, String)>,
    killed: Vec<WorkerHandle>,
    next_outcome: HashMap<String, WorkerOutcome>,
    poll_count: HashMap<String, u32>,
    spawn_error: Option<String>,
}

impl Default for FakeWorkerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWorkerBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    pub fn spawned_configs(&self) -> Vec<WorkerSpawnConfig> {
        self.inner.lock().spawned.clone()
    }

    pub fn set_spawn_error(&self, message: impl Into<String>) {
        self.inner.lock().spawn_error = Some(message.into());
    }

    /// Make the next `poll` for `run_id` return `outcome` immediately.
    pub fn set_outcome(&self, run_id: impl Into<String>, outcome: WorkerOutcome) {
        self.inner.lock().next_outcome.insert(run_id.into(), outcome);
    }
}

#[async_trait]
impl WorkerBackend for FakeWorkerBackend {
    async fn spawn(&self, config: WorkerSpawnConfig) -> Result<WorkerHandle, WorkerBackendError> {
        let mut inner = self.inner.lock();
        if let Some(msg) = inner.spawn_error.take() {
            return Err(WorkerBackendError::SpawnFailed(msg));
        }
        let run_id = format!("run-{}", inner.spawned.len());
        let handle = WorkerHandle {
            worker_id: config.worker_id.clone(),
            run_id,
        };
        inner.spawned.push(config);
        Ok(handle)
    }

    async fn send(&self, handle: &WorkerHandle, input: &str) -> Result<(), WorkerBackendError> {
        self.inner
            .lock()
            .sent
            .push((handle.clone(), input.to_string()));
        Ok(())
    }

    async fn poll(&self, handle: &WorkerHandle) -> Result<Option<WorkerOutcome>, WorkerBackendError> {
        let mut inner = self.inner.lock();
        let count = inner.poll_count.entry(handle.run_id.clone()).or_insert(0);
        *count += 1;
        Ok(inner.next_outcome.remove(&handle.run_id))
    }

    async fn kill(&self, handle: &WorkerHandle) -> Result<(), WorkerBackendError> {
        self.inner.lock().killed.push(handle.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
