// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WorkerBackend`: the one trait all four worker runtimes (`core-agent`,
//! `codex`, `gemini-cli`, `shell`) implement, so dispatch, the progress
//! relay, and completion bookkeeping never branch on backend kind.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use xbot_core::WorkerId;

#[derive(Debug, Error)]
pub enum WorkerBackendError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("backend timed out after {0}s")]
    Timeout(u64),
    #[error("kill failed: {0}")]
    KillFailed(String),
    #[error("backend not found for worker {0}")]
    NotFound(WorkerId),
}

/// Everything a backend needs to start running an instruction.
#[derive(Debug, Clone)]
pub struct WorkerSpawnConfig {
    pub worker_id: WorkerId,
    pub task_id: String,
    pub instruction: String,
    pub workspace_path: PathBuf,
    pub soul_path: PathBuf,
    pub metadata: HashMap<String, serde_json::Value>,
    pub timeout_secs: u64,
}

/// Handle returned by `spawn`, used to address subsequent `send`/`poll`/`kill`
/// calls at the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerHandle {
    pub worker_id: WorkerId,
    pub run_id: String,
}

/// One intermediate progress update, emitted at >=10s cadence while a
/// backend run is in flight.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub run_id: String,
    pub message: String,
}

/// Terminal result of a backend run.
#[derive(Debug, Clone)]
pub enum WorkerOutcome {
    Done { summary: String },
    Failed { error: String },
}

/// The backend abstraction dispatched sub-tasks run under.
#[async_trait]
pub trait WorkerBackend: Send + Sync {
    /// Start running `config.instruction`. Returns immediately with a
    /// handle; the caller polls for progress and completion.
    async fn spawn(&self, config: WorkerSpawnConfig) -> Result<WorkerHandle, WorkerBackendError>;

    /// Send additional input to an in-flight run (used by `core-agent`
    /// backends mid-conversation; external CLI and `shell` backends treat
    /// this as a no-op since they run to completion from one instruction).
    async fn send(&self, handle: &WorkerHandle, input: &str) -> Result<(), WorkerBackendError>;

    /// Non-blocking poll for the next progress event or terminal outcome.
    /// Returns `Ok(None)` if the run is still in flight with nothing new to
    /// report.
    async fn poll(&self, handle: &WorkerHandle) -> Result<Option<WorkerOutcome>, WorkerBackendError>;

    /// Forcibly terminate an in-flight run (cancellation or timeout).
    async fn kill(&self, handle: &WorkerHandle) -> Result<(), WorkerBackendError>;
}

#[cfg(test)]
#[path = "worker_backend_tests.rs"]
mod tests;
