// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity and fleet bookkeeping.
//!
//! A `WorkerRecord` is an execution slot: a named identity with its own
//! workspace, SOUL, and (optionally) credentials, capable of running at most
//! one dispatched task at a time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

crate::define_id! {
    /// Unique identifier for a worker instance.
    pub struct WorkerId;
}

/// Which runtime a worker dispatches into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkerBackendKind {
    /// Nested, bounded orchestrator loop with Worker SOUL and a
    /// worker-restricted tool profile.
    CoreAgent,
    /// External `codex` CLI, spawned as a child process.
    Codex,
    /// External `gemini-cli`, spawned as a child process.
    GeminiCli,
    /// Fast path straight through the `bash` primitive.
    Shell,
}

impl std::fmt::Display for WorkerBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkerBackendKind::CoreAgent => "core-agent",
            WorkerBackendKind::Codex => "codex",
            WorkerBackendKind::GeminiCli => "gemini-cli",
            WorkerBackendKind::Shell => "shell",
        };
        write!(f, "{s}")
    }
}

/// Current availability of a worker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Idle,
    Busy,
    Error,
    Offline,
}

impl WorkerStatus {
    /// Whether `dispatch_worker` may currently assign a task to a worker in
    /// this status.
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, WorkerStatus::Idle)
    }
}

/// A named execution slot in the Worker Fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub worker_id: WorkerId,
    pub name: String,
    pub backend: WorkerBackendKind,
    pub status: WorkerStatus,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub workspace_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_ref: Option<String>,
    pub soul_path: PathBuf,
    /// Epoch ms of the last time this worker finished a task; used for
    /// least-recently-used selection among idle workers with overlapping
    /// capabilities (see DESIGN.md for the resolved Open Question).
    #[serde(default)]
    pub last_used_at_ms: u64,
}

impl WorkerRecord {
    pub fn new(
        worker_id: WorkerId,
        name: impl Into<String>,
        backend: WorkerBackendKind,
        workspace_path: PathBuf,
        soul_path: PathBuf,
    ) -> Self {
        Self {
            worker_id,
            name: name.into(),
            backend,
            status: WorkerStatus::Idle,
            capabilities: Vec::new(),
            workspace_path,
            credentials_ref: None,
            soul_path,
            last_used_at_ms: 0,
        }
    }

    /// Whether this worker declares a capability (case-sensitive exact
    /// match on the tag, e.g. `"deploy"`, `"rss"`).
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
