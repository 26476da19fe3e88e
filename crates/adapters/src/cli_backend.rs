// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic external-CLI worker backend: the shared contract both `codex`
//! and `gemini-cli` satisfy (consume an instruction on stdin or as an
//! argument, emit progress on stdout, exit 0/non-zero for done/failed).
//! Distinct backend *kinds* differ only in which binary and argv shape they
//! use, captured by [`CliFlavor`].

use crate::subprocess::{run_with_timeout, WORKER_TASK_TIMEOUT};
use crate::worker_backend::{
    WorkerBackend, WorkerBackendError, WorkerHandle, WorkerOutcome, WorkerSpawnConfig,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::{Child, Command};

/// Which external CLI this backend instance drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliFlavor {
    Codex,
    GeminiCli,
}

impl CliFlavor {
    fn program(&self) -> &'static str {
        match self {
            CliFlavor::Codex => "codex",
            CliFlavor::GeminiCli => "gemini-cli",
        }
    }
}

/// Worker backend that shells out to an external agent CLI per dispatch.
///
/// `poll` is a bounded wait on the spawned child, matching the teacher's
/// `run_with_timeout` discipline rather than a true non-blocking pump —
/// the daemon calls `poll` on its own tick cadence, so this backend just
/// needs to report "still running" promptly and the final outcome once
/// the child exits.
pub struct CliWorkerBackend {
    flavor: CliFlavor,
    run_counter: AtomicU64,
    children: Mutex<HashMap<String, Arc<Mutex<Option<Child>>>>>,
}

impl CliWorkerBackend {
    pub fn new(flavor: CliFlavor) -> Self {
        Self {
            flavor,
            run_counter: AtomicU64::new(0),
            children: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl WorkerBackend for CliWorkerBackend {
    async fn spawn(&self, config: WorkerSpawnConfig) -> Result<WorkerHandle, WorkerBackendError> {
        let mut cmd = Command::new(self.flavor.program());
        cmd.arg(&config.instruction)
            .current_dir(&config.workspace_path)
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| WorkerBackendError::SpawnFailed(e.to_string()))?;

        let run_id = format!(
            "{}-{}",
            self.flavor.program(),
            self.run_counter.fetch_add(1, Ordering::SeqCst)
        );
        self.children
            .lock()
            .insert(run_id.clone(), Arc::new(Mutex::new(Some(child))));

        Ok(WorkerHandle {
            worker_id: config.worker_id,
            run_id,
        })
    }

    async fn send(&self, _handle: &WorkerHandle, _input: &str) -> Result<(), WorkerBackendError> {
        // External CLI backends run to completion from one instruction;
        // mid-run input has no analog here.
        Ok(())
    }

    async fn poll(&self, handle: &WorkerHandle) -> Result<Option<WorkerOutcome>, WorkerBackendError> {
        let slot = self
            .children
            .lock()
            .get(&handle.run_id)
            .cloned()
            .ok_or_else(|| WorkerBackendError::NotFound(handle.worker_id.clone()))?;

        let mut guard = slot.lock();
        let child = match guard.as_mut() {
            Some(c) => c,
            None => return Ok(None),
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                *guard = None;
                self.children.lock().remove(&handle.run_id);
                if status.success() {
                    Ok(Some(WorkerOutcome::Done {
                        summary: format!("{} exited successfully", self.flavor.program()),
                    }))
                } else {
                    Ok(Some(WorkerOutcome::Failed {
                        error: format!("{} exited with {status}", self.flavor.program()),
                    }))
                }
            }
            Ok(None) => Ok(None),
            Err(e) => Err(WorkerBackendError::SendFailed(e.to_string())),
        }
    }

    async fn kill(&self, handle: &WorkerHandle) -> Result<(), WorkerBackendError> {
        let slot = self.children.lock().remove(&handle.run_id);
        if let Some(slot) = slot {
            if let Some(mut child) = slot.lock().take() {
                child
                    .kill()
                    .await
                    .map_err(|e| WorkerBackendError::KillFailed(e.to_string()))?;
            }
        }
        Ok(())
    }
}

/// Run an external CLI to completion and collect its full output, used by
/// the `core-agent` nested-loop path when it needs a one-shot external call
/// rather than the tracked spawn/poll/kill lifecycle above.
pub async fn run_cli_to_completion(
    flavor: CliFlavor,
    instruction: &str,
    workspace: &std::path::Path,
) -> Result<String, String> {
    let mut cmd = Command::new(flavor.program());
    cmd.arg(instruction).current_dir(workspace);
    let output = run_with_timeout(cmd, WORKER_TASK_TIMEOUT, flavor.program()).await?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[allow(dead_code)]
fn _default_timeout() -> Duration {
    WORKER_TASK_TIMEOUT
}

#[cfg(test)]
#[path = "cli_backend_tests.rs"]
mod tests;
