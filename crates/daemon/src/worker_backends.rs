// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two `WorkerBackend` kinds the daemon, rather than `xbot-adapters`,
//! owns: `shell` (a direct `bash` fast path) and `core-agent` (a nested
//! Orchestrator run). `codex`/`gemini-cli` are [`xbot_adapters::CliWorkerBackend`]
//! instances instead — those just shell out to an external binary, which
//! is generic enough to live in the adapters crate; these two need the
//! primitive runtime and the orchestrator itself, which only the daemon
//! has assembled.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use xbot_adapters::{WorkerBackend, WorkerBackendError, WorkerHandle, WorkerOutcome, WorkerSpawnConfig};
use xbot_core::CallerProfile;
use xbot_engine::llm::{ChatMessage, LlmClient};
use xbot_engine::orchestrator::{Orchestrator, ToolDispatcher, TurnLoopOutcome};
use xbot_engine::primitives::PrimitiveContext;

use crate::soul::load_worker_soul;

/// Routes an instruction straight through the `bash` primitive, under the
/// worker's own workspace and allow-list, for workers configured with
/// `shell` as their default backend (§4.6 step 3: "selection is explicit,
/// not inferred").
#[derive(Default)]
pub struct ShellBackend {
    run_counter: AtomicU64,
    outcomes: Mutex<HashMap<String, WorkerOutcome>>,
}

impl ShellBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkerBackend for ShellBackend {
    async fn spawn(&self, config: WorkerSpawnConfig) -> Result<WorkerHandle, WorkerBackendError> {
        let run_id = format!("shell-{}", self.run_counter.fetch_add(1, Ordering::SeqCst));
        let ctx = PrimitiveContext::worker(config.workspace_path.clone());
        let observation =
            xbot_engine::primitives::bash(&ctx, &config.instruction, None, Some(config.timeout_secs)).await;

        let outcome = if observation.ok {
            let summary = observation.summary.unwrap_or_else(|| "command completed".to_string());
            WorkerOutcome::Done { summary }
        } else {
            WorkerOutcome::Failed {
                error: observation.message.unwrap_or_else(|| "command failed".to_string()),
            }
        };
        self.outcomes.lock().insert(run_id.clone(), outcome);

        Ok(WorkerHandle {
            worker_id: config.worker_id,
            run_id,
        })
    }

    async fn send(&self, _handle: &WorkerHandle, _input: &str) -> Result<(), WorkerBackendError> {
        Ok(())
    }

    async fn poll(&self, handle: &WorkerHandle) -> Result<Option<WorkerOutcome>, WorkerBackendError> {
        Ok(self.outcomes.lock().remove(&handle.run_id))
    }

    async fn kill(&self, _handle: &WorkerHandle) -> Result<(), WorkerBackendError> {
        Ok(())
    }
}

/// Drives a nested, bounded Orchestrator run with Worker SOUL and a
/// worker-restricted tool profile (§4.6 step 3). The run is driven to
/// completion within `spawn` itself rather than backgrounded: the nested
/// loop is already turn- and time-bounded by `MAX_TURNS`/`TASK_TIMEOUT`,
/// so there's no independent subprocess to poll for — `poll` just hands
/// back the outcome `spawn` already computed.
pub struct CoreAgentBackend<L: LlmClient> {
    llm: Arc<L>,
    dispatcher: Arc<dyn ToolDispatcher>,
    data_dir: std::path::PathBuf,
    run_counter: AtomicU64,
    outcomes: Mutex<HashMap<String, WorkerOutcome>>,
}

impl<L: LlmClient> CoreAgentBackend<L> {
    pub fn new(llm: Arc<L>, dispatcher: Arc<dyn ToolDispatcher>, data_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            llm,
            dispatcher,
            data_dir: data_dir.into(),
            run_counter: AtomicU64::new(0),
            outcomes: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<L: LlmClient> WorkerBackend for CoreAgentBackend<L> {
    async fn spawn(&self, config: WorkerSpawnConfig) -> Result<WorkerHandle, WorkerBackendError> {
        let run_id = format!("core-agent-{}", self.run_counter.fetch_add(1, Ordering::SeqCst));
        let worker_name = config
            .workspace_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| config.worker_id.to_string());
        let soul = load_worker_soul(&self.data_dir, &worker_name);
        let profile = CallerProfile::Worker {
            worker_id: config.worker_id.clone(),
        };
        let prompt = xbot_engine::prompt::compose_system_prompt(&profile, &soul, false);
        let tools = crate::tool_defs::tool_definitions(&profile, false);

        let orchestrator = Orchestrator::new(self.llm.as_ref(), self.dispatcher.as_ref(), profile, tools);
        let history = vec![ChatMessage::user_text(config.instruction.clone())];
        let cancellation = CancellationToken::new();

        let outcome = match orchestrator.run(&prompt, history, &cancellation).await {
            Ok(TurnLoopOutcome::Replied { text, .. }) => WorkerOutcome::Done { summary: text },
            Ok(TurnLoopOutcome::TurnBudgetExhausted) => WorkerOutcome::Failed {
                error: "turn budget exhausted".to_string(),
            },
            Ok(TurnLoopOutcome::LoopDetected) => WorkerOutcome::Failed {
                error: "identical tool call repeated three times".to_string(),
            },
            Ok(TurnLoopOutcome::Cancelled) => WorkerOutcome::Failed {
                error: "cancelled".to_string(),
            },
            Err(err) => WorkerOutcome::Failed { error: err.to_string() },
        };

        self.outcomes.lock().insert(run_id.clone(), outcome);
        Ok(WorkerHandle {
            worker_id: config.worker_id,
            run_id,
        })
    }

    async fn send(&self, _handle: &WorkerHandle, _input: &str) -> Result<(), WorkerBackendError> {
        Ok(())
    }

    async fn poll(&self, handle: &WorkerHandle) -> Result<Option<WorkerOutcome>, WorkerBackendError> {
        Ok(self.outcomes.lock().remove(&handle.run_id))
    }

    async fn kill(&self, _handle: &WorkerHandle) -> Result<(), WorkerBackendError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "worker_backends_tests.rs"]
mod tests;
