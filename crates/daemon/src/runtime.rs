// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TaskRunner`: turns one dequeued [`TaskEnvelope`] into a completed or
//! failed one (§4.2-§4.3). This is the glue the Core Manager loop proper
//! (`Orchestrator`) doesn't know about: session ordering, prompt
//! composition, transcript bookkeeping, and handing the terminal reply back
//! to whichever adapter owns the originating platform.

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use xbot_adapters::context::{UnifiedChat, UnifiedContext};
use xbot_core::{CallerProfile, Clock, IdGen};
use xbot_core::{TaskEnvelope, TaskStatus};
use xbot_engine::extension::{ExtensionExecutor, SkillLoader};
use xbot_engine::llm::{ChatMessage, ChatRole, LlmClient};
use xbot_engine::memory::MemoryClient;
use xbot_engine::orchestrator::{Orchestrator, TurnLoopOutcome, TASK_TIMEOUT};
use xbot_engine::worker_runtime::WorkerStore;
use xbot_inbox::SharedInbox;

use crate::dispatcher::{BackendTable, CoreToolDispatcher};
use crate::session_lock::SessionLocks;
use crate::soul::load_manager_soul;
use crate::tool_defs::tool_definitions;
use crate::transcript;

/// Roughly how much prior conversation (in chars) is loaded into history
/// for one turn (§4.3 step 2: "bounded by char budget").
const HISTORY_CHAR_BUDGET: usize = 16_000;

/// Everything a [`TaskRunner`] needs beyond the task envelope itself,
/// grouped so `main.rs` builds it once and clones the `Arc`s into each
/// spawned task.
pub struct TaskRunner<C: Clock, I: IdGen, L: LlmClient> {
    pub data_dir: PathBuf,
    pub inbox: SharedInbox<C, I>,
    pub llm: Arc<L>,
    pub clock: C,
    pub id_gen: I,
    pub extensions: Arc<ExtensionExecutor>,
    pub skills: Arc<SkillLoader>,
    pub worker_store: Arc<WorkerStore>,
    pub backends: Arc<BackendTable>,
    pub memory: Option<Arc<dyn MemoryClient>>,
    pub session_locks: Arc<SessionLocks>,
    pub adapters: Arc<HashMap<String, Arc<dyn UnifiedContext>>>,
}

impl<C: Clock, I: IdGen, L: LlmClient> TaskRunner<C, I, L> {
    /// Run one task to completion: acquire the session lock, drive the
    /// orchestrator, persist the terminal status, and reply if the task
    /// demands one. Errors here are task-level failures, already recorded
    /// on the envelope — callers only need this for logging.
    pub async fn run_task(&self, envelope: TaskEnvelope) -> Result<(), crate::error::XbotError> {
        let _session_guard = self.session_locks.acquire(&envelope.user_id, &envelope.platform).await;

        self.inbox.update_status(&envelope.task_id, TaskStatus::Running).await?;

        let memory_enabled = self.memory.is_some();
        let profile = CallerProfile::Manager;
        let soul = load_manager_soul(&self.data_dir);
        let system_prompt = xbot_engine::prompt::compose_system_prompt(&profile, &soul, memory_enabled);
        let tools = tool_definitions(&profile, memory_enabled);

        let session_id = session_id_for(&envelope);
        let now = self.clock.epoch_ms();
        let mut history = transcript::load_history(
            &self.data_dir,
            &envelope.user_id,
            &session_id,
            now,
            HISTORY_CHAR_BUDGET,
        );
        history.push(ChatMessage::user_text(envelope.goal.clone()));
        let _ = transcript::append_turn(
            &self.data_dir,
            &envelope.user_id,
            &session_id,
            now,
            ChatRole::User,
            &envelope.goal,
        );

        let dispatcher = CoreToolDispatcher::new(
            envelope.user_id.clone(),
            self.data_dir.clone(),
            xbot_engine::primitives::PrimitiveContext::manager(self.data_dir.clone()),
            self.extensions.clone(),
            self.skills.clone(),
            self.worker_store.clone(),
            self.backends.clone(),
            self.memory.clone(),
            self.clock.clone(),
            self.id_gen.clone(),
        );

        let orchestrator = Orchestrator::new(self.llm.as_ref(), &dispatcher, profile, tools);
        let cancellation = CancellationToken::new();
        let run = orchestrator.run(&system_prompt, history, &cancellation);

        let outcome = match tokio::time::timeout(TASK_TIMEOUT, run).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                self.inbox.fail(&envelope.task_id, err.to_string()).await?;
                self.maybe_reply(&envelope, &format!("task failed: {err}")).await;
                return Ok(());
            }
            Err(_) => {
                self.inbox.fail(&envelope.task_id, "task_timeout").await?;
                self.maybe_reply(&envelope, "the task took too long and was stopped").await;
                return Ok(());
            }
        };

        match outcome {
            TurnLoopOutcome::Replied { text, files } => {
                self.inbox
                    .complete(&envelope.task_id, Some(Value::String(text.clone())), text.clone())
                    .await?;
                let _ = transcript::append_turn(
                    &self.data_dir,
                    &envelope.user_id,
                    &session_id,
                    self.clock.epoch_ms(),
                    ChatRole::Model,
                    &text,
                );
                self.maybe_reply(&envelope, &text).await;
                self.deliver_files(&envelope, &files).await;
            }
            TurnLoopOutcome::TurnBudgetExhausted => {
                self.inbox.fail(&envelope.task_id, "turn_budget_exhausted").await?;
                self.maybe_reply(&envelope, "I couldn't finish that within my turn budget.").await;
            }
            TurnLoopOutcome::LoopDetected => {
                self.inbox.fail(&envelope.task_id, "loop_detected").await?;
                self.maybe_reply(&envelope, "I got stuck repeating the same action and stopped.").await;
            }
            TurnLoopOutcome::Cancelled => {
                self.inbox.cancel(&envelope.task_id).await?;
            }
        }

        Ok(())
    }

    async fn maybe_reply(&self, envelope: &TaskEnvelope, text: &str) {
        if !envelope.requires_reply {
            return;
        }
        let Some(adapter) = self.adapters.get(&envelope.platform) else {
            tracing::warn!(platform = %envelope.platform, "no adapter registered for platform");
            return;
        };
        let chat = self.chat_for(envelope);
        if let Err(err) = adapter.reply(&chat, text, None).await {
            tracing::warn!(task_id = %envelope.task_id, error = %err, "failed to deliver reply");
        }
    }

    /// Auto-deliver any files a `run_extension` call emitted this run
    /// (§4.5 step 5), independent of `requires_reply` — a file a skill
    /// produced is worth sending even for a task that didn't ask for a
    /// text reply.
    async fn deliver_files(&self, envelope: &TaskEnvelope, files: &[xbot_engine::extension::OutputFile]) {
        if files.is_empty() {
            return;
        }
        let Some(adapter) = self.adapters.get(&envelope.platform) else {
            tracing::warn!(platform = %envelope.platform, "no adapter registered for platform");
            return;
        };
        let chat = self.chat_for(envelope);
        for file in files {
            if let Err(err) = adapter.reply_photo(&chat, &file.path, None).await {
                tracing::warn!(task_id = %envelope.task_id, path = %file.path.display(), error = %err, "failed to deliver emitted file");
            }
        }
    }

    fn chat_for(&self, envelope: &TaskEnvelope) -> UnifiedChat {
        let chat_id = envelope
            .payload
            .get("chat_id")
            .and_then(|v| v.as_str())
            .unwrap_or(&envelope.user_id)
            .to_string();
        UnifiedChat { id: chat_id }
    }
}

fn session_id_for(envelope: &TaskEnvelope) -> String {
    envelope
        .payload
        .get("session_id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-{}", envelope.platform, envelope.user_id))
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
