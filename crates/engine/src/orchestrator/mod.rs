// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Agent Orchestrator — the "Manager loop" (§4.3), also reused
//! verbatim to drive a dispatched Worker's `core-agent` backend (§9, "one
//! loop, two roles"). The only thing that differs between the two uses is
//! the [`xbot_core::CallerProfile`] and the [`ToolDispatcher`] passed in.

mod circuit_breaker;

pub use circuit_breaker::CircuitBreaker;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use xbot_core::{CallerProfile, ErrorCode, ToolObservation};

use crate::error::EngineError;
use crate::extension::OutputFile;
use crate::llm::{ChatMessage, LlmClient, LlmTurn, ToolDefinition};
use crate::tool_access::is_tool_allowed;
use crate::tool_access::RUN_EXTENSION;

/// Turn budget per task (§4.3: `MAX_TURNS` default 12).
pub const MAX_TURNS: u32 = 12;

/// Wall-clock budget per task (§6: `TASK_TIMEOUT`).
pub const TASK_TIMEOUT: Duration = Duration::from_secs(600);

/// Explicit turn-loop states (§4.3a), so a cancellation or timeout can be
/// observed between any two states rather than mid-recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Composing,
    AwaitingModel,
    DispatchingTool,
    Replying,
}

/// What the orchestrator produced for one task.
#[derive(Debug, Clone)]
pub enum TurnLoopOutcome {
    /// The model emitted a terminal text reply, plus any files a
    /// `run_extension` call emitted along the way (§4.5 step 5: "Files
    /// emitted during execution may be auto-delivered by the adapter").
    Replied { text: String, files: Vec<OutputFile> },
    /// `MAX_TURNS` was exhausted without a terminal reply.
    TurnBudgetExhausted,
    /// The circuit breaker tripped on three identical tool calls.
    LoopDetected,
    /// The task's cancellation token fired between turns.
    Cancelled,
}

/// Executes one named tool call for a given caller and returns its
/// observation. Concrete implementations live outside this crate's
/// boundary (the daemon wires the primitives, Extension Executor, and
/// Worker Runtime together into one dispatcher); the orchestrator only
/// needs this seam.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    async fn dispatch(&self, profile: &CallerProfile, name: &str, args: Value) -> ToolObservation;
}

/// Drives one task's bounded function-calling loop to completion.
pub struct Orchestrator<'a, L: LlmClient> {
    llm: &'a L,
    dispatcher: &'a dyn ToolDispatcher,
    profile: CallerProfile,
    tools: Vec<ToolDefinition>,
}

impl<'a, L: LlmClient> Orchestrator<'a, L> {
    pub fn new(
        llm: &'a L,
        dispatcher: &'a dyn ToolDispatcher,
        profile: CallerProfile,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        // Tools advertised to the model must already be ones this
        // profile is allowed to call; a mismatch here is a caller bug,
        // not a runtime permission question, so we filter defensively
        // rather than trust the caller's list.
        let tools = tools
            .into_iter()
            .filter(|t| is_tool_allowed(&profile, &t.name))
            .collect();
        Self {
            llm,
            dispatcher,
            profile,
            tools,
        }
    }

    #[instrument(skip_all, fields(turn))]
    pub async fn run(
        &self,
        system_prompt: &str,
        mut history: Vec<ChatMessage>,
        cancellation: &CancellationToken,
    ) -> Result<TurnLoopOutcome, EngineError> {
        let mut breaker = CircuitBreaker::new();
        let mut state = LoopState::Composing;
        let mut turn = 0u32;
        let mut pending_turn: Option<LlmTurn> = None;
        let mut emitted_files: Vec<OutputFile> = Vec::new();

        loop {
            if cancellation.is_cancelled() {
                return Ok(TurnLoopOutcome::Cancelled);
            }

            match state {
                LoopState::Composing => {
                    turn += 1;
                    tracing::Span::current().record("turn", turn);
                    if turn > MAX_TURNS {
                        return Ok(TurnLoopOutcome::TurnBudgetExhausted);
                    }
                    state = LoopState::AwaitingModel;
                }
                LoopState::AwaitingModel => {
                    debug!(turn, history_len = history.len(), "calling llm");
                    pending_turn = Some(self.call_llm_with_retry(system_prompt, &history).await?);
                    state = match &pending_turn {
                        Some(LlmTurn::Text(_)) => LoopState::Replying,
                        Some(LlmTurn::FunctionCall { .. }) => LoopState::DispatchingTool,
                        None => LoopState::Composing,
                    };
                }
                LoopState::DispatchingTool => {
                    let Some(LlmTurn::FunctionCall { name, args }) = pending_turn.take() else {
                        state = LoopState::Composing;
                        continue;
                    };
                    history.push(ChatMessage::model_function_call(name.clone(), args.clone()));
                    let outcome = self
                        .dispatch_one(&name, args, &mut breaker, &mut history, &mut emitted_files)
                        .await?;
                    if let Some(terminal) = outcome {
                        return Ok(terminal);
                    }
                    state = LoopState::Composing;
                }
                LoopState::Replying => {
                    let Some(LlmTurn::Text(text)) = pending_turn.take() else {
                        state = LoopState::Composing;
                        continue;
                    };
                    return Ok(TurnLoopOutcome::Replied {
                        text,
                        files: emitted_files,
                    });
                }
            }
        }
    }

    async fn dispatch_one(
        &self,
        name: &str,
        args: Value,
        breaker: &mut CircuitBreaker,
        history: &mut Vec<ChatMessage>,
        emitted_files: &mut Vec<OutputFile>,
    ) -> Result<Option<TurnLoopOutcome>, EngineError> {
        if !is_tool_allowed(&self.profile, name) {
            let observation = ToolObservation::err(
                ErrorCode::Unauthorized,
                format!("tool not permitted for this caller: {name}"),
            );
            history.push(ChatMessage::tool_response(name, serde_json::to_value(&observation).unwrap_or(Value::Null)));
            return Ok(None);
        }

        let observation = self.dispatcher.dispatch(&self.profile, name, args.clone()).await;
        if name == RUN_EXTENSION && observation.ok {
            emitted_files.extend(files_from_observation(&observation));
        }
        history.push(ChatMessage::tool_response(
            name,
            serde_json::to_value(&observation).unwrap_or(Value::Null),
        ));

        if breaker.record(name, &args, &observation) {
            warn!(tool = name, "circuit breaker tripped; terminating task");
            return Ok(Some(TurnLoopOutcome::LoopDetected));
        }
        Ok(None)
    }

    /// Internal errors (LLM unavailable, registry missing tool) are
    /// retried once with a fixed backoff before surfacing (§4.3).
    async fn call_llm_with_retry(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<LlmTurn, EngineError> {
        match self.llm.complete(system_prompt, history, &self.tools).await {
            Ok(turn) => Ok(turn),
            Err(first_err) => {
                tokio::time::sleep(Duration::from_millis(250)).await;
                self.llm
                    .complete(system_prompt, history, &self.tools)
                    .await
                    .map_err(|_| EngineError::LlmUnavailable(first_err.0))
            }
        }
    }
}

/// Pull the `files` array `ExtensionOutcome::into_observation` embeds in a
/// successful `run_extension` observation's `data` field back out as
/// typed [`OutputFile`]s. Malformed or absent entries are dropped rather
/// than failing the turn — a skill's file list is a courtesy, not load-
/// bearing for the reply itself.
fn files_from_observation(observation: &ToolObservation) -> Vec<OutputFile> {
    observation
        .data
        .as_ref()
        .and_then(|data| data.get("files"))
        .and_then(|files| files.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let path = entry.get("path")?.as_str()?;
                    let mime = entry
                        .get("mime")
                        .and_then(|m| m.as_str())
                        .unwrap_or("application/octet-stream");
                    Some(OutputFile {
                        path: std::path::PathBuf::from(path),
                        mime: mime.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
