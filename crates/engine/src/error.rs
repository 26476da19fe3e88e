// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Internal failures that abort an orchestrator turn outright, as opposed
/// to a [`xbot_core::ToolObservation`] with `ok: false`, which is surfaced
/// to the model as a recoverable observation instead. Per §7, an
/// `EngineError` is retried once with back-off at the call site, then
/// turned into a task failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("llm provider unavailable: {0}")]
    LlmUnavailable(String),
    #[error("mcp memory service unavailable: {0}")]
    McpUnavailable(String),
    #[error("adapter failure: {0}")]
    AdapterFailure(String),
    #[error("tool not registered: {0}")]
    ToolNotFound(String),
    #[error("turn budget of {0} exhausted")]
    TurnBudgetExhausted(u32),
    #[error("identical tool call repeated three times; loop detected")]
    LoopDetected,
    #[error("task cancelled")]
    TaskCancelled,
    #[error(transparent)]
    State(#[from] xbot_state::StateError),
    #[error(transparent)]
    Inbox(#[from] xbot_inbox::InboxError),
}
