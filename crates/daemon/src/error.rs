// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon-level error taxonomy (§4.10): every crate below this one
//! returns its own `thiserror` type; here they're composed into one
//! `XbotError` so `main` has a single thing to log and act on. The
//! five-way split mirrors §7's taxonomy rather than wrapping each
//! upstream error 1:1.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XbotError {
    /// Bad input from whoever is driving the daemon (env var, CLI flag) —
    /// not retried, surfaced directly.
    #[error("configuration error: {0}")]
    UserError(String),

    /// A tool call failed in a way the orchestrator already turned into a
    /// recoverable `ToolObservation`; this variant only appears when that
    /// translation itself couldn't happen.
    #[error("tool error: {0}")]
    ToolError(String),

    /// An external collaborator (LLM provider, MCP memory service, worker
    /// backend) was unavailable after the one retry §7 allows.
    #[error("external collaborator unavailable: {0}")]
    ExternalError(String),

    /// The state store could not be read or written even after the
    /// backup-and-overwrite recovery path.
    #[error("state error: {0}")]
    StateError(#[from] xbot_state::StateError),

    /// A loop guard or other runtime invariant tripped.
    #[error("runtime invariant: {0}")]
    RuntimeInvariant(String),
}

impl From<xbot_inbox::InboxError> for XbotError {
    fn from(err: xbot_inbox::InboxError) -> Self {
        match err {
            xbot_inbox::InboxError::State(state_err) => XbotError::StateError(state_err),
            other => XbotError::ToolError(other.to_string()),
        }
    }
}

impl From<xbot_engine::EngineError> for XbotError {
    fn from(err: xbot_engine::EngineError) -> Self {
        use xbot_engine::EngineError as E;
        match err {
            E::State(state_err) => XbotError::StateError(state_err),
            E::Inbox(inbox_err) => inbox_err.into(),
            E::LlmUnavailable(msg) | E::McpUnavailable(msg) | E::AdapterFailure(msg) => {
                XbotError::ExternalError(msg)
            }
            E::ToolNotFound(msg) => XbotError::ToolError(msg),
            E::TurnBudgetExhausted(_) | E::LoopDetected | E::TaskCancelled => {
                XbotError::RuntimeInvariant(err.to_string())
            }
        }
    }
}

impl From<std::io::Error> for XbotError {
    fn from(err: std::io::Error) -> Self {
        XbotError::StateError(xbot_state::StateError::io(std::path::PathBuf::new(), err))
    }
}
