// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform shape every tool call returns, so the orchestrator never has
//! to branch on tool identity to interpret a result.

use serde::{Deserialize, Serialize};

/// Stable error codes surfaced to the model and to callers inspecting task
/// history. Matches the taxonomy in the error handling design: tool errors
/// are recoverable observations, not exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    PathDenied,
    NotFound,
    DecodeError,
    Exists,
    AmbiguousMatch,
    Schema,
    Timeout,
    ExecFailure,
    Unauthorized,
    InvalidInput,
    LoopDetected,
    TurnBudgetExhausted,
    TaskCancelled,
    StateCorrupt,
    LlmUnavailable,
    McpUnavailable,
    AdapterFailure,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        write!(f, "{s}")
    }
}

/// Uniform tool-call result. Every primitive, `run_extension`, and
/// `dispatch_worker` return this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolObservation {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ToolObservation {
    pub fn ok(data: impl Into<serde_json::Value>) -> Self {
        Self {
            ok: true,
            data: Some(data.into()),
            summary: None,
            error_code: None,
            message: None,
        }
    }

    pub fn ok_with_summary(data: impl Into<serde_json::Value>, summary: impl Into<String>) -> Self {
        Self {
            ok: true,
            data: Some(data.into()),
            summary: Some(summary.into()),
            error_code: None,
            message: None,
        }
    }

    pub fn err(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            summary: None,
            error_code: Some(code),
            message: Some(message.into()),
        }
    }

    /// True when this observation is byte-identical in its meaningful
    /// content to `other` — used by the circuit breaker's identical-call
    /// detection, which compares `(name, args, result)` triples.
    pub fn same_content(&self, other: &Self) -> bool {
        self.ok == other.ok
            && self.data == other.data
            && self.error_code == other.error_code
            && self.message == other.message
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
