// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The LLM function-calling interface (§6). The provider itself — the
//! actual HTTP client, streaming transport, retry/backoff for transient
//! network errors — is an external collaborator out of this crate's scope;
//! this module defines only the contract the Orchestrator drives.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Who produced one turn of conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
    Tool,
}

/// One part of a message. A single turn may carry multiple parts (rare in
/// practice, but the wire format allows it per §6).
#[derive(Debug, Clone)]
pub enum MessagePart {
    Text(String),
    FunctionCall { name: String, args: Value },
    FunctionResponse { name: String, content: Value },
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![MessagePart::Text(text.into())],
        }
    }

    pub fn model_function_call(name: impl Into<String>, args: Value) -> Self {
        Self {
            role: ChatRole::Model,
            parts: vec![MessagePart::FunctionCall {
                name: name.into(),
                args,
            }],
        }
    }

    pub fn tool_response(name: impl Into<String>, content: Value) -> Self {
        Self {
            role: ChatRole::Tool,
            parts: vec![MessagePart::FunctionResponse {
                name: name.into(),
                content,
            }],
        }
    }

    /// Rough size of this message for history-window char budgeting.
    pub fn approx_chars(&self) -> usize {
        self.parts
            .iter()
            .map(|p| match p {
                MessagePart::Text(t) => t.len(),
                MessagePart::FunctionCall { name, args } => name.len() + args.to_string().len(),
                MessagePart::FunctionResponse { name, content } => {
                    name.len() + content.to_string().len()
                }
            })
            .sum()
    }
}

/// One callable tool's schema, as presented to the model.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// The terminal result of one `complete` call: either the model finished
/// with text, or it wants to invoke a tool.
#[derive(Debug, Clone)]
pub enum LlmTurn {
    Text(String),
    FunctionCall { name: String, args: Value },
}

#[derive(Debug, thiserror::Error)]
#[error("llm call failed: {0}")]
pub struct LlmError(pub String);

/// The provider-agnostic function-calling contract the Orchestrator drives.
/// Implementations stream incremental text to the adapter themselves and
/// return only the terminal turn here.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmTurn, LlmError>;
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
            ChatRole::Tool => "tool",
        };
        write!(f, "{s}")
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Deterministic `LlmClient` that replays a scripted sequence of turns,
    /// one per `complete` call, and records every call it received.
    #[derive(Clone, Default)]
    pub struct FakeLlmClient {
        inner: Arc<Mutex<FakeState>>,
    }

    #[derive(Default)]
    struct FakeState {
        script: VecDeque<LlmTurn>,
        calls: Vec<(String, usize, usize)>,
    }

    impl FakeLlmClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_text(&self, text: impl Into<String>) {
            self.inner.lock().script.push_back(LlmTurn::Text(text.into()));
        }

        pub fn push_function_call(&self, name: impl Into<String>, args: Value) {
            self.inner
                .lock()
                .script
                .push_back(LlmTurn::FunctionCall {
                    name: name.into(),
                    args,
                });
        }

        pub fn call_count(&self) -> usize {
            self.inner.lock().calls.len()
        }
    }

    #[async_trait]
    impl LlmClient for FakeLlmClient {
        async fn complete(
            &self,
            system_prompt: &str,
            history: &[ChatMessage],
            tools: &[ToolDefinition],
        ) -> Result<LlmTurn, LlmError> {
            let mut inner = self.inner.lock();
            inner
                .calls
                .push((system_prompt.to_string(), history.len(), tools.len()));
            inner
                .script
                .pop_front()
                .ok_or_else(|| LlmError("fake llm script exhausted".to_string()))
        }
    }
}

#[cfg(test)]
#[path = "llm_tests.rs"]
mod tests;
