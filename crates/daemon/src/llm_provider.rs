// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the open question `xbot_engine::llm` leaves standing: the
//! actual HTTP transport to a model provider is backend-specific and out
//! of this core's scope (same reasoning §9 applies to the `codex`/
//! `gemini-cli` worker backends). Rather than guess at one provider's wire
//! format, the daemon ships a concrete, fail-closed [`LlmClient`] that
//! always returns `llm_unavailable` — §7's one-retry-then-fail-the-task
//! path already handles that cleanly, so an unconfigured daemon degrades
//! to "every task fails with a clear cause" instead of refusing to start.
//!
//! A real deployment swaps this out for a provider-specific `LlmClient`
//! impl wired in at `main` — nothing else in the engine or daemon needs to
//! change to support one.

use async_trait::async_trait;
use xbot_engine::llm::{ChatMessage, LlmClient, LlmError, LlmTurn, ToolDefinition};

pub struct UnconfiguredLlmClient;

#[async_trait]
impl LlmClient for UnconfiguredLlmClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        _history: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<LlmTurn, LlmError> {
        Err(LlmError(
            "no LLM provider configured; set up a provider-specific LlmClient and wire it in at startup"
                .to_string(),
        ))
    }
}

#[cfg(test)]
#[path = "llm_provider_tests.rs"]
mod tests;
