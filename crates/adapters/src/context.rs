// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The adapter boundary: every chat platform (Telegram, Discord, a CLI REPL)
//! is normalized to this shape before a message reaches the Task Inbox, and
//! every reply the Orchestrator sends goes back out through it.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Text,
    Voice,
    Photo,
    Document,
    Callback,
}

#[derive(Debug, Clone)]
pub struct UnifiedUser {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct UnifiedChat {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct UnifiedMessage {
    pub id: String,
    pub platform: String,
    pub user: UnifiedUser,
    pub chat: UnifiedChat,
    pub message_type: MessageType,
    pub text: Option<String>,
    pub callback_data: Option<String>,
}

/// A single actionable button in a reply's UI.
#[derive(Debug, Clone)]
pub struct UiButton {
    pub label: String,
    pub custom_id: Option<String>,
    pub url: Option<String>,
}

/// Inline UI attached to a reply or edit.
#[derive(Debug, Clone, Default)]
pub struct UiPrimitive {
    pub buttons: Vec<UiButton>,
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("adapter send failed: {0}")]
    SendFailed(String),
    #[error("message not found: {0}")]
    MessageNotFound(String),
}

/// The platform-facing half of the adapter boundary. One implementation per
/// chat platform; the Orchestrator only ever talks to this trait.
#[async_trait]
pub trait UnifiedContext: Send + Sync {
    async fn reply(&self, chat: &UnifiedChat, text: &str, ui: Option<UiPrimitive>)
        -> Result<String, AdapterError>;

    async fn edit_message(
        &self,
        chat: &UnifiedChat,
        message_id: &str,
        text: &str,
        ui: Option<UiPrimitive>,
    ) -> Result<(), AdapterError>;

    async fn reply_photo(
        &self,
        chat: &UnifiedChat,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<String, AdapterError>;

    async fn answer_callback(&self, callback_id: &str) -> Result<(), AdapterError>;
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
