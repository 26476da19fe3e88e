// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat transcripts (§3): `data/users/<uid>/chat/YYYY-MM-DD/<session_id>.md`,
//! append-only and explicitly excluded from the canonical state protocol —
//! each line is one JSON-encoded turn, not a marker-delimited YAML block,
//! so a human can `tail -f` it without tripping the strict-write path.
//!
//! The Orchestrator needs a bounded history window (§4.3 step 2: "bounded
//! by char budget ~= model limit - prompt - tools"), so [`load_history`]
//! reads every day's session file back to front and stops once the budget
//! is spent rather than loading the whole transcript into memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xbot_engine::llm::{ChatMessage, ChatRole};

/// One transcript line. `role` mirrors [`ChatRole`] but is kept as its own
/// serializable enum so the on-disk format doesn't change shape if the
/// engine's in-memory type grows fields later.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TranscriptLine {
    ts: u64,
    role: TranscriptRole,
    text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TranscriptRole {
    User,
    Model,
}

fn day_dir(data_dir: &Path, user_id: &str, epoch_ms: u64) -> PathBuf {
    let date = DateTime::<Utc>::from_timestamp((epoch_ms / 1000) as i64, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string();
    xbot_state::user_path(data_dir, user_id, &["chat"]).join(date)
}

fn session_path(data_dir: &Path, user_id: &str, session_id: &str, epoch_ms: u64) -> PathBuf {
    day_dir(data_dir, user_id, epoch_ms).join(format!("{session_id}.md"))
}

/// Append one turn to today's session transcript.
pub fn append_turn(
    data_dir: &Path,
    user_id: &str,
    session_id: &str,
    epoch_ms: u64,
    role: ChatRole,
    text: &str,
) -> std::io::Result<()> {
    use std::io::Write;
    let role = match role {
        ChatRole::User => TranscriptRole::User,
        _ => TranscriptRole::Model,
    };
    let path = session_path(data_dir, user_id, session_id, epoch_ms);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let line = TranscriptLine {
        ts: epoch_ms,
        role,
        text: text.to_string(),
    };
    let encoded = serde_json::to_string(&line).unwrap_or_default();
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "{encoded}")
}

/// Load up to `char_budget` characters of prior conversation for
/// `(user_id, session_id)`, most recent turns first on disk but returned
/// in chronological order since that's what [`xbot_engine::llm::LlmClient`]
/// expects as history.
pub fn load_history(
    data_dir: &Path,
    user_id: &str,
    session_id: &str,
    epoch_ms: u64,
    char_budget: usize,
) -> Vec<ChatMessage> {
    let path = session_path(data_dir, user_id, session_id, epoch_ms);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Vec::new();
    };

    let mut lines: Vec<TranscriptLine> = content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    lines.reverse();

    let mut spent = 0usize;
    let mut kept = Vec::new();
    for line in lines {
        let cost = line.text.len();
        if spent + cost > char_budget && !kept.is_empty() {
            break;
        }
        spent += cost;
        kept.push(line);
    }
    kept.reverse();

    kept.into_iter()
        .map(|line| match line.role {
            TranscriptRole::User => ChatMessage::user_text(line.text),
            TranscriptRole::Model => ChatMessage {
                role: ChatRole::Model,
                parts: vec![xbot_engine::llm::MessagePart::Text(line.text)],
            },
        })
        .collect()
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
