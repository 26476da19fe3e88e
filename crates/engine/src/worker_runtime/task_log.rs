// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WORKER_TASKS.jsonl`: an append-only event log of every sub-task ever
//! dispatched to the Worker Fleet, independent of the Task Inbox's own
//! `TaskEnvelope` lifecycle (a dispatched sub-task has its own `task_id`,
//! scoped to the worker run, not the inbox envelope that triggered it).
//!
//! Per §6, the JSON lines are wrapped in the same
//! `XBOT_STATE_BEGIN`/`XBOT_STATE_END` marker pair the canonical state
//! protocol uses, so a human can safely hand-edit the payload between them
//! without disturbing the sentinel lines a reader depends on.

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use xbot_core::WorkerId;
use xbot_state::{STATE_BEGIN_MARKER, STATE_END_MARKER};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerTaskStatus {
    Queued,
    Running,
    Done,
    Failed,
}

/// One entry in a [`WorkerTaskLogEntry`]'s `events` audit trail (§3's
/// `TaskEnvelope.events[]` shape, reused here for the worker task log).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerTaskEvent {
    pub ts: u64,
    pub kind: String,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerTaskLogEntry {
    pub task_id: String,
    pub worker_id: WorkerId,
    pub status: WorkerTaskStatus,
    pub source: String,
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub events: Vec<WorkerTaskEvent>,
}

fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("WORKER_TASKS.jsonl")
}

/// Split a marker-wrapped log document into its JSONL body lines. A file
/// that doesn't yet have the marker wrapper (first run) is treated as an
/// empty body.
fn body_lines(content: &str) -> Vec<String> {
    let without_begin = match content.find(STATE_BEGIN_MARKER) {
        Some(idx) => &content[idx + STATE_BEGIN_MARKER.len()..],
        None => return Vec::new(),
    };
    let body = match without_begin.find(STATE_END_MARKER) {
        Some(idx) => &without_begin[..idx],
        None => without_begin,
    };
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn render(lines: &[String]) -> String {
    let mut out = String::new();
    out.push_str(STATE_BEGIN_MARKER);
    out.push('\n');
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(STATE_END_MARKER);
    out.push('\n');
    out
}

/// Append one entry, holding an OS-level advisory exclusive lock on the
/// file descriptor for the duration of the read-modify-write so concurrent
/// worker runtimes never interleave partial lines or torn marker blocks.
pub fn append(data_dir: &Path, entry: &WorkerTaskLogEntry) -> Result<(), EngineError> {
    let path = log_path(data_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| EngineError::AdapterFailure(format!("creating {}: {e}", parent.display())))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .map_err(|e| EngineError::AdapterFailure(format!("opening {}: {e}", path.display())))?;

    file.lock_exclusive()
        .map_err(|e| EngineError::AdapterFailure(format!("locking {}: {e}", path.display())))?;

    let result = (|| {
        let mut existing = String::new();
        file.read_to_string(&mut existing)
            .map_err(|e| EngineError::AdapterFailure(format!("reading {}: {e}", path.display())))?;

        let mut lines = body_lines(&existing);
        let line = serde_json::to_string(entry)
            .map_err(|e| EngineError::AdapterFailure(format!("serializing log entry: {e}")))?;
        lines.push(line);

        let rendered = render(&lines);
        file.seek(SeekFrom::Start(0))
            .map_err(|e| EngineError::AdapterFailure(format!("seeking {}: {e}", path.display())))?;
        file.write_all(rendered.as_bytes())
            .map_err(|e| EngineError::AdapterFailure(format!("writing {}: {e}", path.display())))?;
        file.set_len(rendered.len() as u64)
            .map_err(|e| EngineError::AdapterFailure(format!("truncating {}: {e}", path.display())))?;
        Ok(())
    })();

    // Release the lock even if the write failed, rather than leaving the
    // file locked for the next writer.
    let _ = file.unlock();
    result
}

/// Read every entry currently in the log, in append order — used by
/// `inspect-worker`/`replay-task` CLI operations, not by the hot dispatch
/// path.
pub fn read_all(data_dir: &Path) -> Result<Vec<WorkerTaskLogEntry>, EngineError> {
    let path = log_path(data_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| EngineError::AdapterFailure(format!("reading {}: {e}", path.display())))?;
    body_lines(&content)
        .into_iter()
        .map(|line| {
            serde_json::from_str(&line)
                .map_err(|e| EngineError::AdapterFailure(format!("parsing log line: {e}")))
        })
        .collect()
}

#[cfg(test)]
#[path = "task_log_tests.rs"]
mod tests;
