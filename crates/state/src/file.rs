// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `read_state`/`write_state`: the only file I/O boundary business state
//! crosses. Reads are tolerant (see [`crate::parse`]); writes are strict —
//! atomic temp-then-rename, with a timestamped backup taken first if the
//! existing file can't be recovered under any known variant.

use crate::backup::rotate_bak_path;
use crate::error::{ParseError, StateError};
use crate::markers::render_canonical;
use crate::parse::{parse_tolerant, SourceKind};
use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// The result of a successful `read_state`: the parsed payload and which
/// reader variant recovered it.
#[derive(Debug, Clone)]
pub struct StatePayload {
    pub data: Value,
    pub source_kind: SourceKind,
}

/// Read and tolerantly parse a canonical state file.
///
/// Fails only if none of the four recognized variants can recover a YAML
/// mapping from the file's content.
pub fn read_state(path: &Path) -> Result<StatePayload, StateError> {
    let content = fs::read_to_string(path).map_err(|e| StateError::io(path, e))?;
    match parse_tolerant(&content) {
        Some((data, source_kind)) => Ok(StatePayload { data, source_kind }),
        None => Err(StateError::Parse(ParseError {
            path: path.to_path_buf(),
            reason: "no known state-file variant could be recovered".to_string(),
        })),
    }
}

/// Write `payload` to `path` as a canonical state file, atomically.
///
/// `payload` must serialize to a YAML mapping; `version: 1` is injected if
/// absent. If a file already exists at `path` and cannot be parsed under any
/// variant, it is moved to a timestamped `.bak-YYYYMMDD-HHMMSS` first.
pub fn write_state(path: &Path, payload: &Value) -> Result<(), StateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StateError::io(parent, e))?;
    }

    if path.exists() {
        let existing = fs::read_to_string(path).map_err(|e| StateError::io(path, e))?;
        if parse_tolerant(&existing).is_none() {
            let timestamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
            let bak_path = rotate_bak_path(path, &timestamp);
            tracing::warn!(
                path = %path.display(),
                backup = %bak_path.display(),
                "state file unparseable under any variant, backing up before overwrite",
            );
            fs::rename(path, &bak_path).map_err(|e| StateError::io(path, e))?;
        }
    }

    // `serde_json`'s `preserve_order` feature backs `Map` with an `IndexMap`,
    // so the key we insert first is the key that serializes first. Build a
    // fresh map with `version` inserted before anything from `payload` so it
    // always renders first, even when `payload` already carries its own
    // `version` entry (re-inserting an existing key updates its value in
    // place without moving it).
    let mut ordered = serde_json::Map::new();
    ordered.insert("version".to_string(), Value::from(1));
    if let Value::Object(map) = payload {
        for (key, value) in map {
            ordered.insert(key.clone(), value.clone());
        }
    }
    let with_version = Value::Object(ordered);
    let yaml_text =
        serde_yaml::to_string(&with_version).unwrap_or_else(|_| "version: 1\n".to_string());

    let rendered = render_canonical("", &yaml_text);
    let tmp_path = path.with_file_name(format!(
        "{}.tmp-{}",
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        std::process::id(),
    ));
    fs::write(&tmp_path, rendered.as_bytes()).map_err(|e| StateError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| StateError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
