// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{resolve_path, PrimitiveContext};
use serde::{Deserialize, Serialize};
use serde_json::json;
use xbot_core::{ErrorCode, ToolObservation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    Create,
    Overwrite,
}

/// `write(path, content, mode, create_parents=false)`.
///
/// Writes go through a temp-file-then-rename, matching the canonical
/// state protocol's atomic-write discipline even though this primitive
/// writes arbitrary workspace files, not state files.
pub async fn write(
    ctx: &PrimitiveContext,
    path: &str,
    content: &str,
    mode: WriteMode,
    create_parents: bool,
) -> ToolObservation {
    let resolved = match resolve_path(ctx, path) {
        Ok(p) => p,
        Err(code) => return ToolObservation::err(code, format!("path denied: {path}")),
    };

    if mode == WriteMode::Create && resolved.exists() {
        return ToolObservation::err(ErrorCode::Exists, format!("already exists: {path}"));
    }

    if let Some(parent) = resolved.parent() {
        if !parent.exists() {
            if !create_parents {
                return ToolObservation::err(
                    ErrorCode::NotFound,
                    format!("parent directory does not exist: {path}"),
                );
            }
            if let Err(err) = tokio::fs::create_dir_all(parent).await {
                return ToolObservation::err(ErrorCode::ExecFailure, err.to_string());
            }
        }
    }

    let tmp_path = resolved.with_extension("tmp-write");
    if let Err(err) = tokio::fs::write(&tmp_path, content).await {
        return ToolObservation::err(ErrorCode::ExecFailure, err.to_string());
    }
    if let Err(err) = tokio::fs::rename(&tmp_path, &resolved).await {
        return ToolObservation::err(ErrorCode::ExecFailure, err.to_string());
    }

    ToolObservation::ok_with_summary(
        json!({ "path": path, "bytes_written": content.len() }),
        format!("wrote {} bytes to {path}", content.len()),
    )
}

#[cfg(test)]
#[path = "write_tests.rs"]
mod tests;
