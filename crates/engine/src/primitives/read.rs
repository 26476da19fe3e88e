// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{resolve_path, PrimitiveContext};
use serde_json::json;
use xbot_core::{ErrorCode, ToolObservation};

/// `read(path, start_line?, max_lines?, encoding?)`. Only `utf-8` decoding
/// is supported; any other `encoding` value is rejected as invalid input
/// rather than silently ignored.
pub async fn read(
    ctx: &PrimitiveContext,
    path: &str,
    start_line: Option<usize>,
    max_lines: Option<usize>,
    encoding: Option<&str>,
) -> ToolObservation {
    if let Some(enc) = encoding {
        if enc != "utf-8" {
            return ToolObservation::err(
                ErrorCode::InvalidInput,
                format!("unsupported encoding: {enc}"),
            );
        }
    }

    let resolved = match resolve_path(ctx, path) {
        Ok(p) => p,
        Err(code) => return ToolObservation::err(code, format!("path denied: {path}")),
    };

    let bytes = match tokio::fs::read(&resolved).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ToolObservation::err(ErrorCode::NotFound, format!("not found: {path}"));
        }
        Err(err) => return ToolObservation::err(ErrorCode::ExecFailure, err.to_string()),
    };

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => return ToolObservation::err(ErrorCode::DecodeError, format!("not utf-8: {path}")),
    };

    let start = start_line.unwrap_or(0);
    let lines: Vec<&str> = text.lines().collect();
    let end = match max_lines {
        Some(n) => (start + n).min(lines.len()),
        None => lines.len(),
    };
    let slice = lines.get(start..end).unwrap_or(&[]).join("\n");

    ToolObservation::ok_with_summary(
        json!({ "path": path, "content": slice, "total_lines": lines.len() }),
        format!("read {} lines from {path}", end.saturating_sub(start)),
    )
}

#[cfg(test)]
#[path = "read_tests.rs"]
mod tests;
