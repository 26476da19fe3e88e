// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{resolve_path, PrimitiveContext};
use serde::{Deserialize, Serialize};
use serde_json::json;
use xbot_core::{ErrorCode, ToolObservation};

/// One `{match, replace, count?}` entry from an `edit` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOp {
    #[serde(rename = "match")]
    pub match_text: String,
    pub replace: String,
    #[serde(default)]
    pub count: Option<usize>,
}

/// `edit(path, edits[], dry_run=false)`.
///
/// Edits are applied in order against an in-memory copy of the file; the
/// write to disk only happens once every edit in the batch has succeeded,
/// so a failing edit never leaves the file partially patched.
pub async fn edit(ctx: &PrimitiveContext, path: &str, edits: &[EditOp], dry_run: bool) -> ToolObservation {
    let resolved = match resolve_path(ctx, path) {
        Ok(p) => p,
        Err(code) => return ToolObservation::err(code, format!("path denied: {path}")),
    };

    let original = match tokio::fs::read_to_string(&resolved).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ToolObservation::err(ErrorCode::NotFound, format!("not found: {path}"));
        }
        Err(err) => return ToolObservation::err(ErrorCode::ExecFailure, err.to_string()),
    };

    let mut content = original.clone();
    for op in edits {
        let occurrences = content.matches(op.match_text.as_str()).count();
        if occurrences == 0 {
            return ToolObservation::err(
                ErrorCode::NotFound,
                format!("no match for {:?} in {path}", op.match_text),
            );
        }
        match op.count {
            Some(expected) if expected != occurrences => {
                return ToolObservation::err(
                    ErrorCode::AmbiguousMatch,
                    format!(
                        "expected {expected} occurrences of {:?} in {path}, found {occurrences}",
                        op.match_text
                    ),
                );
            }
            None if occurrences > 1 => {
                return ToolObservation::err(
                    ErrorCode::AmbiguousMatch,
                    format!(
                        "{:?} matches {occurrences} times in {path}; pass count to disambiguate",
                        op.match_text
                    ),
                );
            }
            _ => {}
        }
        content = content.replace(op.match_text.as_str(), op.replace.as_str());
    }

    if dry_run {
        return ToolObservation::ok_with_summary(
            json!({ "path": path, "preview": content }),
            format!("dry-run: {} edit(s) would apply to {path}", edits.len()),
        );
    }

    let tmp_path = resolved.with_extension("tmp-edit");
    if let Err(err) = tokio::fs::write(&tmp_path, &content).await {
        return ToolObservation::err(ErrorCode::ExecFailure, err.to_string());
    }
    if let Err(err) = tokio::fs::rename(&tmp_path, &resolved).await {
        return ToolObservation::err(ErrorCode::ExecFailure, err.to_string());
    }

    ToolObservation::ok_with_summary(
        json!({ "path": path, "edits_applied": edits.len() }),
        format!("applied {} edit(s) to {path}", edits.len()),
    )
}

#[cfg(test)]
#[path = "edit_tests.rs"]
mod tests;
