// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::PrimitiveContext;
use serde_json::json;
use std::time::Duration;
use tokio::process::Command;
use xbot_adapters::subprocess::{run_with_timeout, BASH_TIMEOUT};
use xbot_core::{ErrorCode, ToolObservation};

/// Output is captured and truncated at this many bytes per stream (§4.4).
const OUTPUT_TRUNCATE_BYTES: usize = 64 * 1024;

fn truncate(bytes: Vec<u8>) -> String {
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if text.len() > OUTPUT_TRUNCATE_BYTES {
        let mut truncated: String = text.chars().take(OUTPUT_TRUNCATE_BYTES).collect();
        truncated.push_str("\n...[truncated]");
        truncated
    } else {
        text
    }
}

/// `bash(command, cwd?, timeout_sec<=300)`.
///
/// Worker-scope calls are parsed and allow-list-checked before anything is
/// spawned (§4.4a); the Manager has an unrestricted program allow-list but
/// still goes through the sensitive-path check.
pub async fn bash(
    ctx: &PrimitiveContext,
    command: &str,
    cwd: Option<&str>,
    timeout_sec: Option<u64>,
) -> ToolObservation {
    let ast = match xbot_shell::parse(command) {
        Ok(ast) => ast,
        Err(err) => {
            return ToolObservation::err(ErrorCode::PathDenied, format!("unparseable command: {err}"))
        }
    };

    if let Err(err) = xbot_shell::check_sensitive_paths(&ast) {
        return ToolObservation::err(ErrorCode::PathDenied, err.to_string());
    }

    if let Some(allowlist) = &ctx.bash_allowlist {
        if let Err(err) = xbot_shell::validate_allowlist(&ast, allowlist) {
            return ToolObservation::err(ErrorCode::Unauthorized, err.to_string());
        }
    }

    let timeout = timeout_sec
        .map(Duration::from_secs)
        .unwrap_or(BASH_TIMEOUT)
        .min(BASH_TIMEOUT);

    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(command);
    cmd.current_dir(cwd.map(|c| ctx.root.join(c)).unwrap_or_else(|| ctx.root.clone()));

    match run_with_timeout(cmd, timeout, "bash").await {
        Ok(output) => {
            let stdout = truncate(output.stdout);
            let stderr = truncate(output.stderr);
            let code = output.status.code();
            if output.status.success() {
                ToolObservation::ok_with_summary(
                    json!({ "stdout": stdout, "stderr": stderr, "exit_code": code }),
                    "command exited 0",
                )
            } else {
                ToolObservation::err(
                    ErrorCode::ExecFailure,
                    format!("command exited with {code:?}: {stderr}"),
                )
            }
        }
        Err(message) if message.contains("timed out") => {
            ToolObservation::err(ErrorCode::Timeout, message)
        }
        Err(message) => ToolObservation::err(ErrorCode::ExecFailure, message),
    }
}

#[cfg(test)]
#[path = "bash_tests.rs"]
mod tests;
