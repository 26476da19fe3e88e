// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers shared by the `bash` primitive and the
//! `codex`/`gemini-cli` worker backends.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Default cap for the `bash` primitive (§5: 300s).
pub const BASH_TIMEOUT: Duration = Duration::from_secs(300);

/// Default cap for a worker's external-CLI run (§5: `TASK_TIMEOUT`).
pub const WORKER_TASK_TIMEOUT: Duration = Duration::from_secs(600);

/// Run a subprocess command with a timeout.
///
/// Wraps `Command::output()` with `tokio::time::timeout`, converting
/// timeout expiration into a descriptive error message. The child process
/// is killed when the returned future is dropped at the timeout, via
/// tokio's `Child` drop implementation.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{description} failed: {io_err}")),
        Err(_elapsed) => Err(format!(
            "{description} timed out after {}s",
            timeout.as_secs()
        )),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
