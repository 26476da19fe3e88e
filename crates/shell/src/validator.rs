// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-scope `bash` allow-list enforcement.
//!
//! Every simple command anywhere in the parsed pipeline/list/subshell tree
//! must resolve to an allow-listed program name, and no word of any command
//! — allow-listed or not — may reference a sensitive path. The sensitive
//! check runs regardless of allow-list membership, so `cat .env` is denied
//! even though `cat` itself is permitted.

use crate::ast::CommandList;
use thiserror::Error;

/// Programs the worker-scope `bash` primitive may invoke.
pub const DEFAULT_ALLOWLIST: &[&str] = &[
    "docker",
    "curl",
    "netstat",
    "ss",
    "grep",
    "cat",
    "ls",
    "pwd",
    "sed",
    "awk",
    "head",
    "tail",
];

/// Path fragments that are denied as a command argument no matter which
/// program is invoked or whether that program is allow-listed.
const SENSITIVE_FRAGMENTS: &[&str] = &[".env", "secret", "password"];

#[derive(Debug, Clone)]
pub struct AllowlistConfig {
    pub allowed_programs: Vec<String>,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            allowed_programs: DEFAULT_ALLOWLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellGuardError {
    #[error("program not allow-listed for this worker: {0}")]
    ProgramNotAllowed(String),
    #[error("command references a sensitive path: {0}")]
    SensitivePath(String),
}

/// `docker compose` is two words forming one allow-listed invocation; we
/// special-case it since the allow-list otherwise operates on a single
/// program name per simple command.
fn is_docker_compose(name: &str, first_arg: Option<&str>) -> bool {
    name == "docker" && first_arg == Some("compose")
}

/// Check every simple command's program name against `config`. A parse
/// failure upstream is the caller's responsibility to treat as denied —
/// this function only judges a successfully parsed tree.
pub fn validate_allowlist(
    ast: &CommandList,
    config: &AllowlistConfig,
) -> Result<(), ShellGuardError> {
    for cmd in ast.all_simple_commands() {
        let allowed = config.allowed_programs.iter().any(|p| p == &cmd.name)
            || is_docker_compose(&cmd.name, cmd.args.first().map(String::as_str));
        if !allowed {
            return Err(ShellGuardError::ProgramNotAllowed(cmd.name.clone()));
        }
    }
    Ok(())
}

/// Check every word of every command (names and args alike) for sensitive
/// path fragments, regardless of `config`.
pub fn check_sensitive_paths(ast: &CommandList) -> Result<(), ShellGuardError> {
    for cmd in ast.all_simple_commands() {
        for word in cmd.words() {
            let lower = word.to_ascii_lowercase();
            if SENSITIVE_FRAGMENTS.iter().any(|frag| lower.contains(frag)) {
                return Err(ShellGuardError::SensitivePath(word.to_string()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
