// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tool_access_store`: gates which tool names a given [`CallerProfile`] may
//! invoke, before the call ever reaches a primitive or the Extension
//! Executor (§4.4). This is a pure lookup with no I/O, so it lives ahead of
//! dispatch rather than inside each tool.

use xbot_core::CallerProfile;

/// The four primitives plus the gated tools named in §4, as the tool
/// registry presents them to the model.
pub const READ: &str = "read";
pub const WRITE: &str = "write";
pub const EDIT: &str = "edit";
pub const BASH: &str = "bash";
pub const RUN_EXTENSION: &str = "run_extension";
pub const LIST_EXTENSIONS: &str = "list_extensions";
pub const LIST_WORKERS: &str = "list_workers";
pub const DISPATCH_WORKER: &str = "dispatch_worker";
pub const MEMORY_READ: &str = "memory_read";
pub const MEMORY_WRITE: &str = "memory_write";

const ALWAYS_AVAILABLE: &[&str] = &[READ, WRITE, EDIT, BASH, RUN_EXTENSION, LIST_EXTENSIONS];
const MANAGER_ONLY: &[&str] = &[LIST_WORKERS, DISPATCH_WORKER, MEMORY_READ, MEMORY_WRITE];

/// Returns `true` when `profile` is allowed to call `tool_name`. Unknown
/// tool names are rejected here too — the registry only ever advertises
/// names it also approves, so an unknown name reaching this check is
/// already a bug upstream, not a permission question.
pub fn is_tool_allowed(profile: &CallerProfile, tool_name: &str) -> bool {
    if ALWAYS_AVAILABLE.contains(&tool_name) {
        return true;
    }
    if MANAGER_ONLY.contains(&tool_name) {
        return profile.is_manager();
    }
    false
}

/// The full set of tool names visible to `profile`, in registry order —
/// used to build the `tools` list handed to the LLM for a given turn.
pub fn visible_tools(profile: &CallerProfile) -> Vec<&'static str> {
    let mut tools: Vec<&'static str> = ALWAYS_AVAILABLE.to_vec();
    if profile.is_manager() {
        tools.extend_from_slice(MANAGER_ONLY);
    }
    tools
}

#[cfg(test)]
#[path = "tool_access_tests.rs"]
mod tests;
