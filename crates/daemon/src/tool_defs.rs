// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the JSON-schema [`ToolDefinition`] list handed to the LLM for one
//! orchestrator turn. Schemas here are descriptive only — the dispatcher
//! (`dispatcher.rs`) re-validates every field itself rather than trusting
//! the model to have honored the schema, matching how the Extension
//! Executor re-validates skill args against `input_schema` rather than
//! trusting the caller.

use serde_json::json;
use xbot_core::CallerProfile;
use xbot_engine::llm::ToolDefinition;
use xbot_engine::tool_access::{self, visible_tools};

fn schema_for(name: &str) -> serde_json::Value {
    match name {
        tool_access::READ => json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "start_line": {"type": "integer"},
                "max_lines": {"type": "integer"},
                "encoding": {"type": "string"}
            },
            "required": ["path"]
        }),
        tool_access::WRITE => json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "content": {"type": "string"},
                "mode": {"type": "string", "enum": ["create", "overwrite"]},
                "create_parents": {"type": "boolean"}
            },
            "required": ["path", "content"]
        }),
        tool_access::EDIT => json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "edits": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "match": {"type": "string"},
                            "replace": {"type": "string"},
                            "count": {"type": "integer"}
                        },
                        "required": ["match", "replace"]
                    }
                },
                "dry_run": {"type": "boolean"}
            },
            "required": ["path", "edits"]
        }),
        tool_access::BASH => json!({
            "type": "object",
            "properties": {
                "command": {"type": "string"},
                "cwd": {"type": "string"},
                "timeout_sec": {"type": "integer"}
            },
            "required": ["command"]
        }),
        tool_access::RUN_EXTENSION => json!({
            "type": "object",
            "properties": {
                "skill_name": {"type": "string"},
                "args": {"type": "object"}
            },
            "required": ["skill_name"]
        }),
        tool_access::LIST_EXTENSIONS => json!({"type": "object", "properties": {}}),
        tool_access::LIST_WORKERS => json!({"type": "object", "properties": {}}),
        tool_access::DISPATCH_WORKER => json!({
            "type": "object",
            "properties": {
                "worker_id": {"type": "string"},
                "instruction": {"type": "string"},
                "metadata": {"type": "object"}
            },
            "required": ["worker_id", "instruction"]
        }),
        tool_access::MEMORY_READ => json!({
            "type": "object",
            "properties": {
                "op": {"type": "string", "enum": ["open_nodes", "read_graph"]}
            },
            "required": ["op"]
        }),
        tool_access::MEMORY_WRITE => json!({
            "type": "object",
            "properties": {
                "op": {"type": "string", "enum": ["create_entities", "create_relations", "add_observations"]}
            },
            "required": ["op"]
        }),
        _ => json!({"type": "object"}),
    }
}

fn description_for(name: &str) -> &'static str {
    match name {
        tool_access::READ => "Read a UTF-8 text file, optionally a line range.",
        tool_access::WRITE => "Write a file, refusing to clobber an existing one unless mode=overwrite.",
        tool_access::EDIT => "Apply exact-match find/replace edits to an existing file.",
        tool_access::BASH => "Run a shell command with a bounded timeout.",
        tool_access::RUN_EXTENSION => "Invoke a learned or builtin skill by name.",
        tool_access::LIST_EXTENSIONS => "List skills available to run_extension.",
        tool_access::LIST_WORKERS => "List the Worker Fleet and each worker's status.",
        tool_access::DISPATCH_WORKER => "Dispatch one instruction to an idle worker and wait for its result.",
        tool_access::MEMORY_READ => "Read from the long-term memory graph (open_nodes or read_graph).",
        tool_access::MEMORY_WRITE => "Write to the long-term memory graph (create_entities, create_relations, add_observations).",
        _ => "",
    }
}

/// The tool list for one orchestrator turn, scoped to `profile` and
/// `memory_enabled` (memory tools are Manager-only regardless, but the
/// daemon-wide config can disable them even for the Manager when no MCP
/// memory service is configured).
pub fn tool_definitions(profile: &CallerProfile, memory_enabled: bool) -> Vec<ToolDefinition> {
    visible_tools(profile)
        .into_iter()
        .filter(|name| memory_enabled || (*name != tool_access::MEMORY_READ && *name != tool_access::MEMORY_WRITE))
        .map(|name| ToolDefinition {
            name: name.to_string(),
            description: description_for(name).to_string(),
            parameters: schema_for(name),
        })
        .collect()
}

#[cfg(test)]
#[path = "tool_defs_tests.rs"]
mod tests;
