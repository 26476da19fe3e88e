// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt Composer & SOUL (§4.9): layers base policy, role SOUL, memory
//! guidance, and tool-usage hints into the single system-prompt string
//! handed to the LLM for one orchestrator turn.

use xbot_core::CallerProfile;

/// Hard cap on the composed system prompt (§4.9: "emits a single string
/// <=2 KB").
pub const MAX_PROMPT_BYTES: usize = 2048;

const BASE_POLICY: &str = "\
You are xbot, an autonomous agent. Use the available tools to accomplish \
the stated goal. Prefer the smallest action that makes progress. Never \
fabricate tool results; if a tool call fails, report the failure instead \
of guessing at its outcome.";

const MANAGER_TOOL_HINTS: &str = "\
Tools: read, write, edit, bash, run_extension, list_extensions, \
list_workers, dispatch_worker, and memory tools (when enabled). Dispatch \
to a worker rather than doing multi-step external work yourself when a \
capable idle worker exists.";

const WORKER_TOOL_HINTS: &str = "\
Tools: read, write, edit, bash (restricted to an allow-listed program \
set), run_extension, list_extensions. You cannot dispatch other workers \
or access memory tools.";

const MEMORY_GUIDANCE: &str = "\
Memory: use open_nodes/read_graph to recall prior context before asking \
the user to repeat themselves; use create_entities/create_relations/ \
add_observations to record durable facts, not transient task state.";

/// Composes the system prompt for one orchestrator turn.
///
/// `manager_soul`/`worker_soul` is the relevant SOUL.MD body (loaded
/// through the State Store like any other canonical file) for the given
/// `profile`; `memory_enabled` gates whether memory guidance is included
/// at all, since Workers never see memory tools regardless.
pub fn compose_system_prompt(profile: &CallerProfile, soul: &str, memory_enabled: bool) -> String {
    let mut sections = vec![BASE_POLICY.to_string(), soul.trim().to_string()];

    if profile.is_manager() && memory_enabled {
        sections.push(MEMORY_GUIDANCE.to_string());
    }

    let tool_hints = if profile.is_manager() {
        MANAGER_TOOL_HINTS
    } else {
        WORKER_TOOL_HINTS
    };
    sections.push(tool_hints.to_string());

    let mut prompt = sections.join("\n\n");
    if prompt.len() > MAX_PROMPT_BYTES {
        let mut cut = MAX_PROMPT_BYTES;
        while !prompt.is_char_boundary(cut) {
            cut -= 1;
        }
        prompt.truncate(cut);
    }
    prompt
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
