// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use crate::llm::fake::FakeLlmClient;
use crate::tool_access::{DISPATCH_WORKER, READ, RUN_EXTENSION};
use serde_json::json;
use xbot_core::test_support::worker_profile;

struct EchoDispatcher;

#[async_trait]
impl ToolDispatcher for EchoDispatcher {
    async fn dispatch(&self, _profile: &CallerProfile, name: &str, args: Value) -> ToolObservation {
        ToolObservation::ok_with_summary(json!({ "tool": name, "args": args }), "ok")
    }
}

/// Stands in for the Extension Executor: a `run_extension` call succeeds
/// and reports one emitted file, matching the shape
/// `ExtensionOutcome::into_observation` produces.
struct FileEmittingDispatcher;

#[async_trait]
impl ToolDispatcher for FileEmittingDispatcher {
    async fn dispatch(&self, _profile: &CallerProfile, name: &str, _args: Value) -> ToolObservation {
        ToolObservation::ok_with_summary(
            json!({
                "skill_name": "download_video",
                "result": "downloaded",
                "ui": null,
                "files": [{"path": "/tmp/video.mp4", "mime": "video/mp4"}],
            }),
            name,
        )
    }
}

struct AlwaysFailDispatcher;

#[async_trait]
impl ToolDispatcher for AlwaysFailDispatcher {
    async fn dispatch(&self, _profile: &CallerProfile, _name: &str, _args: Value) -> ToolObservation {
        ToolObservation::err(ErrorCode::NotFound, "still missing")
    }
}

fn read_tool() -> ToolDefinition {
    ToolDefinition {
        name: READ.to_string(),
        description: "read a file".to_string(),
        parameters: json!({"type": "object"}),
    }
}

#[tokio::test]
async fn terminal_text_reply_ends_the_loop() {
    let llm = FakeLlmClient::new();
    llm.push_text("all done");
    let dispatcher = EchoDispatcher;
    let orchestrator = Orchestrator::new(&llm, &dispatcher, CallerProfile::Manager, vec![read_tool()]);

    let outcome = orchestrator
        .run("system", vec![], &CancellationToken::new())
        .await
        .unwrap();
    assert!(matches!(outcome, TurnLoopOutcome::Replied { text, .. } if text == "all done"));
}

#[tokio::test]
async fn one_tool_call_then_text_completes_in_two_model_calls() {
    let llm = FakeLlmClient::new();
    llm.push_function_call("read", json!({"path": "f.md"}));
    llm.push_text("read it, done");
    let dispatcher = EchoDispatcher;
    let orchestrator = Orchestrator::new(&llm, &dispatcher, CallerProfile::Manager, vec![read_tool()]);

    let outcome = orchestrator
        .run("system", vec![], &CancellationToken::new())
        .await
        .unwrap();
    assert!(matches!(outcome, TurnLoopOutcome::Replied { .. }));
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn circuit_breaker_trips_on_three_identical_calls() {
    let llm = FakeLlmClient::new();
    for _ in 0..5 {
        llm.push_function_call("read", json!({"path": "f.md"}));
    }
    let dispatcher = AlwaysFailDispatcher;
    let orchestrator = Orchestrator::new(&llm, &dispatcher, CallerProfile::Manager, vec![read_tool()]);

    let outcome = orchestrator
        .run("system", vec![], &CancellationToken::new())
        .await
        .unwrap();
    assert!(matches!(outcome, TurnLoopOutcome::LoopDetected));
    assert_eq!(llm.call_count(), 3);
}

#[tokio::test]
async fn turn_budget_exhausted_after_max_turns_of_tool_calls() {
    let llm = FakeLlmClient::new();
    for i in 0..(MAX_TURNS + 2) {
        llm.push_function_call("read", json!({"path": format!("f{i}.md")}));
    }
    let dispatcher = EchoDispatcher;
    let orchestrator = Orchestrator::new(&llm, &dispatcher, CallerProfile::Manager, vec![read_tool()]);

    let outcome = orchestrator
        .run("system", vec![], &CancellationToken::new())
        .await
        .unwrap();
    assert!(matches!(outcome, TurnLoopOutcome::TurnBudgetExhausted));
}

#[tokio::test]
async fn cancellation_is_observed_between_turns() {
    let llm = FakeLlmClient::new();
    llm.push_function_call("read", json!({"path": "f.md"}));
    llm.push_text("should never be reached");
    let dispatcher = EchoDispatcher;
    let orchestrator = Orchestrator::new(&llm, &dispatcher, CallerProfile::Manager, vec![read_tool()]);

    let token = CancellationToken::new();
    token.cancel();
    let outcome = orchestrator.run("system", vec![], &token).await.unwrap();
    assert!(matches!(outcome, TurnLoopOutcome::Cancelled));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn worker_profile_never_sees_manager_only_tools() {
    let llm = FakeLlmClient::new();
    let dispatcher = EchoDispatcher;
    let dispatch_tool = ToolDefinition {
        name: DISPATCH_WORKER.to_string(),
        description: "dispatch a worker".to_string(),
        parameters: json!({"type": "object"}),
    };
    let orchestrator = Orchestrator::new(
        &llm,
        &dispatcher,
        worker_profile("w-1"),
        vec![read_tool(), dispatch_tool],
    );

    assert_eq!(orchestrator.tools.len(), 1, "dispatch_worker must be filtered out of a worker's tool list");
    assert_eq!(orchestrator.tools[0].name, READ);
}

#[tokio::test]
async fn denied_tool_call_is_surfaced_as_unauthorized_without_ending_the_loop() {
    let llm = FakeLlmClient::new();
    // The model tries to call a Manager-only tool despite running as a
    // Worker; the dispatcher-side check in `dispatch_one` must still deny
    // it even though it was never advertised in the tools list.
    llm.push_function_call(DISPATCH_WORKER, json!({"worker_id": "w-2"}));
    llm.push_text("done");
    let dispatcher = EchoDispatcher;
    let orchestrator = Orchestrator::new(&llm, &dispatcher, worker_profile("w-1"), vec![]);

    let outcome = orchestrator
        .run("system", vec![], &CancellationToken::new())
        .await
        .unwrap();
    assert!(matches!(outcome, TurnLoopOutcome::Replied { .. }));
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn files_from_a_successful_run_extension_call_surface_on_the_reply() {
    let llm = FakeLlmClient::new();
    llm.push_function_call(
        RUN_EXTENSION,
        json!({"skill_name": "download_video", "args": {"url": "https://example.com/video.mp4"}}),
    );
    llm.push_text("downloaded it");
    let dispatcher = FileEmittingDispatcher;
    let extension_tool = ToolDefinition {
        name: RUN_EXTENSION.to_string(),
        description: "run a skill".to_string(),
        parameters: json!({"type": "object"}),
    };
    let orchestrator = Orchestrator::new(&llm, &dispatcher, CallerProfile::Manager, vec![extension_tool]);

    let outcome = orchestrator
        .run("system", vec![], &CancellationToken::new())
        .await
        .unwrap();
    match outcome {
        TurnLoopOutcome::Replied { text, files } => {
            assert_eq!(text, "downloaded it");
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].path, std::path::PathBuf::from("/tmp/video.mp4"));
            assert_eq!(files[0].mime, "video/mp4");
        }
        other => panic!("expected Replied, got {other:?}"),
    }
}
