// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `CoreToolDispatcher`: the single [`ToolDispatcher`] implementation that
//! routes a named tool call, gated already by `CallerProfile`, to whichever
//! concrete subsystem owns it (§4.4-§4.6). One instance is built per task
//! (it closes over the task's `user_id`, which the orchestrator's dispatch
//! signature doesn't carry) and shares the daemon's long-lived stores.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use xbot_adapters::cli_backend::{CliFlavor, CliWorkerBackend};
use xbot_adapters::WorkerBackend;
use xbot_core::{CallerProfile, Clock, ErrorCode, IdGen, ToolObservation, WorkerBackendKind, WorkerId};
use xbot_engine::extension::{ExtensionExecutor, SkillLoader};
use xbot_engine::memory::{MemoryClient, MemoryReadOp, MemoryWriteOp};
use xbot_engine::orchestrator::ToolDispatcher;
use xbot_engine::primitives::{self, PrimitiveContext};
use xbot_engine::tool_access;
use xbot_engine::worker_runtime::{dispatch_worker, WorkerStore};

/// Backend table the dispatcher picks from by [`WorkerBackendKind`]. Each
/// variant is `Arc`'d independently since `core-agent` is generic over the
/// configured LLM client while the other three are not.
pub struct BackendTable {
    pub core_agent: Arc<dyn WorkerBackend>,
    pub shell: Arc<dyn WorkerBackend>,
    pub codex: Arc<dyn WorkerBackend>,
    pub gemini_cli: Arc<dyn WorkerBackend>,
}

impl BackendTable {
    pub fn new(core_agent: Arc<dyn WorkerBackend>, shell: Arc<dyn WorkerBackend>) -> Self {
        Self {
            core_agent,
            shell,
            codex: Arc::new(CliWorkerBackend::new(CliFlavor::Codex)),
            gemini_cli: Arc::new(CliWorkerBackend::new(CliFlavor::GeminiCli)),
        }
    }

    fn pick(&self, kind: WorkerBackendKind) -> &Arc<dyn WorkerBackend> {
        match kind {
            WorkerBackendKind::CoreAgent => &self.core_agent,
            WorkerBackendKind::Shell => &self.shell,
            WorkerBackendKind::Codex => &self.codex,
            WorkerBackendKind::GeminiCli => &self.gemini_cli,
        }
    }
}

pub struct CoreToolDispatcher<C: Clock, I: IdGen> {
    user_id: String,
    data_dir: std::path::PathBuf,
    primitive_ctx: PrimitiveContext,
    extensions: Arc<ExtensionExecutor>,
    skills: Arc<SkillLoader>,
    worker_store: Arc<WorkerStore>,
    backends: Arc<BackendTable>,
    memory: Option<Arc<dyn MemoryClient>>,
    clock: C,
    id_gen: I,
}

impl<C: Clock, I: IdGen> CoreToolDispatcher<C, I> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        data_dir: impl Into<std::path::PathBuf>,
        primitive_ctx: PrimitiveContext,
        extensions: Arc<ExtensionExecutor>,
        skills: Arc<SkillLoader>,
        worker_store: Arc<WorkerStore>,
        backends: Arc<BackendTable>,
        memory: Option<Arc<dyn MemoryClient>>,
        clock: C,
        id_gen: I,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            data_dir: data_dir.into(),
            primitive_ctx,
            extensions,
            skills,
            worker_store,
            backends,
            memory,
            clock,
            id_gen,
        }
    }

    async fn dispatch_read(&self, args: Value) -> ToolObservation {
        let Some(path) = args.get("path").and_then(|v| v.as_str()) else {
            return ToolObservation::err(ErrorCode::InvalidInput, "missing path");
        };
        let start_line = args.get("start_line").and_then(|v| v.as_u64()).map(|n| n as usize);
        let max_lines = args.get("max_lines").and_then(|v| v.as_u64()).map(|n| n as usize);
        let encoding = args.get("encoding").and_then(|v| v.as_str());
        primitives::read(&self.primitive_ctx, path, start_line, max_lines, encoding).await
    }

    async fn dispatch_write(&self, args: Value) -> ToolObservation {
        let Some(path) = args.get("path").and_then(|v| v.as_str()) else {
            return ToolObservation::err(ErrorCode::InvalidInput, "missing path");
        };
        let Some(content) = args.get("content").and_then(|v| v.as_str()) else {
            return ToolObservation::err(ErrorCode::InvalidInput, "missing content");
        };
        let mode = match args.get("mode").and_then(|v| v.as_str()) {
            Some("create") | None => primitives::WriteMode::Create,
            Some("overwrite") => primitives::WriteMode::Overwrite,
            Some(other) => {
                return ToolObservation::err(ErrorCode::InvalidInput, format!("unknown mode: {other}"))
            }
        };
        let create_parents = args
            .get("create_parents")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        primitives::write(&self.primitive_ctx, path, content, mode, create_parents).await
    }

    async fn dispatch_edit(&self, args: Value) -> ToolObservation {
        let Some(path) = args.get("path").and_then(|v| v.as_str()) else {
            return ToolObservation::err(ErrorCode::InvalidInput, "missing path");
        };
        let edits: Vec<primitives::EditOp> = match args.get("edits").cloned() {
            Some(v) => match serde_json::from_value(v) {
                Ok(edits) => edits,
                Err(err) => {
                    return ToolObservation::err(ErrorCode::Schema, format!("invalid edits: {err}"))
                }
            },
            None => return ToolObservation::err(ErrorCode::InvalidInput, "missing edits"),
        };
        let dry_run = args.get("dry_run").and_then(|v| v.as_bool()).unwrap_or(false);
        primitives::edit(&self.primitive_ctx, path, &edits, dry_run).await
    }

    async fn dispatch_bash(&self, args: Value) -> ToolObservation {
        let Some(command) = args.get("command").and_then(|v| v.as_str()) else {
            return ToolObservation::err(ErrorCode::InvalidInput, "missing command");
        };
        let cwd = args.get("cwd").and_then(|v| v.as_str());
        let timeout_sec = args.get("timeout_sec").and_then(|v| v.as_u64());
        primitives::bash(&self.primitive_ctx, command, cwd, timeout_sec).await
    }

    async fn dispatch_run_extension(&self, args: Value) -> ToolObservation {
        let Some(skill_name) = args.get("skill_name").and_then(|v| v.as_str()) else {
            return ToolObservation::err(ErrorCode::InvalidInput, "missing skill_name");
        };
        let skill_args = args.get("args").cloned().unwrap_or(Value::Null);
        self.extensions
            .run(&self.user_id, skill_name, &skill_args)
            .await
            .into_observation()
    }

    fn dispatch_list_extensions(&self) -> ToolObservation {
        let names: Vec<Value> = self
            .skills
            .list()
            .into_iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "description": d.description,
                    "triggers": d.triggers,
                })
            })
            .collect();
        ToolObservation::ok(serde_json::json!({ "extensions": names }))
    }

    fn dispatch_list_workers(&self) -> ToolObservation {
        let workers: Vec<Value> = self
            .worker_store
            .list()
            .into_iter()
            .map(|w| {
                serde_json::json!({
                    "worker_id": w.worker_id,
                    "name": w.name,
                    "backend": w.backend.to_string(),
                    "status": w.status,
                    "capabilities": w.capabilities,
                })
            })
            .collect();
        ToolObservation::ok(serde_json::json!({ "workers": workers }))
    }

    async fn dispatch_worker_call(&self, args: Value) -> ToolObservation {
        let Some(worker_id) = args.get("worker_id").and_then(|v| v.as_str()) else {
            return ToolObservation::err(ErrorCode::InvalidInput, "missing worker_id");
        };
        let Some(instruction) = args.get("instruction").and_then(|v| v.as_str()) else {
            return ToolObservation::err(ErrorCode::InvalidInput, "missing instruction");
        };
        let worker_id = WorkerId::from(worker_id);
        let Some(record) = self.worker_store.get(&worker_id) else {
            return ToolObservation::err(ErrorCode::NotFound, format!("unknown worker {worker_id}"));
        };
        let metadata: HashMap<String, Value> = args
            .get("metadata")
            .and_then(|v| v.as_object())
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let backend = self.backends.pick(record.backend);
        let on_progress: &xbot_engine::worker_runtime::ProgressSink = &|_msg| {};
        let outcome = dispatch_worker(
            self.worker_store.as_ref(),
            backend.as_ref(),
            &self.clock,
            &self.id_gen,
            &self.data_dir,
            &worker_id,
            instruction,
            metadata,
            on_progress,
        )
        .await;

        match outcome {
            Ok(xbot_adapters::WorkerOutcome::Done { summary }) => {
                ToolObservation::ok_with_summary(serde_json::json!({ "summary": summary }), summary)
            }
            Ok(xbot_adapters::WorkerOutcome::Failed { error }) => {
                ToolObservation::err(ErrorCode::ExecFailure, error)
            }
            Err(err) => ToolObservation::err(ErrorCode::ExecFailure, err.to_string()),
        }
    }

    async fn dispatch_memory_read(&self, args: Value) -> ToolObservation {
        let Some(memory) = &self.memory else {
            return ToolObservation::err(ErrorCode::McpUnavailable, "memory service not configured");
        };
        let op = match args.get("op").and_then(|v| v.as_str()) {
            Some("open_nodes") => MemoryReadOp::OpenNodes,
            Some("read_graph") => MemoryReadOp::ReadGraph,
            Some(other) => {
                return ToolObservation::err(ErrorCode::InvalidInput, format!("unknown memory_read op: {other}"))
            }
            None => return ToolObservation::err(ErrorCode::InvalidInput, "missing op"),
        };
        match memory.read(op, args).await {
            Ok(result) => ToolObservation::ok(result),
            Err(err) => ToolObservation::err(ErrorCode::McpUnavailable, err.to_string()),
        }
    }

    async fn dispatch_memory_write(&self, args: Value) -> ToolObservation {
        let Some(memory) = &self.memory else {
            return ToolObservation::err(ErrorCode::McpUnavailable, "memory service not configured");
        };
        let op = match args.get("op").and_then(|v| v.as_str()) {
            Some("create_entities") => MemoryWriteOp::CreateEntities,
            Some("create_relations") => MemoryWriteOp::CreateRelations,
            Some("add_observations") => MemoryWriteOp::AddObservations,
            Some(other) => {
                return ToolObservation::err(ErrorCode::InvalidInput, format!("unknown memory_write op: {other}"))
            }
            None => return ToolObservation::err(ErrorCode::InvalidInput, "missing op"),
        };
        match memory.write(op, args).await {
            Ok(result) => ToolObservation::ok(result),
            Err(err) => ToolObservation::err(ErrorCode::McpUnavailable, err.to_string()),
        }
    }
}

#[async_trait]
impl<C: Clock, I: IdGen> ToolDispatcher for CoreToolDispatcher<C, I> {
    async fn dispatch(&self, _profile: &CallerProfile, name: &str, args: Value) -> ToolObservation {
        match name {
            tool_access::READ => self.dispatch_read(args).await,
            tool_access::WRITE => self.dispatch_write(args).await,
            tool_access::EDIT => self.dispatch_edit(args).await,
            tool_access::BASH => self.dispatch_bash(args).await,
            tool_access::RUN_EXTENSION => self.dispatch_run_extension(args).await,
            tool_access::LIST_EXTENSIONS => self.dispatch_list_extensions(),
            tool_access::LIST_WORKERS => self.dispatch_list_workers(),
            tool_access::DISPATCH_WORKER => self.dispatch_worker_call(args).await,
            tool_access::MEMORY_READ => self.dispatch_memory_read(args).await,
            tool_access::MEMORY_WRITE => self.dispatch_memory_write(args).await,
            other => ToolObservation::err(ErrorCode::NotFound, format!("unknown tool: {other}")),
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
