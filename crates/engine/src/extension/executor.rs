// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extension Executor (§4.5): look up → validate → permission-enforce →
//! subprocess-invoke → normalize. A skill can never crash the orchestrator;
//! every failure mode (missing, schema, timeout, output cap) comes back as
//! an `ok:false` `ToolObservation`, the same shape every other tool call
//! returns.

use super::loader::SkillLoader;
use super::schema::validate_args;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use xbot_adapters::subprocess::run_with_timeout;
use xbot_core::{ErrorCode, NetworkAccess, SkillDescriptor, ToolObservation};

/// Output is truncated at this many bytes (§4.5 step 4: 1 MB text).
const OUTPUT_CAP_BYTES: usize = 1024 * 1024;
/// At most this many emitted files are reported back (§4.5 step 4).
const MAX_FILES: usize = 10;
/// Each emitted file is capped at this size; larger files are dropped from
/// the normalized result rather than truncated, since a partial binary file
/// is worse than none.
const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// One file a skill left behind in its scratch directory, reported back to
/// the caller (§4.5 step 5).
#[derive(Debug, Clone, Serialize)]
pub struct OutputFile {
    pub path: PathBuf,
    pub mime: String,
}

/// Normalized result of one extension invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionOutcome {
    pub ok: bool,
    pub skill_name: String,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<OutputFile>,
}

impl ExtensionOutcome {
    pub fn into_observation(self) -> ToolObservation {
        if self.ok {
            ToolObservation::ok_with_summary(
                json!({
                    "skill_name": self.skill_name,
                    "result": self.result,
                    "ui": self.ui,
                    "files": self.files.iter().map(|f| json!({"path": f.path, "mime": f.mime})).collect::<Vec<_>>(),
                }),
                self.result.lines().next().unwrap_or("").to_string(),
            )
        } else {
            ToolObservation::err(ErrorCode::ExecFailure, self.result)
        }
    }
}

pub struct ExtensionExecutor {
    loader: Arc<SkillLoader>,
    /// Parent of `data/users/<uid>/ext/<name>/` scratch directories.
    data_dir: PathBuf,
}

impl ExtensionExecutor {
    pub fn new(loader: Arc<SkillLoader>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            data_dir: data_dir.into(),
        }
    }

    /// Execute `skill_name` with `args` on behalf of `user_id`. Never
    /// returns `Err` — every failure mode is folded into `ExtensionOutcome`.
    pub async fn run(&self, user_id: &str, skill_name: &str, args: &Value) -> ExtensionOutcome {
        let descriptor = match self.loader.get(skill_name) {
            Some(d) => d,
            None => {
                return ExtensionOutcome {
                    ok: false,
                    skill_name: skill_name.to_string(),
                    result: format!("unknown skill: {skill_name}"),
                    ui: None,
                    files: Vec::new(),
                }
            }
        };

        if let Err(err) = validate_args(args, &descriptor.input_schema) {
            return ExtensionOutcome {
                ok: false,
                skill_name: descriptor.name.clone(),
                result: err.to_string(),
                ui: None,
                files: Vec::new(),
            };
        }

        let scratch_dir = self
            .data_dir
            .join("users")
            .join(user_id)
            .join("ext")
            .join(&descriptor.name);
        if let Err(err) = std::fs::create_dir_all(&scratch_dir) {
            return ExtensionOutcome {
                ok: false,
                skill_name: descriptor.name.clone(),
                result: format!("could not prepare scratch directory: {err}"),
                ui: None,
                files: Vec::new(),
            };
        }

        self.invoke(&descriptor, args, &scratch_dir).await
    }

    async fn invoke(
        &self,
        descriptor: &SkillDescriptor,
        args: &Value,
        scratch_dir: &std::path::Path,
    ) -> ExtensionOutcome {
        let mut cmd = Command::new(&descriptor.entry_path);
        cmd.current_dir(&descriptor.workspace_path);
        cmd.env("XBOT_SKILL_WORKSPACE", &descriptor.workspace_path);
        cmd.env("XBOT_SKILL_SCRATCH", scratch_dir);
        cmd.env("XBOT_SKILL_ARGS", args.to_string());
        if descriptor.network == NetworkAccess::None {
            // No shell-level sandbox is assumed here; the absence of a
            // declared network permission is enforced by convention at the
            // skill-authoring boundary, matching the Tool Registry's
            // allow-list model rather than a kernel-level sandbox.
            cmd.env("XBOT_SKILL_NETWORK", "none");
        } else {
            cmd.env("XBOT_SKILL_NETWORK", "limited");
        }
        if !descriptor.permissions().shell {
            cmd.env("XBOT_SKILL_NO_SHELL", "1");
        }

        let timeout = Duration::from_secs(descriptor.effective_timeout_secs());
        let outcome = match run_with_timeout(cmd, timeout, &descriptor.name).await {
            Ok(output) if output.status.success() => {
                let result = truncate(output.stdout);
                ExtensionOutcome {
                    ok: true,
                    skill_name: descriptor.name.clone(),
                    result,
                    ui: None,
                    files: collect_files(scratch_dir),
                }
            }
            Ok(output) => {
                let stderr = truncate(output.stderr);
                ExtensionOutcome {
                    ok: false,
                    skill_name: descriptor.name.clone(),
                    result: format!("skill exited with {:?}: {stderr}", output.status.code()),
                    ui: None,
                    files: Vec::new(),
                }
            }
            Err(message) => ExtensionOutcome {
                ok: false,
                skill_name: descriptor.name.clone(),
                result: message,
                ui: None,
                files: Vec::new(),
            },
        };
        outcome
    }
}

fn truncate(bytes: Vec<u8>) -> String {
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if text.len() > OUTPUT_CAP_BYTES {
        let mut truncated: String = text.chars().take(OUTPUT_CAP_BYTES).collect();
        truncated.push_str("\n...[truncated]");
        truncated
    } else {
        text
    }
}

fn collect_files(scratch_dir: &std::path::Path) -> Vec<OutputFile> {
    let Ok(entries) = std::fs::read_dir(scratch_dir) else {
        return Vec::new();
    };
    let mut files = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        if files.len() >= MAX_FILES {
            break;
        }
        let path = entry.path();
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() || metadata.len() > MAX_FILE_BYTES {
            continue;
        }
        let mime = mime_guess(&path);
        files.push(OutputFile { path, mime });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn mime_guess(path: &std::path::Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("md") => "text/markdown",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
