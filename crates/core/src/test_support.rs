// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    CallerProfile, InputSchema, NetworkAccess, Priority, SkillDescriptor, SkillKind,
    TaskConfig, TaskEnvelope, TaskId, TaskSource, WorkerBackendKind, WorkerId, WorkerRecord,
};
use std::collections::HashMap;
use std::path::PathBuf;

pub const FAKE_EPOCH_MS: u64 = 1_700_000_000_000;

pub fn sample_task_config(goal: &str) -> TaskConfig {
    TaskConfig {
        source: TaskSource::UserChat,
        goal: goal.to_string(),
        user_id: "test-user".to_string(),
        platform: "telegram".to_string(),
        payload: HashMap::new(),
        priority: Priority::Normal,
        requires_reply: true,
    }
}

pub fn sample_task(id: &str, goal: &str) -> TaskEnvelope {
    TaskEnvelope::new(TaskId::new(id), sample_task_config(goal), FAKE_EPOCH_MS)
}

pub fn sample_cron_task(id: &str, goal: &str) -> TaskEnvelope {
    let mut cfg = sample_task_config(goal);
    cfg.source = TaskSource::Cron;
    cfg.requires_reply = false;
    TaskEnvelope::new(TaskId::new(id), cfg, FAKE_EPOCH_MS)
}

pub fn sample_worker(id: &str, name: &str) -> WorkerRecord {
    WorkerRecord::new(
        WorkerId::new(id),
        name,
        WorkerBackendKind::CoreAgent,
        PathBuf::from(format!("/data/userland/workers/{id}")),
        PathBuf::from(format!("/data/kernel/workers/{name}/SOUL.MD")),
    )
}

pub fn sample_shell_worker(id: &str, name: &str) -> WorkerRecord {
    WorkerRecord::new(
        WorkerId::new(id),
        name,
        WorkerBackendKind::Shell,
        PathBuf::from(format!("/data/userland/workers/{id}")),
        PathBuf::from(format!("/data/kernel/workers/{name}/SOUL.MD")),
    )
}

pub fn sample_skill(name: &str) -> SkillDescriptor {
    SkillDescriptor {
        name: name.to_string(),
        description: format!("test skill {name}"),
        kind: SkillKind::Learned,
        triggers: Vec::new(),
        input_schema: InputSchema::default(),
        declared_permissions: Vec::new(),
        network: NetworkAccess::None,
        timeout_secs: SkillDescriptor::default_timeout_secs(),
        entry_path: PathBuf::from(format!("skills/learned/{name}/SKILL.md")),
        workspace_path: PathBuf::from(format!("skills/learned/{name}")),
        source_mtime_ms: FAKE_EPOCH_MS,
    }
}

pub fn manager_profile() -> CallerProfile {
    CallerProfile::Manager
}

pub fn worker_profile(id: &str) -> CallerProfile {
    CallerProfile::Worker {
        worker_id: WorkerId::new(id),
    }
}
