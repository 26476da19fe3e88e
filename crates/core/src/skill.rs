// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill descriptors: the parsed shape of a `SKILL.md` file.
//!
//! A descriptor is pure data — parsing and hot-reload live in `xbot-engine`,
//! which is the only crate that needs to walk the filesystem. Keeping the
//! type here lets `xbot-core` stay the shared vocabulary every other crate
//! depends on without pulling in engine-side I/O.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Network egress a skill is allowed during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkAccess {
    #[default]
    None,
    Limited,
}

/// A single permission grant declared in a skill's frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillPermission {
    Shell,
    Network,
}

/// Resolved permission set for one skill, derived from its declared
/// `permissions` list. Filesystem roots are never declared — the Extension
/// Executor always pins them to the skill's own workspace plus the calling
/// user's `ext/<name>/` scratch directory, regardless of what the
/// descriptor asks for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub shell: bool,
    #[serde(default)]
    pub network: NetworkAccess,
}

impl Permissions {
    pub fn from_declared(perms: &[SkillPermission], network: NetworkAccess) -> Self {
        Self {
            shell: perms.contains(&SkillPermission::Shell),
            network,
        }
    }
}

/// One property of the draft-07 subset `input_schema` this crate validates
/// against (see `xbot-engine`'s schema validator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub r#enum: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub items: Option<Box<SchemaProperty>>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

/// A skill's `input_schema`: object type with named properties and a
/// required subset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(default)]
    pub properties: std::collections::BTreeMap<String, SchemaProperty>,
    #[serde(default)]
    pub required: Vec<String>,
}

/// Where a skill came from: builtin descriptors are loaded once at startup
/// and never rescanned; learned descriptors are re-read on mtime change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Builtin,
    Learned,
}

/// The parsed shape of one `SKILL.md` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDescriptor {
    pub name: String,
    pub description: String,
    pub kind: SkillKind,
    /// Free-text phrases the Manager's routing guidance mentions when
    /// deciding whether a goal matches this skill; not matched
    /// programmatically anywhere in this crate, since that judgment is the
    /// LLM's via `list_extensions`, not a keyword search.
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub input_schema: InputSchema,
    #[serde(default)]
    pub declared_permissions: Vec<SkillPermission>,
    #[serde(default)]
    pub network: NetworkAccess,
    /// Wall-clock timeout in seconds; defaults to 120, may be overridden up
    /// to 600 per-skill.
    #[serde(default = "SkillDescriptor::default_timeout_secs")]
    pub timeout_secs: u64,
    pub entry_path: PathBuf,
    pub workspace_path: PathBuf,
    /// Last-observed mtime (epoch ms) of the backing `SKILL.md`, used by the
    /// hot-reload watcher to decide whether a learned descriptor is stale.
    #[serde(default)]
    pub source_mtime_ms: u64,
}

impl SkillDescriptor {
    pub fn default_timeout_secs() -> u64 {
        120
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::from_declared(&self.declared_permissions, self.network)
    }

    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.min(600)
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self.kind, SkillKind::Learned)
    }
}

/// Failure modes raised while loading or validating a skill descriptor.
/// Execution-time failures (timeout, output cap) are reported as
/// `ToolObservation`s, not this type — this covers only load/parse/schema
/// problems that happen before the skill ever runs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SkillError {
    #[error("skill not found: {0}")]
    NotFound(String),
    #[error("frontmatter parse error in {path}: {reason}")]
    FrontmatterParse { path: String, reason: String },
    #[error("args failed schema validation: {0}")]
    SchemaValidation(String),
}

#[cfg(test)]
#[path = "skill_tests.rs"]
mod tests;
