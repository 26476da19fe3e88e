// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill Loader (§4.5a): walks `skills/{builtin,learned}/*/SKILL.md` and
//! builds an in-memory descriptor cache. Builtins are loaded once by
//! [`SkillLoader::discover`] and never revisited; [`SkillLoader::reload_learned`]
//! is the only thing that ever touches the learned half of the cache,
//! which structurally enforces "only learned skills are mutable at
//! runtime" rather than leaving it to convention.

use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use xbot_core::{InputSchema, NetworkAccess, SkillDescriptor, SkillError, SkillKind, SkillPermission};

/// Frontmatter shape of one `SKILL.md`, parsed via the same tolerant
/// reader the State Store uses for canonical files (§4.5a).
#[derive(Debug, Deserialize)]
struct RawFrontmatter {
    name: String,
    description: String,
    #[serde(default)]
    triggers: Vec<String>,
    #[serde(default)]
    input_schema: InputSchema,
    #[serde(default)]
    permissions: RawPermissions,
    entrypoint: String,
    #[serde(default = "SkillDescriptor::default_timeout_secs")]
    timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
struct RawPermissions {
    #[serde(default)]
    shell: bool,
    #[serde(default)]
    network: NetworkAccess,
}

/// In-memory descriptor cache, keyed by skill name.
pub struct SkillLoader {
    skills_dir: PathBuf,
    descriptors: RwLock<HashMap<String, SkillDescriptor>>,
}

impl SkillLoader {
    pub fn new(skills_dir: impl Into<PathBuf>) -> Self {
        Self {
            skills_dir: skills_dir.into(),
            descriptors: RwLock::new(HashMap::new()),
        }
    }

    /// Walk both `builtin/` and `learned/` once, at startup. Returns the
    /// number of descriptors loaded.
    pub fn discover(&self) -> usize {
        self.scan_kind(SkillKind::Builtin) + self.scan_kind(SkillKind::Learned)
    }

    /// Re-walk only `learned/`, replacing cached descriptors whose backing
    /// file's mtime has advanced. Call on the scheduler's reconciliation
    /// cadence (§4.5a).
    pub fn reload_learned(&self) -> usize {
        self.scan_kind(SkillKind::Learned)
    }

    pub fn get(&self, name: &str) -> Option<SkillDescriptor> {
        self.descriptors.read().get(name).cloned()
    }

    /// All cached descriptors, sorted by name for stable `list_extensions`
    /// output.
    pub fn list(&self) -> Vec<SkillDescriptor> {
        let mut all: Vec<SkillDescriptor> = self.descriptors.read().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    fn scan_kind(&self, kind: SkillKind) -> usize {
        let dir_name = match kind {
            SkillKind::Builtin => "builtin",
            SkillKind::Learned => "learned",
        };
        let base = self.skills_dir.join(dir_name);
        let Ok(entries) = std::fs::read_dir(&base) else {
            return 0;
        };

        let mut loaded = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let workspace = entry.path();
            if !workspace.is_dir() {
                continue;
            }
            let skill_md = workspace.join("SKILL.md");
            match load_descriptor(&skill_md, &workspace, kind) {
                Ok(descriptor) => {
                    let mut guard = self.descriptors.write();
                    let stale = match guard.get(&descriptor.name) {
                        Some(existing) => existing.source_mtime_ms != descriptor.source_mtime_ms,
                        None => true,
                    };
                    if stale {
                        guard.insert(descriptor.name.clone(), descriptor);
                        loaded += 1;
                    }
                }
                Err(SkillError::NotFound(_)) => {} // no SKILL.md in this directory; not an error
                Err(err) => {
                    tracing::warn!(path = %skill_md.display(), error = %err, "dropping skill with unparseable frontmatter");
                }
            }
        }
        loaded
    }
}

fn load_descriptor(
    skill_md: &Path,
    workspace: &Path,
    kind: SkillKind,
) -> Result<SkillDescriptor, SkillError> {
    if !skill_md.exists() {
        return Err(SkillError::NotFound(skill_md.display().to_string()));
    }
    let content = std::fs::read_to_string(skill_md).map_err(|e| SkillError::FrontmatterParse {
        path: skill_md.display().to_string(),
        reason: e.to_string(),
    })?;
    let (value, _source_kind) =
        xbot_state::parse_tolerant(&content).ok_or_else(|| SkillError::FrontmatterParse {
            path: skill_md.display().to_string(),
            reason: "no recognizable frontmatter variant".to_string(),
        })?;
    let raw: RawFrontmatter =
        serde_json::from_value(value).map_err(|e| SkillError::FrontmatterParse {
            path: skill_md.display().to_string(),
            reason: e.to_string(),
        })?;

    let mtime_ms = std::fs::metadata(skill_md)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut declared_permissions = Vec::new();
    if raw.permissions.shell {
        declared_permissions.push(SkillPermission::Shell);
    }
    if raw.permissions.network != NetworkAccess::None {
        declared_permissions.push(SkillPermission::Network);
    }

    Ok(SkillDescriptor {
        name: raw.name,
        description: raw.description,
        kind,
        triggers: raw.triggers,
        input_schema: raw.input_schema,
        declared_permissions,
        network: raw.permissions.network,
        timeout_secs: raw.timeout_secs,
        entry_path: workspace.join(&raw.entrypoint),
        workspace_path: workspace.to_path_buf(),
        source_mtime_ms: mtime_ms,
    })
}

#[cfg(test)]
impl SkillLoader {
    /// Insert a descriptor directly, bypassing filesystem discovery — used
    /// by executor tests that only need `get`/`list` to return a fixed
    /// descriptor without writing a real `SKILL.md`.
    pub(crate) fn insert_for_test(&self, descriptor: SkillDescriptor) {
        self.descriptors
            .write()
            .insert(descriptor.name.clone(), descriptor);
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
