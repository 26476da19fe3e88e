// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SOUL loading (§4.9): `SOUL.MD` is a canonical state file like any
//! other — its YAML payload carries one `text` field holding the prose the
//! Prompt Composer layers in, so editing a role's persona is the same
//! "edit the marker-delimited block" operation as editing settings.
//! Missing or unparsable files fall back to a baked-in default rather than
//! failing the turn outright, matching how a corrupt `settings.md` falls
//! back to defaults (§8 scenario 6) instead of blocking the caller.

use std::path::{Path, PathBuf};

const MANAGER_DEFAULT: &str = "\
You are the Core Manager: curious, concise, and you govern the fleet. \
Decide whether to answer directly or dispatch to a worker; never pretend \
a tool call happened that didn't.";

const WORKER_DEFAULT: &str = "\
You are a dispatched Worker: accept one instruction, execute it, and \
report a structured result. Never re-dispatch to another worker and never \
claim memory tools you don't have.";

pub fn manager_soul_path(data_dir: &Path) -> PathBuf {
    data_dir.join("kernel").join("core-manager").join("SOUL.MD")
}

pub fn worker_soul_path(data_dir: &Path, worker_name: &str) -> PathBuf {
    data_dir.join("kernel").join("workers").join(worker_name).join("SOUL.MD")
}

/// Load a SOUL file's `text` field, falling back to `default_text` when the
/// file is absent or unparsable under every tolerant-read variant.
pub fn load_soul(path: &Path, default_text: &str) -> String {
    if !path.exists() {
        return default_text.to_string();
    }
    match xbot_state::read_state(path) {
        Ok(payload) => payload
            .data
            .get("text")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| default_text.to_string()),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable soul file, using default");
            default_text.to_string()
        }
    }
}

pub fn load_manager_soul(data_dir: &Path) -> String {
    load_soul(&manager_soul_path(data_dir), MANAGER_DEFAULT)
}

pub fn load_worker_soul(data_dir: &Path, worker_name: &str) -> String {
    load_soul(&worker_soul_path(data_dir, worker_name), WORKER_DEFAULT)
}

#[cfg(test)]
#[path = "soul_tests.rs"]
mod tests;
