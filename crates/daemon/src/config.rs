// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Config::load()` (§4.12): reads the environment exactly once, at
//! startup, and is handed down as an `Arc<Config>` from then on. No
//! component below the daemon touches `std::env` directly — tests build a
//! `Config` by hand against a `tempfile::TempDir` instead.

use std::path::PathBuf;

use crate::error::XbotError;

/// Every environment variable the daemon reads, per §6's External
/// Interfaces list.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of all durable state; every canonical file, the worker fleet,
    /// and the skill tree live under here.
    pub data_dir: PathBuf,
    pub mcp_memory_enabled: bool,
    pub max_turns: u32,
    pub task_timeout_secs: u64,
    /// When `false`, the Manager answers every `user_chat` task itself
    /// instead of routing to a worker.
    pub dispatch_model_routing: bool,
    /// Root a worker deployment stages files under before promoting them
    /// live; backend-specific, so this is just passed through to whatever
    /// consumes it.
    pub deployment_staging_path: Option<PathBuf>,
    pub log_path: PathBuf,
}

impl Config {
    /// Read and validate configuration from the process environment.
    /// `DATA_DIR` is the only required variable; everything else has the
    /// default named in §6.
    pub fn load() -> Result<Self, XbotError> {
        let data_dir = std::env::var("DATA_DIR")
            .map_err(|_| XbotError::UserError("DATA_DIR is not set".to_string()))?;
        let data_dir = PathBuf::from(data_dir);
        if !data_dir.is_absolute() {
            return Err(XbotError::UserError(format!(
                "DATA_DIR must be an absolute path, got {}",
                data_dir.display()
            )));
        }
        Self::from_data_dir(data_dir)
    }

    /// Build a `Config` directly from a known `data_dir`, reading every
    /// other variable from the environment but skipping the `DATA_DIR`
    /// lookup itself — the constructor tests reach for, since a
    /// `tempfile::TempDir` is already in hand by the time a test wants one.
    pub fn from_data_dir(data_dir: PathBuf) -> Result<Self, XbotError> {
        std::fs::create_dir_all(&data_dir)?;
        let metadata = std::fs::metadata(&data_dir)?;
        if metadata.permissions().readonly() {
            return Err(XbotError::UserError(format!(
                "DATA_DIR is not writable: {}",
                data_dir.display()
            )));
        }

        let log_path = data_dir.join("logs").join("xbotd.log");

        Ok(Self {
            mcp_memory_enabled: env_bool("MCP_MEMORY_ENABLED", false),
            max_turns: env_u32("MAX_TURNS", xbot_engine::orchestrator::MAX_TURNS),
            task_timeout_secs: env_u64("TASK_TIMEOUT", xbot_engine::orchestrator::TASK_TIMEOUT.as_secs()),
            dispatch_model_routing: env_bool("DISPATCH_MODEL_ROUTING", true),
            deployment_staging_path: std::env::var("X_DEPLOYMENT_STAGING_PATH").ok().map(PathBuf::from),
            data_dir,
            log_path,
        })
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
