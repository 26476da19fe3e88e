// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker Store: fleet bookkeeping persisted to `data/WORKERS.json`.
//!
//! This is a flat JSON array, not a canonical `xbot-state` file — the
//! fleet is a single small registry rewritten wholesale on every mutation,
//! not a per-domain document with legacy-format tolerance.

use parking_lot::RwLock;
use serde_json;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use xbot_core::{WorkerId, WorkerRecord, WorkerStatus};

use crate::error::EngineError;

fn workers_path(data_dir: &Path) -> PathBuf {
    data_dir.join("WORKERS.json")
}

/// In-memory fleet registry, file-backed at `data/WORKERS.json`. Cheaply
/// cloneable; all clones share the same lock and backing file.
#[derive(Clone)]
pub struct WorkerStore {
    data_dir: PathBuf,
    workers: Arc<RwLock<HashMap<WorkerId, WorkerRecord>>>,
}

impl WorkerStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            workers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load `WORKERS.json` into memory, replacing whatever was there. A
    /// missing file is not an error — an empty fleet is a valid start
    /// state for a fresh `DATA_DIR`.
    pub fn hydrate(&self) -> Result<usize, EngineError> {
        let path = workers_path(&self.data_dir);
        if !path.exists() {
            return Ok(0);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| EngineError::AdapterFailure(format!("reading {}: {e}", path.display())))?;
        let records: Vec<WorkerRecord> = serde_json::from_str(&content)
            .map_err(|e| EngineError::AdapterFailure(format!("parsing {}: {e}", path.display())))?;
        let mut guard = self.workers.write();
        guard.clear();
        let count = records.len();
        for record in records {
            guard.insert(record.worker_id.clone(), record);
        }
        Ok(count)
    }

    fn persist(&self) -> Result<(), EngineError> {
        let path = workers_path(&self.data_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| EngineError::AdapterFailure(format!("creating {}: {e}", parent.display())))?;
        }
        let records: Vec<&WorkerRecord> = self.workers.read().values().collect();
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| EngineError::AdapterFailure(format!("serializing WORKERS.json: {e}")))?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| EngineError::AdapterFailure(format!("writing {}: {e}", tmp_path.display())))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| EngineError::AdapterFailure(format!("renaming {}: {e}", tmp_path.display())))?;
        Ok(())
    }

    pub fn register(&self, record: WorkerRecord) -> Result<(), EngineError> {
        self.workers.write().insert(record.worker_id.clone(), record);
        self.persist()
    }

    pub fn get(&self, worker_id: &WorkerId) -> Option<WorkerRecord> {
        self.workers.read().get(worker_id).cloned()
    }

    pub fn list(&self) -> Vec<WorkerRecord> {
        self.workers.read().values().cloned().collect()
    }

    /// Workers that are `idle` and declare `capability`, ordered by
    /// `last_used_at_ms` ascending (least-recently-used first) — the
    /// resolved Open Question for overlapping-capability selection.
    pub fn idle_candidates(&self, capability: &str) -> Vec<WorkerRecord> {
        let mut candidates: Vec<WorkerRecord> = self
            .workers
            .read()
            .values()
            .filter(|w| w.status.is_dispatchable() && w.has_capability(capability))
            .cloned()
            .collect();
        candidates.sort_by_key(|w| w.last_used_at_ms);
        candidates
    }

    pub fn set_status(&self, worker_id: &WorkerId, status: WorkerStatus) -> Result<(), EngineError> {
        {
            let mut guard = self.workers.write();
            let record = guard
                .get_mut(worker_id)
                .ok_or_else(|| EngineError::ToolNotFound(format!("worker {worker_id}")))?;
            record.status = status;
        }
        self.persist()
    }

    pub fn mark_idle_at(&self, worker_id: &WorkerId, epoch_ms: u64) -> Result<(), EngineError> {
        {
            let mut guard = self.workers.write();
            let record = guard
                .get_mut(worker_id)
                .ok_or_else(|| EngineError::ToolNotFound(format!("worker {worker_id}")))?;
            record.status = WorkerStatus::Idle;
            record.last_used_at_ms = epoch_ms;
        }
        self.persist()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
