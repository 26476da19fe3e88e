// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use xbot_core::WorkerId;
use xbot_engine::worker_runtime::{read_task_log, WorkerStore};

use crate::exit_error::ExitError;
use crate::output::{emit_json, OutputFormat};

#[derive(Serialize)]
struct WorkerInspection {
    record: xbot_core::WorkerRecord,
    recent_tasks: Vec<xbot_engine::worker_runtime::WorkerTaskLogEntry>,
}

pub async fn run(data_dir: &Path, worker_id: &str, format: OutputFormat) -> Result<()> {
    let store = WorkerStore::new(data_dir);
    store.hydrate()?;
    let id = WorkerId::new(worker_id);
    let Some(record) = store.get(&id) else {
        return Err(ExitError::new(2, format!("unknown worker: {worker_id}")).into());
    };

    let mut recent_tasks: Vec<_> = read_task_log(data_dir)?
        .into_iter()
        .filter(|entry| entry.worker_id == id)
        .collect();
    recent_tasks.reverse();
    recent_tasks.truncate(20);

    let inspection = WorkerInspection {
        record,
        recent_tasks,
    };

    match format {
        OutputFormat::Json => println!("{}", emit_json(&inspection)),
        OutputFormat::Text => {
            let r = &inspection.record;
            println!("worker_id:    {}", r.worker_id);
            println!("name:         {}", r.name);
            println!("backend:      {:?}", r.backend);
            println!("status:       {:?}", r.status);
            println!("capabilities: {}", r.capabilities.join(", "));
            println!("workspace:    {}", r.workspace_path.display());
            println!();
            println!("recent tasks ({}):", inspection.recent_tasks.len());
            for entry in &inspection.recent_tasks {
                println!(
                    "  {:<24} {:<9?} {}",
                    entry.task_id, entry.status, entry.source
                );
            }
        }
    }
    Ok(())
}
