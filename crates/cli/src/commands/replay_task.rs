// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use anyhow::Result;
use xbot_core::{SystemClock, TaskId, UuidIdGen};
use xbot_inbox::Inbox;

use crate::exit_error::ExitError;
use crate::output::{emit_json, OutputFormat};

pub async fn run(data_dir: &Path, task_id: &str, format: OutputFormat) -> Result<()> {
    let inbox = Inbox::new(data_dir, SystemClock, UuidIdGen);
    inbox.hydrate().await?;
    let id = TaskId::new(task_id);
    let Some(envelope) = inbox.get(&id).await else {
        return Err(ExitError::new(2, format!("unknown task: {task_id}")).into());
    };

    match format {
        OutputFormat::Json => println!("{}", emit_json(&envelope)),
        OutputFormat::Text => {
            println!("task_id:  {}", envelope.task_id);
            println!("source:   {}", envelope.source);
            println!("goal:     {}", envelope.goal);
            println!("status:   {}", envelope.status);
            if let Some(worker_id) = &envelope.assigned_worker_id {
                println!("worker:   {worker_id}");
            }
            if let Some(output) = &envelope.final_output {
                println!("output:   {output}");
            }
            println!();
            println!("event trail ({} events):", envelope.events.len());
            for event in &envelope.events {
                println!("  [{}] {:?}", event.ts, event.kind);
            }
        }
    }
    Ok(())
}
