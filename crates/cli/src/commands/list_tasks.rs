// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use anyhow::Result;
use xbot_core::{format_elapsed_ms, SystemClock, UuidIdGen};
use xbot_inbox::Inbox;

use crate::output::{emit_json, OutputFormat};

pub async fn run(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let inbox = Inbox::new(data_dir, SystemClock, UuidIdGen);
    inbox.hydrate().await?;
    let tasks = inbox.list_all().await;

    match format {
        OutputFormat::Json => println!("{}", emit_json(&tasks)),
        OutputFormat::Text => {
            if tasks.is_empty() {
                println!("no tasks on record");
                return Ok(());
            }
            let now_ms = xbot_core::Clock::epoch_ms(&SystemClock);
            println!(
                "{:<24} {:<10} {:<9} {:<6} {:<8} GOAL",
                "TASK_ID", "SOURCE", "STATUS", "PRIO", "AGE"
            );
            for task in &tasks {
                let age = format_elapsed_ms(now_ms.saturating_sub(task.created_at));
                println!(
                    "{:<24} {:<10} {:<9} {:<6?} {:<8} {}",
                    task.task_id,
                    task.source,
                    task.status,
                    task.priority,
                    age,
                    task.goal
                );
            }
        }
    }
    Ok(())
}
