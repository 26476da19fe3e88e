// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use anyhow::Result;
use xbot_core::{SystemClock, TaskId, UuidIdGen};
use xbot_inbox::{Inbox, InboxError};

use crate::exit_error::ExitError;

pub async fn run(data_dir: &Path, task_id: &str) -> Result<()> {
    let inbox = Inbox::new(data_dir, SystemClock, UuidIdGen);
    inbox.hydrate().await?;
    let id = TaskId::new(task_id);

    match inbox.cancel(&id).await {
        Ok(envelope) => {
            println!("cancelled {}", envelope.task_id);
            Ok(())
        }
        Err(InboxError::NotFound(_)) => {
            Err(ExitError::new(2, format!("unknown task: {task_id}")).into())
        }
        Err(InboxError::InvalidTransition { from, to, .. }) => Err(ExitError::new(
            2,
            format!("task {task_id} cannot be cancelled from {from} (attempted transition to {to})"),
        )
        .into()),
        Err(other) => Err(other.into()),
    }
}
