// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `dispatch_worker` protocol (§4.6): load, queue, run, free.

use std::time::Duration;
use xbot_adapters::{WorkerBackend, WorkerHandle, WorkerOutcome, WorkerSpawnConfig};
use xbot_core::{Clock, IdGen, WorkerId, WorkerStatus};

use super::store::WorkerStore;
use super::task_log::{self, WorkerTaskEvent, WorkerTaskLogEntry, WorkerTaskStatus};
use crate::error::EngineError;

/// How often `run_to_completion` polls the backend while a run is in
/// flight. The backend itself owns the >=10s progress cadence (§4.6); this
/// is just how often we check whether it has something new.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One relayed progress line, handed to whatever surfaces it to the user
/// (an adapter edit, per §4.6's "intermediate adapter edit").
pub type ProgressSink<'a> = dyn Fn(&str) + Send + Sync + 'a;

/// Run `dispatch_worker(worker_id, instruction, metadata)` to completion
/// against `backend`, updating `store` and `WORKER_TASKS.jsonl` as it goes.
///
/// The four backend kinds are interchangeable behind [`WorkerBackend`]; the
/// protocol here never branches on `WorkerBackendKind` — selection of which
/// concrete backend implementation to pass in happens at the call site.
pub async fn dispatch_worker<C: Clock, I: IdGen, B: WorkerBackend>(
    store: &WorkerStore,
    backend: &B,
    clock: &C,
    id_gen: &I,
    data_dir: &std::path::Path,
    worker_id: &WorkerId,
    instruction: &str,
    metadata: std::collections::HashMap<String, serde_json::Value>,
    on_progress: &ProgressSink<'_>,
) -> Result<WorkerOutcome, EngineError> {
    let record = store
        .get(worker_id)
        .ok_or_else(|| EngineError::ToolNotFound(format!("worker {worker_id}")))?;

    if !record.status.is_dispatchable() {
        return Err(EngineError::AdapterFailure(format!(
            "worker {worker_id} is {:?}, not idle",
            record.status
        )));
    }

    let task_id = format!("wt-{}", id_gen.next());
    let created_at = clock.epoch_ms();
    let mut events = vec![WorkerTaskEvent {
        ts: created_at,
        kind: "queued".to_string(),
        note: format!("dispatch requested for worker {worker_id}"),
    }];

    task_log::append(
        data_dir,
        &WorkerTaskLogEntry {
            task_id: task_id.clone(),
            worker_id: worker_id.clone(),
            status: WorkerTaskStatus::Queued,
            source: "manager_dispatch".to_string(),
            created_at,
            started_at: None,
            ended_at: None,
            error: None,
            retry_count: 0,
            summary: None,
            events: events.clone(),
        },
    )?;

    store.set_status(worker_id, WorkerStatus::Busy)?;

    let started_at = clock.epoch_ms();
    events.push(WorkerTaskEvent {
        ts: started_at,
        kind: "running".to_string(),
        note: "backend spawn started".to_string(),
    });
    task_log::append(
        data_dir,
        &WorkerTaskLogEntry {
            task_id: task_id.clone(),
            worker_id: worker_id.clone(),
            status: WorkerTaskStatus::Running,
            source: "manager_dispatch".to_string(),
            created_at,
            started_at: Some(started_at),
            ended_at: None,
            error: None,
            retry_count: 0,
            summary: None,
            events: events.clone(),
        },
    )?;

    let config = WorkerSpawnConfig {
        worker_id: worker_id.clone(),
        task_id: task_id.clone(),
        instruction: instruction.to_string(),
        workspace_path: record.workspace_path.clone(),
        soul_path: record.soul_path.clone(),
        metadata,
        timeout_secs: 600,
    };

    let handle = match backend.spawn(config).await {
        Ok(handle) => handle,
        Err(err) => {
            store.set_status(worker_id, WorkerStatus::Error)?;
            let ended_at = clock.epoch_ms();
            events.push(WorkerTaskEvent {
                ts: ended_at,
                kind: "failed".to_string(),
                note: err.to_string(),
            });
            task_log::append(
                data_dir,
                &WorkerTaskLogEntry {
                    task_id,
                    worker_id: worker_id.clone(),
                    status: WorkerTaskStatus::Failed,
                    source: "manager_dispatch".to_string(),
                    created_at,
                    started_at: Some(started_at),
                    ended_at: Some(ended_at),
                    error: Some(err.to_string()),
                    retry_count: 0,
                    summary: None,
                    events,
                },
            )?;
            return Err(EngineError::AdapterFailure(err.to_string()));
        }
    };

    let outcome = poll_to_completion(backend, &handle, on_progress).await?;

    let (status, error, summary) = match &outcome {
        WorkerOutcome::Done { summary } => (WorkerTaskStatus::Done, None, Some(summary.clone())),
        WorkerOutcome::Failed { error } => (WorkerTaskStatus::Failed, Some(error.clone()), None),
    };

    let ended_at = clock.epoch_ms();
    events.push(WorkerTaskEvent {
        ts: ended_at,
        kind: status_kind(status).to_string(),
        note: summary.clone().or_else(|| error.clone()).unwrap_or_default(),
    });

    task_log::append(
        data_dir,
        &WorkerTaskLogEntry {
            task_id,
            worker_id: worker_id.clone(),
            status,
            source: "manager_dispatch".to_string(),
            created_at,
            started_at: Some(started_at),
            ended_at: Some(ended_at),
            error,
            retry_count: 0,
            summary,
            events,
        },
    )?;

    match &outcome {
        WorkerOutcome::Done { .. } => store.mark_idle_at(worker_id, clock.epoch_ms())?,
        WorkerOutcome::Failed { .. } => store.set_status(worker_id, WorkerStatus::Error)?,
    }

    Ok(outcome)
}

fn status_kind(status: WorkerTaskStatus) -> &'static str {
    match status {
        WorkerTaskStatus::Queued => "queued",
        WorkerTaskStatus::Running => "running",
        WorkerTaskStatus::Done => "done",
        WorkerTaskStatus::Failed => "failed",
    }
}

/// Progress is relayed at >=10s cadence (§4.6) even though we poll the
/// backend more often than that, so the user doesn't see a burst of
/// identical "still running" edits.
const PROGRESS_EVERY_N_POLLS: u32 = 20;

async fn poll_to_completion<B: WorkerBackend>(
    backend: &B,
    handle: &WorkerHandle,
    on_progress: &ProgressSink<'_>,
) -> Result<WorkerOutcome, EngineError> {
    let mut polls_since_progress = 0u32;
    loop {
        match backend.poll(handle).await {
            Ok(Some(WorkerOutcome::Done { summary })) => {
                return Ok(WorkerOutcome::Done { summary })
            }
            Ok(Some(WorkerOutcome::Failed { error })) => {
                return Ok(WorkerOutcome::Failed { error })
            }
            Ok(None) => {
                polls_since_progress += 1;
                if polls_since_progress >= PROGRESS_EVERY_N_POLLS {
                    polls_since_progress = 0;
                    on_progress(&format!("worker {} still running", handle.worker_id));
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            Err(err) => return Err(EngineError::AdapterFailure(err.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
