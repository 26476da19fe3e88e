// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! xbotd — the daemon process. Hydrates the Task Inbox and Worker Fleet
//! from disk, then runs three independent loops against the same state:
//! the dispatch loop (one task at a time per session, up to
//! `MAX_CONCURRENT_TASKS` across sessions), the Scheduler tick (§4.8,
//! every 30s), and the Heartbeat Worker tick (§4.7, every 1s).

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use xbot_core::{SystemClock, UuidIdGen};
use xbot_daemon::dispatcher::{BackendTable, CoreToolDispatcher};
use xbot_daemon::llm_provider::UnconfiguredLlmClient;
use xbot_daemon::runtime::TaskRunner;
use xbot_daemon::session_lock::SessionLocks;
use xbot_daemon::worker_backends::{CoreAgentBackend, ShellBackend};
use xbot_daemon::Config;
use xbot_engine::extension::{ExtensionExecutor, SkillLoader};
use xbot_engine::heartbeat::{
    HeartbeatDispatcher, MemoryCompactionSubJob, ReminderSweepSubJob, RssCheckSubJob,
    WatchlistRefreshSubJob,
};
use xbot_engine::scheduler::Scheduler;
use xbot_engine::worker_runtime::WorkerStore;
use xbot_inbox::Inbox;

/// Upper bound on tasks dispatched concurrently across all sessions (§5).
/// Same-session ordering is enforced separately by [`SessionLocks`].
const MAX_CONCURRENT_TASKS: usize = 32;

const SCHEDULER_TICK: Duration = Duration::from_secs(30);
const HEARTBEAT_TICK: Duration = Duration::from_secs(1);
const DISPATCH_IDLE_SLEEP: Duration = Duration::from_millis(250);
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let log_guard = xbot_daemon::logging::setup_logging(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting xbotd");

    let clock = SystemClock;
    let id_gen = UuidIdGen;

    let inbox = Arc::new(Inbox::new(&config.data_dir, clock, id_gen.clone()));
    let hydrated = inbox.hydrate().await?;
    info!(hydrated, "task inbox hydrated");

    let worker_store = Arc::new(WorkerStore::new(&config.data_dir));
    let workers = worker_store.hydrate()?;
    info!(workers, "worker fleet hydrated");

    let skills = Arc::new(SkillLoader::new(config.data_dir.join("skills")));
    let extensions = Arc::new(ExtensionExecutor::new(skills.clone(), &config.data_dir));

    let llm = Arc::new(UnconfiguredLlmClient);

    // No memory provider is wired in by default; `memory_read`/`memory_write`
    // fail closed until a concrete MCP transport is configured (§4.6, same
    // reasoning as `llm_provider`).
    let memory: Option<Arc<dyn xbot_engine::memory::MemoryClient>> = None;

    // A worker's nested orchestrator can never reach `dispatch_worker` or
    // `memory_*` — `tool_access` strips those for `CallerProfile::Worker`
    // before the call ever gets here — so the dispatcher it runs against
    // only needs a placeholder backend table to satisfy the constructor.
    let worker_dispatcher: Arc<dyn xbot_engine::orchestrator::ToolDispatcher> =
        Arc::new(CoreToolDispatcher::new(
            "worker-fleet",
            config.data_dir.clone(),
            xbot_engine::primitives::PrimitiveContext::worker(config.data_dir.clone()),
            extensions.clone(),
            skills.clone(),
            worker_store.clone(),
            Arc::new(BackendTable::new(
                Arc::new(ShellBackend::new()),
                Arc::new(ShellBackend::new()),
            )),
            memory.clone(),
            clock,
            id_gen.clone(),
        ));

    let core_agent_backend = Arc::new(CoreAgentBackend::new(
        llm.clone(),
        worker_dispatcher,
        config.data_dir.clone(),
    ));
    let shell_backend = Arc::new(ShellBackend::new());
    let backends = Arc::new(BackendTable::new(core_agent_backend, shell_backend));

    let adapters = Arc::new(HashMap::new());

    let runner = Arc::new(TaskRunner {
        data_dir: config.data_dir.clone(),
        inbox: inbox.clone(),
        llm,
        clock,
        id_gen,
        extensions,
        skills,
        worker_store,
        backends,
        memory,
        session_locks: Arc::new(SessionLocks::new()),
        adapters,
    });

    let scheduler = Scheduler::new(clock, &config.data_dir);
    let sub_jobs: Vec<Arc<dyn xbot_engine::heartbeat::SubJob>> = vec![
        Arc::new(RssCheckSubJob),
        Arc::new(WatchlistRefreshSubJob),
        Arc::new(ReminderSweepSubJob::new(clock)),
        Arc::new(MemoryCompactionSubJob),
    ];
    let heartbeat = HeartbeatDispatcher::new(clock, &config.data_dir, sub_jobs);

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let dispatch_handle = tokio::spawn(dispatch_loop(runner, inbox.clone()));
    let scheduler_handle = tokio::spawn(scheduler_loop(scheduler, inbox.clone()));
    let heartbeat_handle = tokio::spawn(heartbeat_loop(heartbeat, inbox.clone()));
    let sweep_handle = tokio::spawn(sweep_loop(inbox));

    info!("xbotd ready");
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    dispatch_handle.abort();
    scheduler_handle.abort();
    heartbeat_handle.abort();
    sweep_handle.abort();
    drop(log_guard);
    info!("xbotd stopped");
    Ok(())
}

/// Pulls pending tasks off the inbox and runs each on its own tokio task,
/// bounded by [`MAX_CONCURRENT_TASKS`]. Session ordering within that bound
/// is [`TaskRunner::run_task`]'s job, not this loop's.
async fn dispatch_loop(
    runner: Arc<TaskRunner<SystemClock, UuidIdGen, UnconfiguredLlmClient>>,
    inbox: xbot_inbox::SharedInbox<SystemClock, UuidIdGen>,
) {
    let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_TASKS));
    loop {
        let pending = inbox.list_pending(MAX_CONCURRENT_TASKS).await;
        if pending.is_empty() {
            tokio::time::sleep(DISPATCH_IDLE_SLEEP).await;
            continue;
        }
        for envelope in pending {
            let runner = runner.clone();
            let permits = permits.clone();
            tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let task_id = envelope.task_id.clone();
                if let Err(err) = runner.run_task(envelope).await {
                    error!(%task_id, error = %err, "task run failed");
                }
            });
        }
    }
}

async fn scheduler_loop(
    scheduler: Scheduler<SystemClock>,
    inbox: xbot_inbox::SharedInbox<SystemClock, UuidIdGen>,
) {
    let mut interval = tokio::time::interval(SCHEDULER_TICK);
    loop {
        interval.tick().await;
        match scheduler.reconcile(&inbox).await {
            Ok(fired) if fired > 0 => info!(fired, "scheduler tick fired entries"),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "scheduler tick failed"),
        }
    }
}

async fn heartbeat_loop(
    heartbeat: HeartbeatDispatcher<SystemClock>,
    inbox: xbot_inbox::SharedInbox<SystemClock, UuidIdGen>,
) {
    let mut interval = tokio::time::interval(HEARTBEAT_TICK);
    loop {
        interval.tick().await;
        match heartbeat.tick(&inbox).await {
            Ok(due) if due > 0 => info!(due, "heartbeat tick ran"),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "heartbeat tick failed"),
        }
    }
}

/// Periodically drops terminal envelopes older than the default retention
/// window so the inbox doesn't grow unbounded (§4.2).
async fn sweep_loop(inbox: xbot_inbox::SharedInbox<SystemClock, UuidIdGen>) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let dropped = inbox.sweep_terminal(xbot_inbox::DEFAULT_RETENTION_MS).await;
        if dropped > 0 {
            info!(dropped, "swept terminal tasks past retention");
        }
    }
}
