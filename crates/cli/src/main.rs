// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! xbot - operational CLI for an xbot `DATA_DIR` (§6).
//!
//! Talks to the state store directly rather than to a running daemon: every
//! subcommand here is read-mostly bookkeeping (list, inspect, replay,
//! cancel, migrate), not live dispatch, so there is nothing a socket
//! connection would buy that `read_state`/`Inbox::hydrate` don't already.

mod commands;
mod exit_error;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "xbot", version, about = "Operational CLI for an xbot data directory")]
struct Cli {
    /// Data directory to operate on (defaults to $DATA_DIR)
    #[arg(short = 'd', long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every task envelope on record
    ListTasks,
    /// Show a worker's fleet record and recent dispatch history
    InspectWorker { worker_id: String },
    /// Print a task's full audit trail
    ReplayTask { task_id: String },
    /// Rewrite legacy-format state files into the canonical shape
    MigrateState {
        #[arg(long, conflicts_with = "dry_run")]
        apply: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Cancel a pending or running task
    CancelTask { task_id: String },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = e.to_string();
        if !msg.is_empty() {
            eprintln!("Error: {msg}");
        }
        std::process::exit(code);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Commands::ListTasks => commands::list_tasks::run(&data_dir, cli.output).await,
        Commands::InspectWorker { worker_id } => {
            commands::inspect_worker::run(&data_dir, &worker_id, cli.output).await
        }
        Commands::ReplayTask { task_id } => {
            commands::replay_task::run(&data_dir, &task_id, cli.output).await
        }
        Commands::MigrateState { apply, dry_run } => {
            // clap's conflicts_with rules out apply+dry_run together; default
            // to a dry run unless --apply is explicit, so a bare
            // `migrate-state` never mutates state by accident.
            let _ = dry_run;
            commands::migrate_state::run(&data_dir, apply).await
        }
        Commands::CancelTask { task_id } => commands::cancel_task::run(&data_dir, &task_id).await,
    }
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir,
        None => PathBuf::from(
            std::env::var("DATA_DIR").context("DATA_DIR not set; pass --data-dir explicitly")?,
        ),
    };
    if !dir.is_dir() {
        return Err(exit_error::ExitError::new(
            2,
            format!("data directory does not exist: {}", dir.display()),
        )
        .into());
    }
    Ok(dir)
}
