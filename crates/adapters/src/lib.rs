// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! xbot-adapters: the platform/adapter boundary (`UnifiedContext`) and the
//! Worker Fleet's backend abstraction (`WorkerBackend`).
//!
//! Neither trait here knows about tasks, the Orchestrator, or the Tool
//! Registry — those live in `xbot-engine`, which depends on this crate for
//! the collaborator interfaces it drives.

pub mod cli_backend;
pub mod context;
pub mod subprocess;
pub mod worker_backend;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use cli_backend::{run_cli_to_completion, CliFlavor, CliWorkerBackend};
pub use context::{
    MessageType, UiButton, UiPrimitive, UnifiedChat, UnifiedContext, UnifiedMessage, UnifiedUser,
};
pub use subprocess::run_with_timeout;
pub use worker_backend::{
    ProgressEvent, WorkerBackend, WorkerBackendError, WorkerHandle, WorkerOutcome,
    WorkerSpawnConfig,
};
