// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! xbot-core: shared identifiers and domain types for the agentic core.
//!
//! This crate has no I/O of its own — it defines the vocabulary (task
//! envelopes, worker records, skill descriptors, tool observations) that the
//! state, inbox, adapters, and engine crates build on.

pub mod caller;
pub mod clock;
pub mod heartbeat;
pub mod id;
pub mod reminder;
pub mod schedule;
pub mod skill;
pub mod task;
pub mod time_fmt;
pub mod tool;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use caller::CallerProfile;
pub use clock::{Clock, FakeClock, SystemClock};
pub use heartbeat::{ActiveHours, HeartbeatGrade, HeartbeatStatus, HEARTBEAT_OK_SENTINEL};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use reminder::{ReminderEntry, RemindersDoc};
pub use schedule::{ScheduledTaskEntry, ScheduledTasksDoc};
pub use skill::{
    InputSchema, NetworkAccess, Permissions, SchemaProperty, SkillDescriptor, SkillError,
    SkillKind, SkillPermission,
};
pub use task::{
    Priority, TaskConfig, TaskEnvelope, TaskEvent, TaskEventKind, TaskId, TaskSource, TaskStatus,
};
pub use time_fmt::{format_elapsed, format_elapsed_ms};
pub use tool::{ErrorCode, ToolObservation};
pub use worker::{WorkerBackendKind, WorkerId, WorkerRecord, WorkerStatus};
