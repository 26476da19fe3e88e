// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller identity for tool dispatch.
//!
//! The same orchestrator loop drives both the Core Manager and dispatched
//! Workers (see the "one loop, two roles" design note); `CallerProfile` is
//! the tag that lets `tool_access_store` gate which tools a given invocation
//! of that loop may call without branching on code path.

use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

/// Identifies which role is driving the current orchestrator turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallerProfile {
    /// The Core Manager: unrestricted `bash`, memory tools, `dispatch_worker`.
    Manager,
    /// A dispatched Worker: restricted `bash` allow-list, no memory tools,
    /// no `dispatch_worker` (workers never re-dispatch).
    Worker { worker_id: WorkerId },
}

impl CallerProfile {
    pub fn is_manager(&self) -> bool {
        matches!(self, CallerProfile::Manager)
    }

    pub fn worker_id(&self) -> Option<&WorkerId> {
        match self {
            CallerProfile::Worker { worker_id } => Some(worker_id),
            CallerProfile::Manager => None,
        }
    }
}

#[cfg(test)]
#[path = "caller_tests.rs"]
mod tests;
