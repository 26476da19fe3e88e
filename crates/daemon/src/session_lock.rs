// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-`(user_id, platform)` serialization (§5: "tasks from the same
//! session run strictly one at a time, in submission order"). The Task
//! Inbox itself has no notion of session ordering — it just stores and
//! transitions envelopes — so the runtime acquires one of these guards
//! before it starts a task and holds it for the task's full duration.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

/// A lazily-created table of per-session locks. Lock objects are never
/// removed — the table grows by one entry per distinct `(user_id,
/// platform)` pair seen over the process lifetime, which is bounded by the
/// number of distinct users, not the number of tasks.
#[derive(Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

fn key(user_id: &str, platform: &str) -> String {
    format!("{user_id}\0{platform}")
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, user_id: &str, platform: &str) -> Arc<AsyncMutex<()>> {
        let key = key(user_id, platform);
        let mut guard = self.locks.lock();
        guard.entry(key).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }

    /// Acquire the session's lock, blocking until any in-flight task for
    /// the same `(user_id, platform)` has released it. The returned guard
    /// holds the lock until dropped.
    pub async fn acquire(&self, user_id: &str, platform: &str) -> tokio::sync::OwnedMutexGuard<()> {
        self.lock_for(user_id, platform).lock_owned().await
    }
}

#[cfg(test)]
#[path = "session_lock_tests.rs"]
mod tests;
