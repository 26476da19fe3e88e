// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The MCP memory/graph service interface (§6, §1: out of scope as an
//! external collaborator — this module defines only the contract the
//! `memory_read`/`memory_write` tools drive).
//!
//! §6 names five distinct operations (`open_nodes`, `create_entities`,
//! `create_relations`, `add_observations`, `read_graph`); `tool_access`
//! gates on two tool names (`memory_read`, `memory_write`) rather than
//! five, so the two read-only lookups are reached through `memory_read`
//! with an `op` discriminant and the three mutations through
//! `memory_write` the same way — one seam per direction of data flow
//! instead of one per MCP call, since all three writes share the same
//! "never visible to a worker" gate and the same collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryReadOp {
    OpenNodes,
    ReadGraph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryWriteOp {
    CreateEntities,
    CreateRelations,
    AddObservations,
}

#[derive(Debug, thiserror::Error)]
#[error("mcp memory call failed: {0}")]
pub struct MemoryError(pub String);

/// The provider-agnostic MCP memory contract the `memory_read`/
/// `memory_write` tools drive.
#[async_trait]
pub trait MemoryClient: Send + Sync {
    async fn read(&self, op: MemoryReadOp, args: Value) -> Result<Value, MemoryError>;
    async fn write(&self, op: MemoryWriteOp, args: Value) -> Result<Value, MemoryError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Deterministic `MemoryClient` that records every call and always
    /// succeeds with an empty object, for orchestrator-level tests that
    /// only need memory tools to be reachable, not to hold real state.
    #[derive(Clone, Default)]
    pub struct FakeMemoryClient {
        inner: Arc<Mutex<Vec<String>>>,
    }

    impl FakeMemoryClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().clone()
        }
    }

    #[async_trait]
    impl MemoryClient for FakeMemoryClient {
        async fn read(&self, op: MemoryReadOp, _args: Value) -> Result<Value, MemoryError> {
            self.inner.lock().push(format!("read:{op:?}"));
            Ok(serde_json::json!({}))
        }

        async fn write(&self, op: MemoryWriteOp, _args: Value) -> Result<Value, MemoryError> {
            self.inner.lock().push(format!("write:{op:?}"));
            Ok(serde_json::json!({}))
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
