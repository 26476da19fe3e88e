// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic per-namespace ID counters, persisted canonically so restarts
//! never reuse an issued ID.

use crate::error::StateError;
use crate::file::{read_state, write_state};
use serde_json::{json, Value};
use std::path::Path;

/// Allocate and persist the next integer in `namespace`'s counter sequence.
///
/// `counters_path` is the canonical file backing every namespace's counter
/// (`data/system/repositories/id_counters.md` in production); tests pass a
/// tempdir path instead.
pub fn next_id(counters_path: &Path, namespace: &str) -> Result<u64, StateError> {
    let mut counters = if counters_path.exists() {
        read_state(counters_path)?.data
    } else {
        json!({})
    };

    let next = counters
        .get(namespace)
        .and_then(Value::as_u64)
        .unwrap_or(0)
        + 1;

    if let Value::Object(map) = &mut counters {
        map.insert(namespace.to_string(), json!(next));
    }

    write_state(counters_path, &counters)?;
    Ok(next)
}

#[cfg(test)]
#[path = "counter_tests.rs"]
mod tests;
