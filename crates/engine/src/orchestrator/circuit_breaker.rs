// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The identical-tool-call circuit breaker (§4.3): a fixed-size ring
//! buffer of the last three `(name, args, observation)` triples, kept on
//! the per-task loop state so concurrent tasks never share breaker state.

use serde_json::Value;
use std::collections::VecDeque;
use xbot_core::ToolObservation;

const WINDOW: usize = 3;

struct Call {
    name: String,
    args: Value,
    observation: ToolObservation,
}

/// Detects three consecutive byte-identical tool calls (same name, same
/// args, same resulting observation) within one task's turn loop.
#[derive(Default)]
pub struct CircuitBreaker {
    recent: VecDeque<Call>,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed tool call and report whether the breaker has
    /// now tripped.
    pub fn record(&mut self, name: &str, args: &Value, observation: &ToolObservation) -> bool {
        self.recent.push_back(Call {
            name: name.to_string(),
            args: args.clone(),
            observation: observation.clone(),
        });
        while self.recent.len() > WINDOW {
            self.recent.pop_front();
        }
        self.has_tripped()
    }

    fn has_tripped(&self) -> bool {
        if self.recent.len() < WINDOW {
            return false;
        }
        let Some(first) = self.recent.front() else {
            return false;
        };
        self.recent.iter().all(|call| {
            call.name == first.name
                && call.args == first.args
                && call.observation.same_content(&first.observation)
        })
    }
}

#[cfg(test)]
#[path = "circuit_breaker_tests.rs"]
mod tests;
