// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting shared by every subcommand: `text` for a human at a
//! terminal, `json` for scripting against the daemon's on-disk state.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Serialize `value` as pretty JSON, falling back to its `Debug` rendering
/// if it somehow contains something non-finite — should never happen for
/// the plain-old-data types this CLI prints.
pub fn emit_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
