// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// A state file exists but could not be recovered under any of the four
/// reader variants (canonical, legacy frontmatter, legacy bare YAML, legacy
/// whole-YAML).
#[derive(Debug, Error)]
#[error("could not parse state file {path}: {reason}")]
pub struct ParseError {
    pub path: PathBuf,
    pub reason: String,
}

/// Top-level failure mode of `read_state`/`write_state`.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
