// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging & Observability (§4.11): a rolling file appender plus
//! `EnvFilter` (default `info`), matching the teacher's daemon logging
//! setup exactly. Only the binary ever calls this — library crates never
//! install a subscriber, so embedding the core elsewhere can't double
//! initialize logging.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::error::XbotError;

pub fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, XbotError> {
    let parent = config
        .log_path
        .parent()
        .ok_or_else(|| XbotError::UserError("log path has no parent directory".to_string()))?;
    std::fs::create_dir_all(parent)?;

    let file_name = config
        .log_path
        .file_name()
        .ok_or_else(|| XbotError::UserError("log path has no file name".to_string()))?;
    let file_appender = tracing_appender::rolling::never(parent, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
