// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extension Executor (§4.5): the `run_extension`/`list_extensions` tool
//! pair's implementation. [`SkillLoader`] owns descriptor discovery and
//! hot-reload; [`ExtensionExecutor`] owns the per-call lookup/validate/
//! invoke/normalize pipeline.

mod executor;
mod loader;
mod schema;

pub use executor::{ExtensionExecutor, ExtensionOutcome, OutputFile};
pub use loader::SkillLoader;
pub use schema::{validate_args, SchemaError};
