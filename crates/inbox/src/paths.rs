// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where a task envelope lives on disk: one canonical state file per task
//! under `data/system/tasks/<task_id>.md`, so every envelope is as
//! inspectable and hand-editable as any other domain state file.

use std::path::{Path, PathBuf};
use xbot_core::TaskId;

pub fn tasks_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("system").join("tasks")
}

pub fn task_path(data_dir: &Path, task_id: &TaskId) -> PathBuf {
    tasks_dir(data_dir).join(format!("{task_id}.md"))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
