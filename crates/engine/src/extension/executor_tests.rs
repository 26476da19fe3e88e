// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use xbot_core::{InputSchema, NetworkAccess, SchemaProperty, SkillKind};

fn write_executable(path: &std::path::Path, script: &str) {
    fs::write(path, script).unwrap();
    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn descriptor(entry: std::path::PathBuf, workspace: std::path::PathBuf) -> SkillDescriptor {
    let mut properties = std::collections::BTreeMap::new();
    properties.insert(
        "name".to_string(),
        SchemaProperty {
            type_name: "string".to_string(),
            description: None,
            r#enum: None,
            items: None,
            minimum: None,
            maximum: None,
            default: None,
        },
    );
    SkillDescriptor {
        name: "greet".to_string(),
        description: "says hello".to_string(),
        kind: SkillKind::Learned,
        triggers: vec![],
        input_schema: InputSchema {
            properties,
            required: vec!["name".to_string()],
        },
        declared_permissions: vec![],
        network: NetworkAccess::None,
        timeout_secs: 5,
        entry_path: entry,
        workspace_path: workspace,
        source_mtime_ms: 0,
    }
}

fn executor_with(loader: SkillLoader, data_dir: &std::path::Path) -> ExtensionExecutor {
    ExtensionExecutor::new(Arc::new(loader), data_dir.to_path_buf())
}

fn empty_loader() -> SkillLoader {
    SkillLoader::new("/nonexistent")
}

#[tokio::test]
async fn unknown_skill_returns_ok_false() {
    let tmp = tempfile::tempdir().unwrap();
    let executor = executor_with(empty_loader(), tmp.path());
    let outcome = executor.run("u1", "missing", &json!({})).await;
    assert!(!outcome.ok);
    assert!(outcome.result.contains("unknown skill"));
}

#[tokio::test]
async fn schema_failure_returns_ok_false_without_spawning() {
    let tmp = tempfile::tempdir().unwrap();
    let workspace = tmp.path().join("skill");
    fs::create_dir_all(&workspace).unwrap();
    let entry = workspace.join("run.sh");
    write_executable(&entry, "#!/bin/sh\necho should-not-run\n");

    let loader = empty_loader();
    // Inject directly rather than via discover(), since we only need `get`.
    let d = descriptor(entry, workspace);
    loader.insert_for_test(d.clone());

    let executor = executor_with(loader, tmp.path());
    let outcome = executor.run("u1", "greet", &json!({})).await;
    assert!(!outcome.ok);
    assert!(outcome.result.contains("name"));
}

#[tokio::test]
async fn successful_invocation_captures_stdout_and_emitted_files() {
    let tmp = tempfile::tempdir().unwrap();
    let workspace = tmp.path().join("skill");
    fs::create_dir_all(&workspace).unwrap();
    let entry = workspace.join("run.sh");
    write_executable(
        &entry,
        "#!/bin/sh\necho \"hello $XBOT_SKILL_ARGS\"\n echo data > \"$XBOT_SKILL_SCRATCH/out.csv\"\n",
    );

    let loader = empty_loader();
    let d = descriptor(entry, workspace);
    loader.insert_for_test(d);

    let executor = executor_with(loader, tmp.path());
    let outcome = executor
        .run("u1", "greet", &json!({ "name": "ada" }))
        .await;
    assert!(outcome.ok, "{:?}", outcome.result);
    assert!(outcome.result.contains("hello"));
    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].mime, "text/csv");
}

#[tokio::test]
async fn nonzero_exit_is_reported_as_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let workspace = tmp.path().join("skill");
    fs::create_dir_all(&workspace).unwrap();
    let entry = workspace.join("run.sh");
    write_executable(&entry, "#!/bin/sh\necho boom 1>&2\nexit 1\n");

    let loader = empty_loader();
    let d = descriptor(entry, workspace);
    loader.insert_for_test(d);

    let executor = executor_with(loader, tmp.path());
    let outcome = executor
        .run("u1", "greet", &json!({ "name": "ada" }))
        .await;
    assert!(!outcome.ok);
    assert!(outcome.result.contains("boom"));
}

#[tokio::test]
async fn timeout_is_reported_as_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let workspace = tmp.path().join("skill");
    fs::create_dir_all(&workspace).unwrap();
    let entry = workspace.join("run.sh");
    write_executable(&entry, "#!/bin/sh\nsleep 5\n");

    let loader = empty_loader();
    let mut d = descriptor(entry, workspace);
    d.timeout_secs = 1;
    loader.insert_for_test(d);

    let executor = executor_with(loader, tmp.path());
    let outcome = executor
        .run("u1", "greet", &json!({ "name": "ada" }))
        .await;
    assert!(!outcome.ok);
    assert!(outcome.result.contains("timed out"));
}
