// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use assert_cmd::Command;

fn xbot() -> Command {
    Command::cargo_bin("xbot").expect("binary builds")
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("command runs");
    String::from_utf8(output.stdout).expect("stdout is utf8")
}

#[test]
fn list_tasks_on_empty_data_dir_succeeds_with_no_tasks() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = xbot();
    cmd.args(["--data-dir", tmp.path().to_str().unwrap(), "list-tasks"]);
    let stdout = stdout_of(&mut cmd);
    assert!(stdout.contains("no tasks on record"));
}

#[test]
fn inspect_unknown_worker_exits_with_user_error_code() {
    let tmp = tempfile::tempdir().unwrap();
    xbot()
        .args([
            "--data-dir",
            tmp.path().to_str().unwrap(),
            "inspect-worker",
            "ghost",
        ])
        .assert()
        .code(2);
}

#[test]
fn replay_unknown_task_exits_with_user_error_code() {
    let tmp = tempfile::tempdir().unwrap();
    xbot()
        .args([
            "--data-dir",
            tmp.path().to_str().unwrap(),
            "replay-task",
            "does-not-exist",
        ])
        .assert()
        .code(2);
}

#[test]
fn missing_data_dir_is_a_user_error() {
    xbot()
        .args(["--data-dir", "/no/such/path", "list-tasks"])
        .assert()
        .code(2);
}

#[test]
fn migrate_state_dry_run_on_empty_dir_reports_zero_files() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = xbot();
    cmd.args([
        "--data-dir",
        tmp.path().to_str().unwrap(),
        "migrate-state",
        "--dry-run",
    ]);
    let stdout = stdout_of(&mut cmd);
    assert!(stdout.contains("0 state file(s) scanned"));
}

#[test]
fn cancel_unknown_task_exits_with_user_error_code() {
    let tmp = tempfile::tempdir().unwrap();
    xbot()
        .args([
            "--data-dir",
            tmp.path().to_str().unwrap(),
            "cancel-task",
            "does-not-exist",
        ])
        .assert()
        .code(2);
}
