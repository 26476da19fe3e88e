// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::parser::parse;

fn check(src: &str) -> Result<(), ShellGuardError> {
    let ast = parse(src).unwrap();
    validate_allowlist(&ast, &AllowlistConfig::default())?;
    check_sensitive_paths(&ast)
}

#[test]
fn allowlisted_command_passes() {
    assert!(check("cat a.txt").is_ok());
}

#[test]
fn non_allowlisted_command_is_denied() {
    let err = check("rm -rf /").unwrap_err();
    assert_eq!(err, ShellGuardError::ProgramNotAllowed("rm".to_string()));
}

#[test]
fn pipeline_is_denied_if_any_segment_is_not_allowlisted() {
    let err = check("curl example.com | rm -rf /").unwrap_err();
    assert_eq!(err, ShellGuardError::ProgramNotAllowed("rm".to_string()));
}

#[test]
fn pipeline_of_allowlisted_commands_passes() {
    assert!(check("curl example.com | grep foo").is_ok());
}

#[test]
fn docker_compose_is_treated_as_one_allowlisted_invocation() {
    assert!(check("docker compose ps").is_ok());
}

#[test]
fn bare_docker_is_allowlisted_on_its_own() {
    assert!(check("docker ps").is_ok());
}

#[test]
fn sensitive_arg_denied_even_on_allowlisted_command() {
    let err = check("cat .env").unwrap_err();
    assert_eq!(err, ShellGuardError::SensitivePath(".env".to_string()));
}

#[test]
fn sensitive_fragment_denied_case_insensitively() {
    let err = check("cat API_SECRET.txt").unwrap_err();
    assert!(matches!(err, ShellGuardError::SensitivePath(_)));
}

#[test]
fn sensitive_arg_denied_even_behind_non_allowlisted_command_check_order() {
    // Allow-list check runs first in `check()`, so a non-allowlisted
    // command reading a sensitive path reports the allow-list denial.
    let err = check("rm .env").unwrap_err();
    assert_eq!(err, ShellGuardError::ProgramNotAllowed("rm".to_string()));
}

#[test]
fn subshell_commands_are_also_checked() {
    let err = check("(rm -rf / )").unwrap_err();
    assert_eq!(err, ShellGuardError::ProgramNotAllowed("rm".to_string()));
}

#[test]
fn sed_and_awk_and_head_and_tail_are_allowlisted() {
    assert!(check("sed -n '1p' a.txt").is_ok());
    assert!(check("awk '{print}' a.txt").is_ok());
    assert!(check("head -n 5 a.txt").is_ok());
    assert!(check("tail -n 5 a.txt").is_ok());
}
