// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ast::Command;

fn names(list: &CommandList) -> Vec<&str> {
    list.all_simple_commands()
        .into_iter()
        .map(|c| c.name.as_str())
        .collect()
}

#[test]
fn parses_single_command_with_args() {
    let list = parse("ls -la /tmp").unwrap();
    let cmds = list.all_simple_commands();
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].name, "ls");
    assert_eq!(cmds[0].args, vec!["-la", "/tmp"]);
}

#[test]
fn parses_pipeline() {
    let list = parse("curl example.com | grep foo").unwrap();
    assert_eq!(names(&list), vec!["curl", "grep"]);
}

#[test]
fn parses_logical_and_list() {
    let list = parse("cat a.txt && cat b.txt").unwrap();
    assert_eq!(names(&list), vec!["cat", "cat"]);
}

#[test]
fn parses_semicolon_separated_list() {
    let list = parse("rm -rf /; echo done").unwrap();
    assert_eq!(names(&list), vec!["rm", "echo"]);
}

#[test]
fn parses_subshell_recursively() {
    let list = parse("(cat a.txt | grep x) && ls").unwrap();
    assert_eq!(names(&list), vec!["cat", "grep", "ls"]);
    let first_cmd = &list.items[0].first.commands[0];
    assert!(matches!(first_cmd, Command::Subshell(_)));
}

#[test]
fn single_and_double_quotes_are_unescaped() {
    let list = parse(r#"grep 'hello world' "a b""#).unwrap();
    let cmds = list.all_simple_commands();
    assert_eq!(cmds[0].args, vec!["hello world", "a b"]);
}

#[test]
fn unterminated_quote_is_a_parse_error() {
    assert!(parse("echo 'unterminated").is_err());
}

#[test]
fn redirection_is_unsupported() {
    assert!(matches!(parse("cat a.txt > b.txt"), Err(ParseError::Unsupported(_, _))));
}

#[test]
fn command_substitution_is_unsupported() {
    assert!(parse("echo $(whoami)").is_err());
    assert!(parse("echo `whoami`").is_err());
}

#[test]
fn background_job_is_unsupported() {
    assert!(matches!(parse("sleep 10 &"), Err(ParseError::Unsupported(_, _))));
}

#[test]
fn unmatched_paren_is_an_error() {
    assert!(parse("(cat a.txt").is_err());
    assert!(parse("cat a.txt)").is_err());
}
