// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal shell AST: enough structure to tell every simple command in a
//! pipeline, list, or subshell apart, without modeling redirections,
//! here-docs, or variable expansion — those are irrelevant to allow-list
//! enforcement and are left to the actual shell at execution time.

/// One word-level command invocation: a program name plus its arguments,
/// already unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl SimpleCommand {
    /// Every word of this command, name included — used for sensitive-path
    /// scanning, which must see the command name too (`cat` itself is
    /// harmless, but `.env` as the argument to anything is not).
    pub fn words(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

/// A sequence of simple commands connected by `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

/// One element of a pipeline: either a simple command or a parenthesized
/// subshell containing a full command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Simple(SimpleCommand),
    Subshell(CommandList),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A pipeline followed by zero or more `&&`/`||`-chained pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndOrList {
    pub first: Pipeline,
    pub rest: Vec<(LogicalOp, Pipeline)>,
}

/// A full parsed command string: `;`-separated and-or lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandList {
    pub items: Vec<AndOrList>,
}

impl CommandList {
    /// Every simple command reachable anywhere in this list, including
    /// inside nested subshells — the unit the allow-list check operates on.
    pub fn all_simple_commands(&self) -> Vec<&SimpleCommand> {
        let mut out = Vec::new();
        for and_or in &self.items {
            collect_pipeline(&and_or.first, &mut out);
            for (_, pipeline) in &and_or.rest {
                collect_pipeline(pipeline, &mut out);
            }
        }
        out
    }
}

fn collect_pipeline<'a>(pipeline: &'a Pipeline, out: &mut Vec<&'a SimpleCommand>) {
    for command in &pipeline.commands {
        match command {
            Command::Simple(cmd) => out.push(cmd),
            Command::Subshell(list) => out.extend(list.all_simple_commands()),
        }
    }
}
