// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A small recursive-descent parser covering the slice of shell syntax the
//! allow-list check needs: words (bare, single-quoted, double-quoted, with
//! backslash escapes), pipelines (`|`), logical lists (`&&`, `||`), command
//! separators (`;`), and parenthesized subshells.
//!
//! Deliberately not modeled: redirections, here-docs, variable/command
//! substitution, brace groups, background (`&`) jobs. Anything using that
//! syntax fails to parse, and a parse failure is treated as denied by the
//! caller — never as permitted-by-default.

use crate::ast::{AndOrList, Command, CommandList, LogicalOp, Pipeline, SimpleCommand};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated quote starting at byte {0}")]
    UnterminatedQuote(usize),
    #[error("unexpected end of input, expected a command")]
    UnexpectedEof,
    #[error("unmatched closing parenthesis at byte {0}")]
    UnmatchedCloseParen(usize),
    #[error("unmatched opening parenthesis")]
    UnmatchedOpenParen,
    #[error("unsupported syntax at byte {0}: {1}")]
    Unsupported(usize, String),
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Word(String),
    Pipe,
    And,
    Or,
    Semi,
    LParen,
    RParen,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b == b' ' || b == b'\t' || b == b'\n' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Tok>, ParseError> {
        self.skip_ws();
        let Some(b) = self.peek_byte() else {
            return Ok(None);
        };
        match b {
            b'|' => {
                self.pos += 1;
                if self.peek_byte() == Some(b'|') {
                    self.pos += 1;
                    Ok(Some(Tok::Or))
                } else {
                    Ok(Some(Tok::Pipe))
                }
            }
            b'&' => {
                self.pos += 1;
                if self.peek_byte() == Some(b'&') {
                    self.pos += 1;
                    Ok(Some(Tok::And))
                } else {
                    Err(ParseError::Unsupported(self.pos - 1, "background (&)".into()))
                }
            }
            b';' => {
                self.pos += 1;
                Ok(Some(Tok::Semi))
            }
            b'(' => {
                self.pos += 1;
                Ok(Some(Tok::LParen))
            }
            b')' => {
                self.pos += 1;
                Ok(Some(Tok::RParen))
            }
            b'>' | b'<' => Err(ParseError::Unsupported(self.pos, "redirection".into())),
            b'$' | b'`' => Err(ParseError::Unsupported(
                self.pos,
                "expansion/substitution".into(),
            )),
            _ => self.word().map(Some),
        }
    }

    fn word(&mut self) -> Result<Tok, ParseError> {
        let mut out = String::new();
        loop {
            let Some(b) = self.peek_byte() else { break };
            match b {
                b' ' | b'\t' | b'\n' | b'|' | b'&' | b';' | b'(' | b')' => break,
                b'$' | b'`' => {
                    return Err(ParseError::Unsupported(
                        self.pos,
                        "expansion/substitution".into(),
                    ))
                }
                b'\'' => {
                    let start = self.pos;
                    self.pos += 1;
                    let begin = self.pos;
                    while self.peek_byte().is_some_and(|c| c != b'\'') {
                        self.pos += 1;
                    }
                    if self.peek_byte() != Some(b'\'') {
                        return Err(ParseError::UnterminatedQuote(start));
                    }
                    out.push_str(&self.src[begin..self.pos]);
                    self.pos += 1;
                }
                b'"' => {
                    let start = self.pos;
                    self.pos += 1;
                    loop {
                        match self.peek_byte() {
                            None => return Err(ParseError::UnterminatedQuote(start)),
                            Some(b'"') => {
                                self.pos += 1;
                                break;
                            }
                            Some(b'\\') => {
                                self.pos += 1;
                                if let Some(c) = self.peek_byte() {
                                    out.push(c as char);
                                    self.pos += 1;
                                }
                            }
                            Some(b'$') | Some(b'`') => {
                                return Err(ParseError::Unsupported(
                                    self.pos,
                                    "expansion/substitution".into(),
                                ))
                            }
                            Some(c) => {
                                out.push(c as char);
                                self.pos += 1;
                            }
                        }
                    }
                }
                b'\\' => {
                    self.pos += 1;
                    if let Some(c) = self.peek_byte() {
                        out.push(c as char);
                        self.pos += 1;
                    }
                }
                c => {
                    out.push(c as char);
                    self.pos += 1;
                }
            }
        }
        Ok(Tok::Word(out))
    }
}

struct Parser<'a> {
    toks: Vec<(usize, Tok)>,
    idx: usize,
    _src: &'a str,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(src);
        let mut toks = Vec::new();
        loop {
            let start = lexer.pos;
            match lexer.next_token()? {
                Some(tok) => toks.push((start, tok)),
                None => break,
            }
        }
        Ok(Self {
            toks,
            idx: 0,
            _src: src,
        })
    }

    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.idx).map(|(_, t)| t)
    }

    fn bump(&mut self) -> Option<Tok> {
        let t = self.toks.get(self.idx).map(|(_, t)| t.clone());
        if t.is_some() {
            self.idx += 1;
        }
        t
    }

    fn parse_command_list(&mut self, inside_parens: bool) -> Result<CommandList, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(Tok::RParen) => {
                    if inside_parens {
                        break;
                    }
                    let pos = self.toks[self.idx].0;
                    return Err(ParseError::UnmatchedCloseParen(pos));
                }
                _ => {}
            }
            items.push(self.parse_and_or()?);
            match self.peek() {
                Some(Tok::Semi) => {
                    self.bump();
                }
                _ => break,
            }
        }
        Ok(CommandList { items })
    }

    fn parse_and_or(&mut self) -> Result<AndOrList, ParseError> {
        let first = self.parse_pipeline()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Tok::And) => LogicalOp::And,
                Some(Tok::Or) => LogicalOp::Or,
                _ => break,
            };
            self.bump();
            rest.push((op, self.parse_pipeline()?));
        }
        Ok(AndOrList { first, rest })
    }

    fn parse_pipeline(&mut self) -> Result<Pipeline, ParseError> {
        let mut commands = vec![self.parse_command()?];
        while matches!(self.peek(), Some(Tok::Pipe)) {
            self.bump();
            commands.push(self.parse_command()?);
        }
        Ok(Pipeline { commands })
    }

    fn parse_command(&mut self) -> Result<Command, ParseError> {
        if matches!(self.peek(), Some(Tok::LParen)) {
            self.bump();
            let inner = self.parse_command_list(true)?;
            match self.bump() {
                Some(Tok::RParen) => Ok(Command::Subshell(inner)),
                _ => Err(ParseError::UnmatchedOpenParen),
            }
        } else {
            self.parse_simple_command().map(Command::Simple)
        }
    }

    fn parse_simple_command(&mut self) -> Result<SimpleCommand, ParseError> {
        let name = match self.bump() {
            Some(Tok::Word(w)) => w,
            _ => return Err(ParseError::UnexpectedEof),
        };
        let mut args = Vec::new();
        while let Some(Tok::Word(_)) = self.peek() {
            if let Some(Tok::Word(w)) = self.bump() {
                args.push(w);
            }
        }
        Ok(SimpleCommand { name, args })
    }
}

/// Parse `src` into a [`CommandList`]. Any syntax outside the supported
/// subset (redirections, expansions, background jobs, unterminated quotes,
/// unbalanced parens) is a parse error, never silently accepted.
pub fn parse(src: &str) -> Result<CommandList, ParseError> {
    let mut parser = Parser::new(src)?;
    let list = parser.parse_command_list(false)?;
    if parser.idx != parser.toks.len() {
        let pos = parser.toks[parser.idx].0;
        return Err(ParseError::UnmatchedCloseParen(pos));
    }
    Ok(list)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
