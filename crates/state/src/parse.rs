// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tolerant reading: a state file may be in the current canonical shape or
//! one of three legacy shapes this protocol grew out of. `read_state` tries
//! each in order and reports which one matched so callers (and the Skill
//! Loader, which reuses this reader for `SKILL.md` frontmatter) can tell
//! humans which files are due for a rewrite.

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `<!-- XBOT_STATE_BEGIN -->` / fenced YAML / `<!-- XBOT_STATE_END -->`.
    Canonical,
    /// `---\nyaml\n---\nprose` (classic Jekyll-style frontmatter).
    LegacyFrontmatter,
    /// A single ```yaml fenced block with no markers.
    LegacyBareYaml,
    /// The entire file content is one YAML document.
    LegacyWholeYaml,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Canonical => "canonical",
            SourceKind::LegacyFrontmatter => "legacy_frontmatter",
            SourceKind::LegacyBareYaml => "legacy_bare_yaml",
            SourceKind::LegacyWholeYaml => "legacy_whole_yaml",
        };
        write!(f, "{s}")
    }
}

/// Try every known variant in order, returning the first that parses.
pub fn parse_tolerant(content: &str) -> Option<(Value, SourceKind)> {
    if let Some((_, yaml_text)) = crate::markers::extract_canonical(content) {
        if let Ok(v) = serde_yaml::from_str::<Value>(yaml_text) {
            return Some((v, SourceKind::Canonical));
        }
    }
    if let Some(v) = parse_frontmatter(content) {
        return Some((v, SourceKind::LegacyFrontmatter));
    }
    if let Some(v) = parse_bare_fence(content) {
        return Some((v, SourceKind::LegacyBareYaml));
    }
    if let Ok(v) = serde_yaml::from_str::<Value>(content) {
        if v.is_object() {
            return Some((v, SourceKind::LegacyWholeYaml));
        }
    }
    None
}

fn parse_frontmatter(content: &str) -> Option<Value> {
    let rest = content.strip_prefix("---\n")?;
    let end = rest.find("\n---")?;
    let yaml_text = &rest[..end];
    serde_yaml::from_str::<Value>(yaml_text).ok()
}

fn parse_bare_fence(content: &str) -> Option<Value> {
    let start = content.find("```yaml")?;
    let after = start + "```yaml".len();
    let rest = &content[after..];
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let end = rest.find("```")?;
    serde_yaml::from_str::<Value>(&rest[..end]).ok()
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
