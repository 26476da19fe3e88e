// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The canonical state-file bracket: a markdown comment pair surrounding
//! exactly one fenced YAML block.

pub const STATE_BEGIN_MARKER: &str = "<!-- XBOT_STATE_BEGIN -->";
pub const STATE_END_MARKER: &str = "<!-- XBOT_STATE_END -->";

/// Render `payload` (already-serialized YAML text) into the canonical
/// marker-delimited block, preceded by `prose` (any human-authored content
/// above the state block, preserved byte-for-byte on rewrite).
pub fn render_canonical(prose: &str, yaml_text: &str) -> String {
    let mut out = String::new();
    if !prose.is_empty() {
        out.push_str(prose);
        if !prose.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(STATE_BEGIN_MARKER);
    out.push('\n');
    out.push_str("```yaml\n");
    out.push_str(yaml_text);
    if !yaml_text.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n");
    out.push_str(STATE_END_MARKER);
    out.push('\n');
    out
}

/// Extract `(prose_before, yaml_text)` from a canonical document, if the
/// markers and a fenced block between them are both present.
pub fn extract_canonical(content: &str) -> Option<(&str, &str)> {
    let begin = content.find(STATE_BEGIN_MARKER)?;
    let after_begin = begin + STATE_BEGIN_MARKER.len();
    let end = content[after_begin..].find(STATE_END_MARKER)? + after_begin;
    let prose = &content[..begin];
    let block = content[after_begin..end].trim();
    let fenced = block
        .strip_prefix("```yaml")
        .or_else(|| block.strip_prefix("```"))?
        .trim_start_matches('\n');
    let yaml_text = fenced.strip_suffix("```").unwrap_or(fenced).trim_end();
    Some((prose.trim_end(), yaml_text))
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
