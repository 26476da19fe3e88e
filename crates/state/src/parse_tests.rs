// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::markers::render_canonical;

#[test]
fn parses_canonical_shape() {
    let content = render_canonical("", "version: 1\nname: alice\n");
    let (v, kind) = parse_tolerant(&content).expect("parses");
    assert_eq!(kind, SourceKind::Canonical);
    assert_eq!(v["name"], "alice");
}

#[test]
fn parses_legacy_frontmatter_shape() {
    let content = "---\nname: bob\nversion: 1\n---\nSome prose after.\n";
    let (v, kind) = parse_tolerant(content).expect("parses");
    assert_eq!(kind, SourceKind::LegacyFrontmatter);
    assert_eq!(v["name"], "bob");
}

#[test]
fn parses_legacy_bare_fence_shape() {
    let content = "Some notes\n```yaml\nname: carol\nversion: 1\n```\nmore notes\n";
    let (v, kind) = parse_tolerant(content).expect("parses");
    assert_eq!(kind, SourceKind::LegacyBareYaml);
    assert_eq!(v["name"], "carol");
}

#[test]
fn parses_legacy_whole_yaml_shape() {
    let content = "name: dave\nversion: 1\n";
    let (v, kind) = parse_tolerant(content).expect("parses");
    assert_eq!(kind, SourceKind::LegacyWholeYaml);
    assert_eq!(v["name"], "dave");
}

#[test]
fn unrecoverable_content_returns_none() {
    let content = "this is not yaml: [unterminated\nand not frontmatter either";
    assert!(parse_tolerant(content).is_none());
}

#[test]
fn prefers_canonical_over_legacy_when_both_present() {
    // a canonical block happens to also satisfy bare-fence parsing; canonical wins.
    let content = render_canonical("preamble", "version: 1\nname: erin\n");
    let (_, kind) = parse_tolerant(&content).expect("parses");
    assert_eq!(kind, SourceKind::Canonical);
}
