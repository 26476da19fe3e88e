// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `migrate-state`: walk every canonical state file under `DATA_DIR` and
//! rewrite the ones still in a legacy shape (frontmatter / bare yaml /
//! whole yaml) into the current marker-delimited form. `write_state`
//! already renders canonically on every call, so migrating a file is just
//! a `read_state` followed by a `write_state` of the same payload.

use std::path::{Path, PathBuf};

use anyhow::Result;
use xbot_state::SourceKind;

use crate::exit_error::ExitError;

struct ScanResult {
    path: PathBuf,
    source_kind: SourceKind,
}

fn walk_markdown(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            walk_markdown(&path, out);
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            out.push(path);
        }
    }
}

pub async fn run(data_dir: &Path, apply: bool) -> Result<()> {
    let mut files = Vec::new();
    walk_markdown(data_dir, &mut files);
    files.sort();

    let mut scanned = Vec::new();
    let mut corrupt = Vec::new();
    for path in &files {
        match xbot_state::read_state(path) {
            Ok(payload) => scanned.push(ScanResult {
                path: path.clone(),
                source_kind: payload.source_kind,
            }),
            Err(err) => corrupt.push((path.clone(), err)),
        }
    }

    let legacy: Vec<&ScanResult> = scanned
        .iter()
        .filter(|r| r.source_kind != SourceKind::Canonical)
        .collect();

    println!(
        "{} state file(s) scanned, {} already canonical, {} legacy, {} unreadable",
        files.len(),
        scanned.len() - legacy.len(),
        legacy.len(),
        corrupt.len(),
    );

    for result in &legacy {
        let verb = if apply { "migrating" } else { "would migrate" };
        println!("  {verb} {} (from {})", result.path.display(), result.source_kind);
    }
    for (path, err) in &corrupt {
        println!("  UNREADABLE {}: {err}", path.display());
    }

    if apply {
        for result in &legacy {
            let payload = xbot_state::read_state(&result.path)?;
            xbot_state::write_state(&result.path, &payload.data)?;
        }
    }

    if !corrupt.is_empty() {
        return Err(ExitError::new(
            3,
            format!("{} state file(s) could not be parsed under any known variant", corrupt.len()),
        )
        .into());
    }

    Ok(())
}
