// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamped backup rotation for state files that fail to parse under any
//! recognized variant. Adapted from the snapshot durability path elsewhere
//! in the ecosystem, which rotates numbered `.bak`/`.bak.N` suffixes; here
//! the suffix is a timestamp instead, since these backups are meant to be
//! opened and diffed by a human, not replayed by a recovery routine.

use std::fs;
use std::path::{Path, PathBuf};

pub const MAX_BAK_FILES: usize = 3;

/// Build the backup path for `path` at the given `timestamp` (formatted
/// `YYYYMMDD-HHMMSS` by the caller), then sweep the directory so at most
/// [`MAX_BAK_FILES`] backups for this file remain, oldest removed first.
pub fn rotate_bak_path(path: &Path, timestamp: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let bak_path = path.with_file_name(format!("{file_name}.bak-{timestamp}"));
    sweep_old_backups(path, &file_name);
    bak_path
}

fn sweep_old_backups(path: &Path, file_name: &str) {
    let dir = match path.parent() {
        Some(d) => d,
        None => return,
    };
    let prefix = format!("{file_name}.bak-");
    let mut entries: Vec<(String, PathBuf)> = match fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                name.starts_with(&prefix).then(|| (name, e.path()))
            })
            .collect(),
        Err(_) => return,
    };
    // Lexicographic sort on the YYYYMMDD-HHMMSS suffix is also chronological.
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let overflow = entries.len().saturating_sub(MAX_BAK_FILES.saturating_sub(1));
    for (_, p) in entries.into_iter().take(overflow) {
        let _ = fs::remove_file(p);
    }
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
