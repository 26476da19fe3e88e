// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn manager_profile_reports_manager() {
    let profile = CallerProfile::Manager;
    assert!(profile.is_manager());
    assert_eq!(profile.worker_id(), None);
}

#[test]
fn worker_profile_reports_worker_id() {
    let profile = CallerProfile::Worker {
        worker_id: WorkerId::new("w-1"),
    };
    assert!(!profile.is_manager());
    assert_eq!(profile.worker_id(), Some(&WorkerId::new("w-1")));
}

#[test]
fn caller_profile_serde_roundtrip() {
    let profile = CallerProfile::Worker {
        worker_id: WorkerId::new("w-2"),
    };
    let json = serde_json::to_string(&profile).unwrap();
    let back: CallerProfile = serde_json::from_str(&json).unwrap();
    assert_eq!(profile, back);
}
