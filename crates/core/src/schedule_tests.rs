// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> ScheduledTaskEntry {
    ScheduledTaskEntry {
        id: "sched-1".to_string(),
        crontab: "0 9 * * *".to_string(),
        instruction: "check the watchlist".to_string(),
        enabled: true,
        last_run: None,
        next_run: None,
    }
}

#[test]
fn serde_roundtrip_preserves_fields() {
    let entry = sample();
    let json = serde_json::to_string(&entry).unwrap();
    let back: ScheduledTaskEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, entry.id);
    assert_eq!(back.crontab, entry.crontab);
    assert_eq!(back.enabled, entry.enabled);
}

#[test]
fn enabled_defaults_true_when_field_absent() {
    let value = serde_json::json!({
        "id": "sched-2",
        "crontab": "*/5 * * * *",
        "instruction": "poll rss",
    });
    let entry: ScheduledTaskEntry = serde_json::from_value(value).unwrap();
    assert!(entry.enabled);
}

#[test]
fn doc_defaults_to_empty_task_list() {
    let doc: ScheduledTasksDoc = serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(doc.tasks.is_empty());
}

#[test]
fn doc_roundtrips_a_list_of_entries() {
    let doc = ScheduledTasksDoc {
        tasks: vec![sample()],
    };
    let value = serde_json::to_value(&doc).unwrap();
    let back: ScheduledTasksDoc = serde_json::from_value(value).unwrap();
    assert_eq!(back.tasks.len(), 1);
    assert_eq!(back.tasks[0].id, "sched-1");
}
