use super::*;

#[test]
fn reminders_doc_round_trips_through_json() {
    let doc = RemindersDoc {
        reminders: vec![ReminderEntry {
            id: "r1".to_string(),
            text: "stand up".to_string(),
            due_at_ms: 1_700_000_000_000,
            fired: false,
        }],
    };
    let value = serde_json::to_value(&doc).unwrap();
    let back: RemindersDoc = serde_json::from_value(value).unwrap();
    assert_eq!(back.reminders.len(), 1);
    assert_eq!(back.reminders[0].id, "r1");
    assert!(!back.reminders[0].fired);
}

#[test]
fn fired_defaults_to_false_when_absent() {
    let value = serde_json::json!({
        "reminders": [{"id": "r2", "text": "call mom", "due_at_ms": 1}]
    });
    let doc: RemindersDoc = serde_json::from_value(value).unwrap();
    assert!(!doc.reminders[0].fired);
}
