// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::collections::BTreeMap;
use xbot_core::InputSchema;

fn url_schema() -> InputSchema {
    let mut properties = BTreeMap::new();
    properties.insert(
        "url".to_string(),
        SchemaProperty {
            type_name: "string".to_string(),
            description: None,
            r#enum: None,
            items: None,
            minimum: None,
            maximum: None,
            default: None,
        },
    );
    properties.insert(
        "count".to_string(),
        SchemaProperty {
            type_name: "integer".to_string(),
            description: None,
            r#enum: None,
            items: None,
            minimum: Some(1.0),
            maximum: Some(10.0),
            default: None,
        },
    );
    InputSchema {
        properties,
        required: vec!["url".to_string()],
    }
}

#[test]
fn accepts_valid_args() {
    let schema = url_schema();
    let args = json!({ "url": "https://example.com/video.mp4", "count": 3 });
    assert!(validate_args(&args, &schema).is_ok());
}

#[test]
fn rejects_missing_required_property() {
    let schema = url_schema();
    let args = json!({ "count": 3 });
    let err = validate_args(&args, &schema).unwrap_err();
    assert!(err.0.contains("url"));
}

#[test]
fn rejects_wrong_type() {
    let schema = url_schema();
    let args = json!({ "url": 42 });
    assert!(validate_args(&args, &schema).is_err());
}

#[test]
fn rejects_value_below_minimum() {
    let schema = url_schema();
    let args = json!({ "url": "x", "count": 0 });
    assert!(validate_args(&args, &schema).is_err());
}

#[test]
fn rejects_value_above_maximum() {
    let schema = url_schema();
    let args = json!({ "url": "x", "count": 11 });
    assert!(validate_args(&args, &schema).is_err());
}

#[test]
fn rejects_args_that_are_not_an_object() {
    let schema = url_schema();
    let args = json!(["url"]);
    assert!(validate_args(&args, &schema).is_err());
}

#[test]
fn enum_constraint_rejects_values_outside_the_set() {
    let mut properties = BTreeMap::new();
    properties.insert(
        "mode".to_string(),
        SchemaProperty {
            type_name: "string".to_string(),
            description: None,
            r#enum: Some(vec![json!("fast"), json!("slow")]),
            items: None,
            minimum: None,
            maximum: None,
            default: None,
        },
    );
    let schema = InputSchema {
        properties,
        required: vec![],
    };
    assert!(validate_args(&json!({ "mode": "fast" }), &schema).is_ok());
    assert!(validate_args(&json!({ "mode": "turbo" }), &schema).is_err());
}

#[test]
fn array_items_are_validated_recursively() {
    let mut properties = BTreeMap::new();
    properties.insert(
        "tags".to_string(),
        SchemaProperty {
            type_name: "array".to_string(),
            description: None,
            r#enum: None,
            items: Some(Box::new(SchemaProperty {
                type_name: "string".to_string(),
                description: None,
                r#enum: None,
                items: None,
                minimum: None,
                maximum: None,
                default: None,
            })),
            minimum: None,
            maximum: None,
            default: None,
        },
    );
    let schema = InputSchema {
        properties,
        required: vec![],
    };
    assert!(validate_args(&json!({ "tags": ["a", "b"] }), &schema).is_ok());
    assert!(validate_args(&json!({ "tags": ["a", 2] }), &schema).is_err());
}

#[test]
fn unknown_properties_not_in_schema_are_ignored() {
    let schema = url_schema();
    let args = json!({ "url": "x", "extra": "whatever" });
    assert!(validate_args(&args, &schema).is_ok());
}
