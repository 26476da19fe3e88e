// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Draft-07 subset validator for a skill's `input_schema` (§4.5 step 2):
//! `type`, `properties`, `required`, `enum`, `items`, `minimum`, `maximum`,
//! `default`. Anything outside that subset is simply not checked rather
//! than rejected — a skill author writing a fuller JSON-Schema dialect
//! shouldn't have extra keywords silently break their skill.

use serde_json::Value;
use thiserror::Error;
use xbot_core::{InputSchema, SchemaProperty};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SchemaError(pub String);

/// Validate `args` against `schema`. `args` must be a JSON object; every
/// name in `schema.required` must be present; every property present in
/// `args` that's also declared in `schema.properties` is checked against
/// that property's constraints.
pub fn validate_args(args: &Value, schema: &InputSchema) -> Result<(), SchemaError> {
    let obj = args
        .as_object()
        .ok_or_else(|| SchemaError("args must be a JSON object".to_string()))?;

    for name in &schema.required {
        if !obj.contains_key(name) {
            return Err(SchemaError(format!("missing required property: {name}")));
        }
    }

    for (key, value) in obj {
        if let Some(prop) = schema.properties.get(key) {
            validate_property(key, value, prop)?;
        }
    }
    Ok(())
}

fn validate_property(name: &str, value: &Value, prop: &SchemaProperty) -> Result<(), SchemaError> {
    check_type(name, value, &prop.type_name)?;

    if let Some(allowed) = &prop.r#enum {
        if !allowed.contains(value) {
            return Err(SchemaError(format!(
                "property '{name}' is not one of the allowed values"
            )));
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = prop.minimum {
            if n < min {
                return Err(SchemaError(format!(
                    "property '{name}' is below minimum {min}"
                )));
            }
        }
        if let Some(max) = prop.maximum {
            if n > max {
                return Err(SchemaError(format!(
                    "property '{name}' exceeds maximum {max}"
                )));
            }
        }
    }

    if prop.type_name == "array" {
        if let (Some(item_schema), Some(items)) = (&prop.items, value.as_array()) {
            for item in items {
                validate_property(name, item, item_schema)?;
            }
        }
    }

    Ok(())
}

fn check_type(name: &str, value: &Value, type_name: &str) -> Result<(), SchemaError> {
    let matches = match type_name {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        // Unknown/unsupported type keywords are out of the validated
        // subset — accept rather than reject so a richer declared schema
        // doesn't make every call fail.
        _ => true,
    };
    if matches {
        Ok(())
    } else {
        Err(SchemaError(format!(
            "property '{name}' expected type '{type_name}'"
        )))
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
