//! Validate tool call arguments against a tool's JSON Schema before the
//! typed payload is built.

use serde_json::Value;

use crate::error::{KnotError, Result};

/// Validate tool arguments against a JSON Schema.
///
/// Top-level only: schema type, required field presence, property types and
/// string enums. `null` or missing arguments are read as an empty object.
/// Returns the first violation found.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<()> {
    let empty = serde_json::Map::new();
    let obj = match args {
        Value::Object(obj) => obj,
        Value::Null => &empty,
        other => {
            if schema.get("type").and_then(|v| v.as_str()) == Some("object") {
                return Err(KnotError::validation(
                    "arguments",
                    format!("expected object, got {}", json_type_name(other)),
                ));
            }
            return Ok(());
        }
    };

    if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
        for name in required.iter().filter_map(|f| f.as_str()) {
            if obj.get(name).map_or(true, Value::is_null) {
                return Err(KnotError::validation(name, "field required"));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) else {
        return Ok(());
    };

    for (key, value) in obj {
        if value.is_null() {
            continue;
        }
        let Some(prop_schema) = properties.get(key) else {
            continue;
        };
        if let Some(expected_type) = prop_schema.get("type").and_then(|v| v.as_str()) {
            if !value_matches_type(value, expected_type) {
                return Err(KnotError::validation(
                    key.as_str(),
                    format!("expected {expected_type}, got {}", json_type_name(value)),
                ));
            }
        }
        if let Some(allowed) = prop_schema.get("enum").and_then(|v| v.as_array()) {
            if !allowed.contains(value) {
                let names: Vec<&str> = allowed.iter().filter_map(|v| v.as_str()).collect();
                return Err(KnotError::validation(
                    key.as_str(),
                    format!("expected one of {}, got {value}", names.join(", ")),
                ));
            }
        }
    }

    Ok(())
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "session_type": { "type": "string", "enum": ["card_switcher", "transaction_link"] },
                "external_user_id": { "type": "string" },
            },
            "required": ["session_type"],
        })
    }

    #[test]
    fn rejects_non_object_args_when_schema_expects_object() {
        let err = validate_arguments(&json!("not an object"), &session_schema()).unwrap_err();
        assert!(err.to_string().contains("expected object"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = validate_arguments(&json!({}), &session_schema()).unwrap_err();
        assert_eq!(err.to_string(), "invalid session_type: field required");
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let args = json!({ "session_type": null });
        assert!(validate_arguments(&args, &session_schema()).is_err());
    }

    #[test]
    fn null_args_read_as_empty_object() {
        let schema = json!({ "type": "object", "properties": {}, "required": [] });
        assert!(validate_arguments(&Value::Null, &schema).is_ok());
    }

    #[test]
    fn rejects_field_with_wrong_type() {
        let args = json!({ "session_type": "card_switcher", "external_user_id": 42 });
        let err = validate_arguments(&args, &session_schema()).unwrap_err();
        assert_eq!(err.to_string(), "invalid external_user_id: expected string, got number");
    }

    #[test]
    fn rejects_value_outside_enum() {
        let args = json!({ "session_type": "vault" });
        let err = validate_arguments(&args, &session_schema()).unwrap_err();
        assert!(err.to_string().contains("expected one of card_switcher, transaction_link"));
    }

    #[test]
    fn accepts_extra_fields_not_in_schema_properties() {
        let args = json!({ "session_type": "transaction_link", "extra": true });
        assert!(validate_arguments(&args, &session_schema()).is_ok());
    }

    #[test]
    fn accepts_optional_field_when_absent_or_null() {
        let schema = session_schema();
        assert!(validate_arguments(&json!({ "session_type": "card_switcher" }), &schema).is_ok());
        assert!(validate_arguments(
            &json!({ "session_type": "card_switcher", "external_user_id": null }),
            &schema
        )
        .is_ok());
    }

    #[test]
    fn accepts_any_args_when_schema_is_empty_object() {
        assert!(validate_arguments(&json!({ "anything": 42 }), &json!({})).is_ok());
    }
}
