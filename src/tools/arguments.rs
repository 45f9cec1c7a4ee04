//! Typed access to tool call arguments.
//!
//! Every accessor reports failures as [`KnotError::Validation`] naming the
//! dotted path of the offending field, so nested objects such as
//! `user.address.city` are identified precisely.

use serde_json::Value;

use super::validation::json_type_name;
use crate::error::{KnotError, Result};

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: Value,
    path: Option<String>,
}

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self { value, path: None }
    }

    fn nested(value: Value, path: String) -> Self {
        Self {
            value,
            path: Some(path),
        }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// Dotted path of `key` relative to the top-level arguments.
    pub fn field(&self, key: &str) -> String {
        match &self.path {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.to_string(),
        }
    }

    /// Get a value by key. `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key).filter(|v| !v.is_null())
    }

    /// Get a required string argument.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get_str_opt(key)?
            .ok_or_else(|| KnotError::validation(self.field(key), "field required"))
    }

    /// Get an optional string argument. Present with another type is an error.
    pub fn get_str_opt(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.type_error(key, "string", other)),
        }
    }

    /// Get an optional boolean argument.
    pub fn get_bool_opt(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.type_error(key, "boolean", other)),
        }
    }

    /// Get a required nested object.
    pub fn get_object(&self, key: &str) -> Result<ToolArguments> {
        self.get_object_opt(key)?
            .ok_or_else(|| KnotError::validation(self.field(key), "field required"))
    }

    /// Get an optional nested object.
    pub fn get_object_opt(&self, key: &str) -> Result<Option<ToolArguments>> {
        match self.get(key) {
            None => Ok(None),
            Some(v @ Value::Object(_)) => Ok(Some(Self::nested(v.clone(), self.field(key)))),
            Some(other) => Err(self.type_error(key, "object", other)),
        }
    }

    /// Get a required array of objects, each scoped as `key[i]`.
    pub fn get_object_array(&self, key: &str) -> Result<Vec<ToolArguments>> {
        let items = match self.get(key) {
            None => return Err(KnotError::validation(self.field(key), "field required")),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(self.type_error(key, "array", other)),
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}[{i}]", self.field(key));
                match item {
                    Value::Object(_) => Ok(Self::nested(item.clone(), path)),
                    other => Err(KnotError::validation(
                        path,
                        format!("expected object, got {}", json_type_name(other)),
                    )),
                }
            })
            .collect()
    }

    fn type_error(&self, key: &str, expected: &str, got: &Value) -> KnotError {
        KnotError::validation(
            self.field(key),
            format!("expected {expected}, got {}", json_type_name(got)),
        )
    }
}
