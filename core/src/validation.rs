//! Mapping of server validation failures onto per-field messages.
//!
//! The server reports failures as
//! `{ "errors": { "errors": { "<field>": { "message": "..." } } } }`.
//! Every level of that document may be missing or malformed. A missing
//! level means no error for that part; it never fails the mapping.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::draft::Field;

/// Message that replaces whatever the server said about the owner.
pub const OWNER_REQUIRED_MESSAGE: &str = "Please select an owner";

/// Per-field error messages shown under the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    messages: BTreeMap<Field, String>,
}

#[derive(Deserialize)]
struct FailureBody {
    #[serde(default)]
    errors: Option<Value>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the error map from a raw failure body. Bodies that are not JSON
    /// produce an empty map.
    pub fn from_failure_body(body: &str) -> Self {
        match serde_json::from_str::<FailureBody>(body) {
            Ok(FailureBody { errors: Some(outer) }) => Self::from_errors_value(&outer),
            Ok(FailureBody { errors: None }) => Self::new(),
            Err(err) => {
                tracing::debug!(error = %err, "failure body is not a validation document");
                Self::new()
            }
        }
    }

    fn from_errors_value(outer: &Value) -> Self {
        let Some(entries) = outer.get("errors").and_then(Value::as_object) else {
            return Self::new();
        };

        let mut messages = BTreeMap::new();
        for (key, entry) in entries {
            let Ok(field) = key.parse::<Field>() else {
                tracing::debug!(field = %key, "ignoring error for a field the form does not show");
                continue;
            };
            let message = entry
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let message = match field {
                Field::Owner => OWNER_REQUIRED_MESSAGE.to_string(),
                Field::Name | Field::Type => message.to_string(),
            };
            messages.insert(field, message);
        }
        Self { messages }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.messages.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.messages.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl FromIterator<(Field, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}
