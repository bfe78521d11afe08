//! Shape enforcement for inbound documents
//!
//! Rules apply only to keys that are present:
//! - `run_list` must be an array of strings
//! - `env_run_lists` must map names to arrays of strings
//! - attribute fields sent as `null` become `{}`
//!
//! Absent keys are never injected.

use crate::document::ConfigDocument;
use crate::error::{DocumentError, SchemaError};
use serde_json::{Map, Value};

pub const RUN_LIST: &str = "run_list";
pub const ENV_RUN_LISTS: &str = "env_run_lists";

/// Attribute fields whose explicit `null` means "empty"
pub const ATTRIBUTE_FIELDS: [&str; 6] = [
    "normal",
    "default",
    "automatic",
    "override",
    "default_attributes",
    "override_attributes",
];

/// Normalize a decoded JSON object
///
/// Unrecognized keys pass through unchanged.
///
/// # Errors
/// Returns [`SchemaError`] naming `run_list` or `env_run_lists` when either
/// has the wrong shape
pub fn normalize(mut raw: Map<String, Value>) -> Result<ConfigDocument, SchemaError> {
    if let Some(value) = raw.get_mut(RUN_LIST) {
        let run_list = string_list(RUN_LIST, std::mem::take(value))?;
        *value = Value::from(run_list);
    }

    if let Some(value) = raw.get_mut(ENV_RUN_LISTS) {
        let env_run_lists = env_run_lists(std::mem::take(value))?;
        *value = Value::Object(env_run_lists);
    }

    for field in ATTRIBUTE_FIELDS {
        if let Some(value) = raw.get_mut(field) {
            if value.is_null() {
                *value = Value::Object(Map::new());
            }
        }
    }

    Ok(ConfigDocument::from_normalized(raw))
}

/// Decode a request body and normalize it
///
/// # Errors
/// - [`DocumentError::Decode`] for malformed JSON
/// - [`DocumentError::NotAnObject`] when the top level is not an object
/// - [`DocumentError::Schema`] when normalization fails
pub fn parse_document(bytes: &[u8]) -> Result<ConfigDocument, DocumentError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(raw) => Ok(normalize(raw)?),
        other => Err(DocumentError::NotAnObject {
            found: type_name(&other),
        }),
    }
}

fn string_list(field: &'static str, value: Value) -> Result<Vec<String>, SchemaError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(SchemaError::new(
                field,
                format!("expected an array, got {}", type_name(&other)),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s),
            other => Err(SchemaError::new(
                field,
                format!("element {i} is {}, expected a string", type_name(&other)),
            )),
        })
        .collect()
}

fn env_run_lists(value: Value) -> Result<Map<String, Value>, SchemaError> {
    let lists = match value {
        Value::Object(lists) => lists,
        other => {
            return Err(SchemaError::new(
                ENV_RUN_LISTS,
                format!("expected an object, got {}", type_name(&other)),
            ))
        }
    };

    lists
        .into_iter()
        .map(|(env, list)| {
            let items = string_list(ENV_RUN_LISTS, list).map_err(|e| {
                SchemaError::new(ENV_RUN_LISTS, format!("environment '{env}': {}", e.reason()))
            })?;
            Ok((env, Value::from(items)))
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
