//! Resource definition documents
//!
//! Documents are the JSON files handed to the CLI as `--cli-input-json`.
//! Some fields are needed before submission (the declared name for the
//! existence probe, the task definition of a service).

use crate::error::{ApplyError, Result};
use serde_json::Value;
use std::path::Path;

/// Read and parse a JSON document
pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApplyError::configuration(path, e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| ApplyError::configuration(path, e.to_string()))
}

/// First non-empty string among `fields`, in order
pub fn string_field(document: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| document.get(*field).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Read a document and return one of its string fields
pub fn read_string_field(path: &Path, fields: &[&str]) -> Result<Option<String>> {
    let document = read_document(path)?;
    Ok(string_field(&document, fields))
}
