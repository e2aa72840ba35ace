//! Settings validation: checks that must pass before a resource is resolved.

use crate::error::ConfigError;
use serde_json::Value;

/// Raw JSON settings: `path`, when present, must be a string.
pub fn validate_settings_value(value: &Value) -> Result<(), ConfigError> {
    match value.get("path") {
        None | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(ConfigError::PathNotString),
    }
}

pub fn validate_entity_kind(kind: &str) -> Result<(), ConfigError> {
    if kind.trim().is_empty() {
        return Err(ConfigError::MissingModel);
    }
    Ok(())
}

/// Base paths are mounted as-is and must be absolute.
pub fn validate_path(path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Prefix and suffix segments: empty, or starting with '/'.
pub fn validate_segment(segment: &str) -> Result<(), ConfigError> {
    if segment.is_empty() {
        return Ok(());
    }
    validate_path(segment)
}
