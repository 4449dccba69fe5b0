//! Value Tree: the generic parsed form of TOML and JSON documents.
//!
//! Both formats are parsed into `serde_json::Value` (built with `preserve_order`,
//! so object keys keep document order). Every engine in the crate consumes and
//! produces this shape; nothing here mutates a caller's tree.

use crate::error::ConvertError;
use std::path::Path;

pub use serde_json::{Map, Value};

/// Private key toml uses when a datetime passes through serde.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Text format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Toml,
    Json,
}

impl DataFormat {
    /// Detect the format from a file extension (`toml`, `tml` or `json`).
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> Result<Self, ConvertError> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" | "tml" => Ok(DataFormat::Toml),
            "json" => Ok(DataFormat::Json),
            other => Err(ConvertError::InvalidArgument(format!(
                "Unsupported config file extension: {other:?}"
            ))),
        }
    }

    /// Parse `text` in this format into an object map.
    pub fn parse(self, text: &str) -> Result<Map<String, Value>, ConvertError> {
        match self {
            DataFormat::Toml => parse_toml(text),
            DataFormat::Json => parse_json(text),
        }
    }
}

/// Names are compared lower-cased.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive key lookup; returns the stored key with its value.
pub fn get_ci<'a>(map: &'a Map<String, Value>, key: &str) -> Option<(&'a String, &'a Value)> {
    map.iter().find(|(k, _)| names_match(k, key))
}

/// Parse TOML text into a Value Tree object.
pub fn parse_toml(text: &str) -> Result<Map<String, Value>, ConvertError> {
    let table: toml::Table = toml::from_str(text)?;
    let value = normalize_datetimes(serde_json::to_value(table)?);
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConvertError::format("<root>", "TOML document is not a table")),
    }
}

/// Parse JSON text into a Value Tree object.
pub fn parse_json(text: &str) -> Result<Map<String, Value>, ConvertError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(ConvertError::format(
            "<root>",
            format!("expected a JSON object, found {}", type_name(&other)),
        )),
    }
}

/// Datetimes come out of toml as a single-key wrapper object; keep them as text.
///
/// The Value Tree has no datetime type, so this is lossy: a datetime read from
/// TOML is written back by [`to_toml_string`] as a quoted RFC 3339 string.
fn normalize_datetimes(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(s)) = map.get(TOML_DATETIME_KEY) {
                    return Value::String(s.clone());
                }
            }
            Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, normalize_datetimes(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_datetimes).collect()),
        other => other,
    }
}

/// Render an array value as compact bracketed text: `[1,2,3]`.
pub fn render_scalar_array(items: &[Value]) -> String {
    Value::Array(items.to_vec()).to_string()
}

/// Inverse of [`render_scalar_array`] for strings that hold a rendered array.
pub fn parse_rendered_array(text: &str) -> Option<Vec<Value>> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return None;
    }
    serde_json::from_str::<Vec<Value>>(trimmed).ok()
}

/// Drop nulls from objects and arrays; TOML has no null.
pub fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(prune_nulls)
                .collect(),
        ),
        other => other,
    }
}

/// Serialize an object map as TOML text.
///
/// Strings are always written as TOML strings, including text that came from a
/// TOML datetime (see [`parse_toml`]).
pub fn to_toml_string(map: &Map<String, Value>) -> Result<String, ConvertError> {
    let pruned = prune_nulls(Value::Object(map.clone()));
    Ok(toml::to_string_pretty(&pruned)?)
}

/// Short type label for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
