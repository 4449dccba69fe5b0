//! Property stripping: drop every object entry whose lower-cased key is a skip property.

use crate::value::{Map, Value};
use std::collections::BTreeSet;

/// Return a copy of `value` without skipped keys at any depth.
///
/// Arrays of scalars are returned as they are; recursion only descends into
/// objects and arrays holding objects or arrays.
pub fn strip_properties(value: &Value, skip: &BTreeSet<String>) -> Value {
    if skip.is_empty() {
        return value.clone();
    }
    match value {
        Value::Object(map) => Value::Object(strip_map(map, skip)),
        Value::Array(items) if items.iter().any(|v| v.is_object() || v.is_array()) => {
            Value::Array(items.iter().map(|v| strip_properties(v, skip)).collect())
        }
        other => other.clone(),
    }
}

pub fn strip_map(map: &Map<String, Value>, skip: &BTreeSet<String>) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| !skip.contains(&key.to_lowercase()))
        .map(|(key, value)| (key.clone(), strip_properties(value, skip)))
        .collect()
}
