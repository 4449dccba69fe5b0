//! Compatibility folding: arrays of `{name, value}` elements become `{name: value}` tables.
//!
//! Elements are the shape a configuration UI sends back (merged nodes): a name,
//! an optional value, and nested `fields` (singular) or `arrays` (repeated).
//! An element's value resolves in this order:
//!
//! 1. a non-null value entry (bracketed array text becomes an array again);
//! 2. a non-empty `arrays` entry, giving a list of folded sub-tables;
//! 3. a non-empty `fields` entry, giving one folded sub-table;
//!
//! and an element with none of these is dropped.
//!
//! At one object level only the last array that folds to a non-empty table
//! replaces its key; earlier sibling arrays stay arrays unless
//! `fold_all_sibling_arrays` is set.

use crate::error::ConvertError;
use crate::rules::{ConversionScheme, Rule, RuleSet, DEFAULT_NAME_KEY, DEFAULT_VALUE_KEY};
use crate::value::{get_ci, parse_rendered_array, type_name, Map, Value};
use serde::{Deserialize, Serialize};
use tracing::trace;

const FIELDS_KEY: &str = "fields";
const ARRAYS_KEY: &str = "arrays";

/// Fold behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldOptions {
    /// Fold every array-valued key at a level instead of only the last one.
    #[serde(default)]
    pub fold_all_sibling_arrays: bool,
}

/// Fold one object level and everything below it.
pub fn fold_object(
    map: &Map<String, Value>,
    rules: &RuleSet,
    options: &FoldOptions,
    path: &str,
) -> Result<Map<String, Value>, ConvertError> {
    let mut out = Map::new();
    let mut folded_arrays: Vec<(String, &[Value], Map<String, Value>)> = Vec::new();
    let mut inlined: Vec<(String, Map<String, Value>)> = Vec::new();

    for (key, value) in map {
        let child = child_path(path, key);
        let scheme = rules.scheme_for(key);
        if scheme == ConversionScheme::Omit {
            trace!(path = %child, "omitting property");
            continue;
        }

        match value {
            Value::Array(items) => match fold_array(items, rules.rule_for(key), rules, options, &child)? {
                Some(table) if !table.is_empty() => {
                    trace!(path = %child, entries = table.len(), "folded array");
                    // Holds the key's position until the fold is settled below.
                    out.insert(key.clone(), Value::Null);
                    folded_arrays.push((key.clone(), items.as_slice(), table));
                }
                _ => {
                    out.insert(key.clone(), fold_plain_array(items, rules, options, &child)?);
                }
            },
            Value::Object(inner) => {
                let table = fold_object(inner, rules, options, &child)?;
                if scheme == ConversionScheme::Inline {
                    inlined.push((key.clone(), table.clone()));
                }
                out.insert(key.clone(), Value::Object(table));
            }
            other => {
                out.insert(key.clone(), other.clone());
            }
        }
    }

    let first_folded = if options.fold_all_sibling_arrays {
        0
    } else {
        folded_arrays.len().saturating_sub(1)
    };
    if first_folded > 0 {
        trace!(path, unfolded = first_folded, "keeping earlier sibling arrays unfolded");
    }
    for (index, (key, items, table)) in folded_arrays.into_iter().enumerate() {
        if index < first_folded {
            let plain = fold_plain_array(items, rules, options, &child_path(path, &key))?;
            out.insert(key, plain);
            continue;
        }
        if rules.scheme_for(&key) == ConversionScheme::Inline {
            inlined.push((key.clone(), table.clone()));
        }
        out.insert(key, Value::Object(table));
    }
    for (key, table) in inlined {
        out = splice_inline(out, &key, table, path)?;
    }
    Ok(out)
}

/// Fold a top-level list of elements (for example a whole merge result).
pub fn fold_elements(
    items: &[Value],
    rules: &RuleSet,
    options: &FoldOptions,
    path: &str,
) -> Result<Map<String, Value>, ConvertError> {
    fold_named(items, DEFAULT_NAME_KEY, DEFAULT_VALUE_KEY, rules, options, path)
}

/// `Some(table)` when every element is an object with a string name.
fn fold_array(
    items: &[Value],
    rule: Option<&Rule>,
    rules: &RuleSet,
    options: &FoldOptions,
    path: &str,
) -> Result<Option<Map<String, Value>>, ConvertError> {
    let name_key = rule.map(Rule::name_key).unwrap_or(DEFAULT_NAME_KEY);
    let value_key = rule.map(Rule::value_key).unwrap_or(DEFAULT_VALUE_KEY);
    if items.is_empty() || !items.iter().all(|item| element_name(item, name_key).is_some()) {
        return Ok(None);
    }
    fold_named(items, name_key, value_key, rules, options, path).map(Some)
}

fn fold_named(
    items: &[Value],
    name_key: &str,
    value_key: &str,
    rules: &RuleSet,
    options: &FoldOptions,
    path: &str,
) -> Result<Map<String, Value>, ConvertError> {
    let mut table = Map::new();
    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{index}]");
        let Value::Object(element) = item else {
            return Err(ConvertError::format(
                item_path,
                format!("expected an object, found {}", type_name(item)),
            ));
        };
        let Some(name) = element_name(item, name_key) else {
            return Err(ConvertError::format(
                item_path,
                format!("element has no string '{name_key}'"),
            ));
        };
        if rules.scheme_for(name) == ConversionScheme::Omit {
            continue;
        }
        let element_path = child_path(path, name);
        if let Some(value) = element_value(element, name, value_key, rules, options, &element_path)? {
            table.insert(name.to_string(), value);
        }
    }
    Ok(table)
}

fn element_value(
    element: &Map<String, Value>,
    name: &str,
    value_key: &str,
    rules: &RuleSet,
    options: &FoldOptions,
    path: &str,
) -> Result<Option<Value>, ConvertError> {
    if let Some((_, value)) = get_ci(element, value_key) {
        match value {
            Value::Null => {}
            Value::String(text) => {
                return Ok(Some(
                    parse_rendered_array(text)
                        .map(Value::Array)
                        .unwrap_or_else(|| value.clone()),
                ));
            }
            Value::Object(inner) => {
                return Ok(Some(Value::Object(fold_object(inner, rules, options, path)?)));
            }
            other => return Ok(Some(other.clone())),
        }
    }

    let rule = rules.rule_for(name);
    let name_key = rule.map(Rule::name_key).unwrap_or(DEFAULT_NAME_KEY);
    let nested_value_key = rule.map(Rule::value_key).unwrap_or(DEFAULT_VALUE_KEY);

    if let Some((_, arrays)) = get_ci(element, ARRAYS_KEY) {
        let Value::Array(instances) = arrays else {
            return Err(ConvertError::format(
                format!("{path}.{ARRAYS_KEY}"),
                format!("expected an array, found {}", type_name(arrays)),
            ));
        };
        if !instances.is_empty() {
            let mut tables = Vec::with_capacity(instances.len());
            for (index, instance) in instances.iter().enumerate() {
                let instance_path = format!("{path}[{index}]");
                let Value::Array(fields) = instance else {
                    return Err(ConvertError::format(
                        instance_path,
                        format!("expected an array, found {}", type_name(instance)),
                    ));
                };
                let table = fold_named(fields, name_key, nested_value_key, rules, options, &instance_path)?;
                tables.push(Value::Object(table));
            }
            return Ok(Some(Value::Array(tables)));
        }
    }

    if let Some((_, fields)) = get_ci(element, FIELDS_KEY) {
        let Value::Array(fields) = fields else {
            return Err(ConvertError::format(
                format!("{path}.{FIELDS_KEY}"),
                format!("expected an array, found {}", type_name(fields)),
            ));
        };
        if !fields.is_empty() {
            let table = fold_named(fields, name_key, nested_value_key, rules, options, path)?;
            return Ok(Some(Value::Object(table)));
        }
    }

    trace!(path, "element has no value to write");
    Ok(None)
}

/// Arrays left in place still get their object elements folded.
fn fold_plain_array(
    items: &[Value],
    rules: &RuleSet,
    options: &FoldOptions,
    path: &str,
) -> Result<Value, ConvertError> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{index}]");
        out.push(match item {
            Value::Object(inner) => Value::Object(fold_object(inner, rules, options, &item_path)?),
            Value::Array(inner) => fold_plain_array(inner, rules, options, &item_path)?,
            other => other.clone(),
        });
    }
    Ok(Value::Array(out))
}

fn element_name<'a>(item: &'a Value, name_key: &str) -> Option<&'a str> {
    match item {
        Value::Object(element) => match get_ci(element, name_key) {
            Some((_, Value::String(name))) => Some(name.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// Replace `key` with the entries of `table`, at the same position.
///
/// A hoisted entry may not share a name with a sibling of `key`.
fn splice_inline(
    map: Map<String, Value>,
    key: &str,
    table: Map<String, Value>,
    path: &str,
) -> Result<Map<String, Value>, ConvertError> {
    if let Some(clash) = table.keys().find(|k| k.as_str() != key && map.contains_key(*k)) {
        return Err(ConvertError::format(
            child_path(path, clash),
            format!("inlined '{key}' entry collides with an existing key"),
        ));
    }
    let mut table = Some(table);
    let mut out = Map::new();
    for (k, v) in map {
        if k == key {
            if let Some(entries) = table.take() {
                out.extend(entries);
            }
        } else {
            out.insert(k, v);
        }
    }
    Ok(out)
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}
