//! TOML Folding / Rule Engine
//!
//! Turns a JSON Value Tree (typically a configuration UI's edited merge output)
//! into the nested-table shape a TOML writer expects. Two passes:
//!
//! 1. [`strip_properties`] removes skip properties at every depth;
//! 2. [`fold_object`] folds `{name, value}` element arrays into tables,
//!    applying `Rule:` directives.
//!
//! Both passes build new values; the input is never modified.

mod compat;
mod strip;

pub use compat::{fold_elements, fold_object, FoldOptions};
pub use strip::{strip_map, strip_properties};

use crate::error::ConvertError;
use crate::rules::RuleSet;
use crate::value::{self, type_name, Map, Value};
use tracing::debug;

/// Strip then fold `value`.
///
/// The root may be an object, or an array of elements such as a whole merge
/// result.
pub fn fold(
    value: &Value,
    rules: &RuleSet,
    options: &FoldOptions,
) -> Result<Map<String, Value>, ConvertError> {
    debug!(
        skip_properties = rules.skip_properties.len(),
        rules = rules.rules.len(),
        "folding value tree"
    );
    match strip_properties(value, &rules.skip_properties) {
        Value::Object(map) => fold_object(&map, rules, options, ""),
        Value::Array(items) => fold_elements(&items, rules, options, ""),
        other => Err(ConvertError::format(
            "<root>",
            format!("expected an object or array, found {}", type_name(&other)),
        )),
    }
}

/// Parse JSON text, fold it and write TOML text.
pub fn fold_to_toml(
    json_text: &str,
    rules: &RuleSet,
    options: &FoldOptions,
) -> Result<String, ConvertError> {
    if json_text.trim().is_empty() {
        return Err(ConvertError::InvalidArgument("JSON input is empty".to_string()));
    }
    let parsed: Value = serde_json::from_str(json_text)?;
    let folded = fold(&parsed, rules, options)?;
    value::to_toml_string(&folded)
}
