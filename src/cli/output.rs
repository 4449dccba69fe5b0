//! CLI output: error mapping and rule-set presentation.

use crate::error::{ConvertError, ErrorKind};
use crate::rules::RuleSet;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ConvertError) -> String {
    match e.kind() {
        ErrorKind::InvalidArgument => format!("error: {}", e),
        ErrorKind::Format => format!("format error: {}", e),
        ErrorKind::Internal => format!("internal error: {}", e),
    }
}

pub fn format_rules_text(rules: &RuleSet) -> String {
    let mut out = format!("Skip properties ({}):\n", rules.skip_properties.len());
    for name in &rules.skip_properties {
        out.push_str(&format!("  {}\n", name));
    }
    out.push_str(&format!("Rules ({}):\n", rules.rules.len()));
    for rule in &rules.rules {
        out.push_str(&format!(
            "  {} -> {}:{} ({:?})\n",
            rule.property,
            rule.schema.name,
            rule.schema.value,
            rule.scheme()
        ));
    }
    out.trim_end().to_string()
}

pub fn format_rules_json(rules: &RuleSet) -> Result<String, ConvertError> {
    Ok(serde_json::to_string_pretty(rules)?)
}
