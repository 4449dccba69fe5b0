//! Line-oriented rule definition format.
//!
//! ```text
//! voltage
//! Rule:amps:power:high
//! ```
//!
//! Bare lines are skip properties (trimmed, lower-cased). `Rule:` lines must have
//! exactly four colon-separated fields. Blank lines are ignored.

use super::{Rule, RuleSet};
use crate::error::RuleParseError;

pub const RULE_PREFIX: &str = "Rule:";

const RULE_FIELDS: usize = 4;

/// Parse rule text into skip properties and rules.
pub fn parse_rules(text: &str) -> Result<RuleSet, RuleParseError> {
    let mut set = RuleSet::default();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(RULE_PREFIX) {
            set.rules.push(parse_rule_line(index + 1, line)?);
        } else {
            set.skip_properties.insert(line.to_lowercase());
        }
    }
    Ok(set)
}

fn parse_rule_line(line_number: usize, line: &str) -> Result<Rule, RuleParseError> {
    let parts: Vec<&str> = line.split(':').map(str::trim).collect();
    if parts.len() != RULE_FIELDS || parts[1].is_empty() {
        return Err(RuleParseError::Format {
            line_number,
            line: line.to_string(),
            fields: parts.len(),
        });
    }
    Ok(Rule::new(parts[1], parts[2], parts[3]))
}
