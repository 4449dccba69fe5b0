//! Conversion rules: skip properties and `Rule:` directives that steer the TOML fold.

mod parser;
mod store;

pub use parser::{parse_rules, RULE_PREFIX};
pub use store::{rules_path, RuleStore, RULES_DIR, RULES_FILE};

use crate::value::names_match;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Element key holding an element's name when no rule overrides it.
pub const DEFAULT_NAME_KEY: &str = "name";
/// Element key holding an element's value when no rule overrides it.
pub const DEFAULT_VALUE_KEY: &str = "value";

/// How the fold treats a property matched by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionScheme {
    /// Fold under the property key.
    Object,
    /// Hoist the folded entries into the parent object.
    Inline,
    /// Remove the property.
    Omit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSchema {
    pub name: String,
    pub value: String,
}

/// One `Rule:<property>:<schema-name>:<schema-value>` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub property: String,
    pub schema: RuleSchema,
}

impl Rule {
    pub fn new(property: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            schema: RuleSchema {
                name: name.into(),
                value: value.into(),
            },
        }
    }

    pub fn matches(&self, property: &str) -> bool {
        names_match(&self.property, property)
    }

    /// `omit` and `inline` schema names select those schemes; anything else is `Object`.
    pub fn scheme(&self) -> ConversionScheme {
        match self.schema.name.to_lowercase().as_str() {
            "omit" => ConversionScheme::Omit,
            "inline" => ConversionScheme::Inline,
            _ => ConversionScheme::Object,
        }
    }

    /// Element key read as the name when folding this property's array.
    pub fn name_key(&self) -> &str {
        match self.scheme() {
            ConversionScheme::Object => &self.schema.name,
            _ => DEFAULT_NAME_KEY,
        }
    }

    /// Element key read as the value when folding this property's array.
    pub fn value_key(&self) -> &str {
        match self.scheme() {
            ConversionScheme::Object => &self.schema.value,
            _ => DEFAULT_VALUE_KEY,
        }
    }
}

/// Parsed rule definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Lower-cased property names removed before folding.
    pub skip_properties: BTreeSet<String>,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn is_skipped(&self, key: &str) -> bool {
        self.skip_properties.contains(&key.to_lowercase())
    }

    /// First rule naming `property`.
    pub fn rule_for(&self, property: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(property))
    }

    pub fn scheme_for(&self, property: &str) -> ConversionScheme {
        self.rule_for(property)
            .map(Rule::scheme)
            .unwrap_or(ConversionScheme::Object)
    }

    pub fn is_empty(&self) -> bool {
        self.skip_properties.is_empty() && self.rules.is_empty()
    }
}
