//! Conversion service: the entry points exposed to callers (CLI, API layers).
//!
//! Owns the rule store and fold options; every conversion works on its own
//! input and output trees, so one service can be shared across threads.

use crate::config::FwconfConfig;
use crate::error::ConvertError;
use crate::fold::{self, FoldOptions};
use crate::merge::{self, MergedNode};
use crate::render;
use crate::rules::{RuleSet, RuleStore};
use crate::schema::Message;
use crate::value::DataFormat;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ConversionService {
    store: RuleStore,
    options: FoldOptions,
}

impl ConversionService {
    pub fn new(store: RuleStore, options: FoldOptions) -> Self {
        Self { store, options }
    }

    /// Build from configuration, resolving the rule file against `workspace_root`.
    pub fn from_config(config: &FwconfConfig, workspace_root: &Path) -> Result<Self, ConvertError> {
        config.validate()?;
        let store = RuleStore::open(config.rules_path(workspace_root))?;
        Ok(Self::new(store, config.fold.clone()))
    }

    pub fn rules(&self) -> Arc<RuleSet> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    pub fn fold_options(&self) -> &FoldOptions {
        &self.options
    }

    /// Merge configuration text against `schema`; nodes named by skip
    /// properties are marked invisible.
    pub fn merge(
        &self,
        schema: &Message,
        data_text: &str,
        format: DataFormat,
    ) -> Result<Vec<MergedNode>, ConvertError> {
        let data = format.parse(data_text)?;
        let mut nodes = merge::merge(schema, &data)?;
        let rules = self.rules();
        if !rules.skip_properties.is_empty() {
            let hidden = |name: &str| rules.is_skipped(name);
            for node in nodes.iter_mut() {
                node.hide_matching(&hidden);
            }
        }
        Ok(nodes)
    }

    /// [`Self::merge`] serialized as compact JSON.
    pub fn merge_to_json(
        &self,
        schema: &Message,
        data_text: &str,
        format: DataFormat,
    ) -> Result<String, ConvertError> {
        let nodes = self.merge(schema, data_text, format)?;
        debug!(nodes = nodes.len(), "merged configuration");
        Ok(serde_json::to_string(&nodes)?)
    }

    /// Default-value JSON for a base-case configuration.
    pub fn render_defaults(
        &self,
        schema: &Message,
        base_text: &str,
        format: DataFormat,
    ) -> Result<String, ConvertError> {
        let base = format.parse(base_text)?;
        render::render_defaults(schema, &base)
    }

    /// Fold JSON text into TOML text using the current rules.
    pub fn fold_to_toml(&self, json_text: &str) -> Result<String, ConvertError> {
        let rules = self.rules();
        fold::fold_to_toml(json_text, &rules, &self.options)
    }

    /// Append comma-separated skip properties to the rule store.
    pub fn append_skip_properties(&self, csv: &str) -> Result<bool, ConvertError> {
        self.store.append_skip_properties(csv)
    }
}
