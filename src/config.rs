//! Configuration System
//!
//! Layered configuration for the conversion service: built-in defaults, the
//! global file, workspace files, then `FWCONF_*` environment variables.

use crate::error::ConvertError;
use crate::fold::FoldOptions;
use crate::logging::LoggingConfig;
use crate::rules;
use config::{ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::env::ENV_PREFIX;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FwconfConfig {
    /// Root of the configuration checkout; the rule store lives under it
    #[serde(default = "default_config_root")]
    pub config_root: PathBuf,

    /// Rule store settings
    #[serde(default)]
    pub rules: RulesConfig,

    /// TOML fold behaviour
    #[serde(default)]
    pub fold: FoldOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Rule store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Explicit rule file; defaults to `<config_root>/configsetting/convertconfig.txt`
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_config_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for FwconfConfig {
    fn default() -> Self {
        Self {
            config_root: default_config_root(),
            rules: RulesConfig::default(),
            fold: FoldOptions::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FwconfConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.config_root.as_os_str().is_empty() {
            return Err(ConvertError::InvalidArgument(
                "config_root cannot be empty".to_string(),
            ));
        }
        if let Some(file) = &self.rules.file {
            if file.as_os_str().is_empty() {
                return Err(ConvertError::InvalidArgument(
                    "rules.file cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Rule store path, with relative paths resolved against `workspace_root`.
    pub fn rules_path(&self, workspace_root: &Path) -> PathBuf {
        match &self.rules.file {
            Some(file) => workspace_root.join(file),
            None => rules::rules_path(&workspace_root.join(&self.config_root)),
        }
    }
}

/// Loads [`FwconfConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    pub fn load(workspace_root: &Path) -> Result<FwconfConfig, ConfigError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::env::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load a single explicit file over the defaults.
    pub fn load_from_file(path: &Path) -> Result<FwconfConfig, ConfigError> {
        merge::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Global config path, if HOME or XDG_CONFIG_HOME is set.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_config_path()
    }
}
