//! CLI route: run context and command dispatch.

use crate::cli::help::command_name;
use crate::cli::output::{format_rules_json, format_rules_text};
use crate::cli::parse::{Commands, RulesCommands, SkipCommands};
use crate::config::ConfigLoader;
use crate::error::ConvertError;
use crate::schema::Message;
use crate::service::ConversionService;
use crate::value::DataFormat;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// CLI context: owns the conversion service for one invocation.
pub struct RunContext {
    service: ConversionService,
    workspace_root: PathBuf,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ConvertError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        let service = ConversionService::from_config(&config, &workspace_root)?;
        debug!(
            rules_path = %service.store().path().display(),
            "conversion service ready"
        );
        Ok(Self {
            service,
            workspace_root,
        })
    }

    pub fn service(&self) -> &ConversionService {
        &self.service
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, ConvertError> {
        let started = Instant::now();
        let name = command_name(command);
        let result = self.execute_inner(command);
        match &result {
            Ok(_) => info!(
                command = %name,
                duration_ms = started.elapsed().as_millis() as u64,
                "command finished"
            ),
            Err(e) => warn!(command = %name, error = %e, "command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ConvertError> {
        match command {
            Commands::Merge {
                schema,
                data,
                pretty,
            } => self.handle_merge(schema, data, *pretty),
            Commands::Defaults { schema, base } => self.handle_defaults(schema, base),
            Commands::Fold { input, output } => self.handle_fold(input, output.as_deref()),
            Commands::Skip { command } => self.handle_skip(command),
            Commands::Rules { command } => self.handle_rules(command),
        }
    }

    fn handle_merge(&self, schema: &Path, data: &Path, pretty: bool) -> Result<String, ConvertError> {
        let schema = Message::load(schema)?;
        let (text, format) = read_data(data)?;
        if pretty {
            let nodes = self.service.merge(&schema, &text, format)?;
            Ok(serde_json::to_string_pretty(&nodes)?)
        } else {
            self.service.merge_to_json(&schema, &text, format)
        }
    }

    fn handle_defaults(&self, schema: &Path, base: &Path) -> Result<String, ConvertError> {
        let schema = Message::load(schema)?;
        let (text, format) = read_data(base)?;
        self.service.render_defaults(&schema, &text, format)
    }

    fn handle_fold(&self, input: &Path, output: Option<&Path>) -> Result<String, ConvertError> {
        let json_text = read_text(input)?;
        let toml_text = self.service.fold_to_toml(&json_text)?;
        match output {
            Some(path) => {
                std::fs::write(path, &toml_text)
                    .map_err(|e| ConvertError::write_file(path, e))?;
                Ok(format!("Wrote {}", path.display()))
            }
            None => Ok(toml_text.trim_end().to_string()),
        }
    }

    fn handle_skip(&self, command: &SkipCommands) -> Result<String, ConvertError> {
        match command {
            SkipCommands::Add { properties } => {
                let before = self.service.rules().skip_properties.len();
                self.service.append_skip_properties(properties)?;
                let added = self.service.rules().skip_properties.len() - before;
                if added == 0 {
                    Ok("No new skip properties".to_string())
                } else {
                    Ok(format!(
                        "Added {} skip properties to {}",
                        added,
                        self.service.store().path().display()
                    ))
                }
            }
        }
    }

    fn handle_rules(&self, command: &RulesCommands) -> Result<String, ConvertError> {
        match command {
            RulesCommands::Show { format } => {
                let rules = self.service.rules();
                match format.as_str() {
                    "text" => Ok(format_rules_text(&rules)),
                    "json" => format_rules_json(&rules),
                    other => Err(ConvertError::InvalidArgument(format!(
                        "Invalid format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
        }
    }
}

fn read_text(path: &Path) -> Result<String, ConvertError> {
    std::fs::read_to_string(path).map_err(|e| ConvertError::read_file(path, e))
}

fn read_data(path: &Path) -> Result<(String, DataFormat), ConvertError> {
    let format = DataFormat::from_path(path)?;
    Ok((read_text(path)?, format))
}
