//! Error types for the fwconf configuration reconciliation engine.

use std::path::PathBuf;
use thiserror::Error;

/// Rule definition parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("Malformed rule on line {line_number}: {line:?} has {fields} fields, expected 4")]
    Format {
        line_number: usize,
        line: String,
        fields: usize,
    },
}

/// Schema descriptor errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Empty name in message '{0}'")]
    EmptyName(String),

    #[error("Duplicate name '{name}' in message '{message}'")]
    DuplicateName { message: String, name: String },
}

/// Coarse classification used by callers to shape responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Format,
    Internal,
}

/// Errors raised by the merge, render and fold engines and the services around them
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed value at '{location}': {message}")]
    Format { location: String, message: String },

    #[error("Rule parse error: {0}")]
    Rule(#[from] RuleParseError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConvertError {
    /// Build a format error for a structural mismatch at `location`.
    pub fn format(location: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::Format {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::WriteFile {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::InvalidArgument(_)
            | ConvertError::ReadFile { .. }
            | ConvertError::WriteFile { .. } => ErrorKind::InvalidArgument,
            ConvertError::Format { .. }
            | ConvertError::Rule(_)
            | ConvertError::Schema(_)
            | ConvertError::Json(_)
            | ConvertError::TomlParse(_) => ErrorKind::Format,
            ConvertError::Io(_) | ConvertError::TomlWrite(_) | ConvertError::Config(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<config::ConfigError> for ConvertError {
    fn from(err: config::ConfigError) -> Self {
        ConvertError::Config(err.to_string())
    }
}
