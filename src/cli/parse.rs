//! CLI parse: clap types for fwconf. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fwconf CLI - schema-aware firmware configuration reconciliation
#[derive(Parser)]
#[command(name = "fwconf")]
#[command(about = "Merge TOML/JSON device configuration with its protobuf schema, and fold it back")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge a configuration file with its schema and print the annotated JSON
    Merge {
        /// Schema descriptor (JSON or TOML)
        #[arg(long)]
        schema: PathBuf,
        /// Configuration file (TOML or JSON)
        #[arg(long)]
        data: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Render default-value JSON from a base-case configuration
    Defaults {
        /// Schema descriptor (JSON or TOML)
        #[arg(long)]
        schema: PathBuf,
        /// Base-case configuration file (TOML or JSON)
        #[arg(long)]
        base: PathBuf,
    },
    /// Fold edited JSON back into TOML
    Fold {
        /// JSON input file
        #[arg(long)]
        input: PathBuf,
        /// Write TOML here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Manage skip properties
    Skip {
        #[command(subcommand)]
        command: SkipCommands,
    },
    /// Inspect conversion rules
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
}

#[derive(Subcommand)]
pub enum SkipCommands {
    /// Append comma-separated skip properties to the rule store
    Add {
        /// Property names, e.g. "min,max,datatype"
        properties: String,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Show skip properties and rules
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
