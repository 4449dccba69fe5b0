//! CLI command names used in log events.

use crate::cli::parse::{Commands, RulesCommands, SkipCommands};

/// Command name string (e.g. "merge", "skip.add").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Merge { .. } => "merge".to_string(),
        Commands::Defaults { .. } => "defaults".to_string(),
        Commands::Fold { .. } => "fold".to_string(),
        Commands::Skip { command } => format!("skip.{}", skip_command_name(command)),
        Commands::Rules { command } => format!("rules.{}", rules_command_name(command)),
    }
}

pub fn skip_command_name(command: &SkipCommands) -> &'static str {
    match command {
        SkipCommands::Add { .. } => "add",
    }
}

pub fn rules_command_name(command: &RulesCommands) -> &'static str {
    match command {
        RulesCommands::Show { .. } => "show",
    }
}
