//! CLI domain: parse, route, help, and output only.
//! No conversion logic; the route table dispatches to the conversion service.

mod help;
mod output;
mod parse;
mod route;

pub use help::command_name;
pub use output::{format_rules_json, format_rules_text, map_error};
pub use parse::{Cli, Commands, RulesCommands, SkipCommands};
pub use route::RunContext;
