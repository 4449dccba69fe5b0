//! Integration tests for fwconf

mod cli_commands;
mod config_layers;
mod round_trip;
mod test_utils;
