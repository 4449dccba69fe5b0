//! CLI parse and dispatch through RunContext.

use super::test_utils::{write_file, DEVICE_CONFIG_TOML, DEVICE_SCHEMA_JSON};
use clap::Parser;
use fwconf::cli::{command_name, map_error, Cli, Commands, RunContext};
use fwconf::error::ErrorKind;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

/// Run context isolated from global and workspace config files.
fn context(workspace: &Path) -> RunContext {
    let config = write_file(
        workspace,
        "fwconf.toml",
        &format!("config_root = {:?}\n", workspace.to_string_lossy()),
    );
    RunContext::new(workspace.to_path_buf(), Some(config)).unwrap()
}

fn parse(args: &[&str]) -> Commands {
    let mut argv = vec!["fwconf"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

#[test]
fn test_command_names() {
    assert_eq!(command_name(&parse(&["fold", "--input", "a.json"])), "fold");
    assert_eq!(command_name(&parse(&["skip", "add", "min,max"])), "skip.add");
    assert_eq!(command_name(&parse(&["rules", "show"])), "rules.show");
}

#[test]
fn test_merge_requires_schema_and_data() {
    assert!(Cli::try_parse_from(["fwconf", "merge", "--schema", "s.json"]).is_err());
}

#[test]
fn test_merge_command_outputs_node_json() {
    let temp = TempDir::new().unwrap();
    let schema = write_file(temp.path(), "device.json", DEVICE_SCHEMA_JSON);
    let data = write_file(temp.path(), "device.toml", DEVICE_CONFIG_TOML);
    let ctx = context(temp.path());

    let command = parse(&[
        "merge",
        "--schema",
        schema.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
    ]);
    let output = ctx.execute(&command).unwrap();
    let nodes: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(nodes[0]["name"], "voltage");
    assert_eq!(nodes[2]["value"], "[1,2,3]");
    assert_eq!(nodes[4]["dataType"], "message");
    assert_eq!(nodes[4]["arrays"].as_array().unwrap().len(), 2);
}

#[test]
fn test_skip_add_then_merge_hides_nodes() {
    let temp = TempDir::new().unwrap();
    let schema = write_file(temp.path(), "device.json", DEVICE_SCHEMA_JSON);
    let data = write_file(temp.path(), "device.toml", DEVICE_CONFIG_TOML);
    let ctx = context(temp.path());

    let added = ctx.execute(&parse(&["skip", "add", "mode,label"])).unwrap();
    assert!(added.starts_with("Added 2 skip properties"));
    let again = ctx.execute(&parse(&["skip", "add", "MODE"])).unwrap();
    assert_eq!(again, "No new skip properties");

    let output = ctx
        .execute(&parse(&[
            "merge",
            "--schema",
            schema.to_str().unwrap(),
            "--data",
            data.to_str().unwrap(),
        ]))
        .unwrap();
    let nodes: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(nodes[1]["isVisible"], false);
    assert_eq!(nodes[0]["isVisible"], true);
    assert_eq!(nodes[4]["arrays"][0][1]["isVisible"], false);

    let shown = ctx.execute(&parse(&["rules", "show"])).unwrap();
    assert!(shown.starts_with("Skip properties (2):"));
}

#[test]
fn test_defaults_command() {
    let temp = TempDir::new().unwrap();
    let schema = write_file(temp.path(), "device.json", DEVICE_SCHEMA_JSON);
    let base = write_file(temp.path(), "base.json", r#"{"voltage": 12}"#);
    let ctx = context(temp.path());

    let output = ctx
        .execute(&parse(&[
            "defaults",
            "--schema",
            schema.to_str().unwrap(),
            "--base",
            base.to_str().unwrap(),
        ]))
        .unwrap();
    assert_eq!(
        output,
        r#"{"voltage":{"min":0,"max":24,"value":12,"datatype":"float"}}"#
    );
}

#[test]
fn test_fold_command_writes_output_file() {
    let temp = TempDir::new().unwrap();
    let input = write_file(
        temp.path(),
        "edited.json",
        r#"{"device": [{"name": "voltage", "value": 5}, {"name": "taps", "value": "[1,2]"}]}"#,
    );
    let output_path = temp.path().join("device.toml");
    let ctx = context(temp.path());

    let message = ctx
        .execute(&parse(&[
            "fold",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ]))
        .unwrap();
    assert!(message.starts_with("Wrote "));

    let written: toml::Table = toml::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written["device"]["voltage"].as_integer(), Some(5));
    assert_eq!(
        written["device"]["taps"].as_array().unwrap().len(),
        2
    );
}

#[test]
fn test_missing_input_names_file() {
    let temp = TempDir::new().unwrap();
    let ctx = context(temp.path());
    let err = ctx
        .execute(&parse(&["fold", "--input", "does-not-exist.json"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(map_error(&err).contains("does-not-exist.json"));
}

#[test]
fn test_rules_show_json_and_bad_format() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "configsetting/convertconfig.txt",
        "min\nRule:amps:power:high\n",
    );
    let ctx = context(temp.path());

    let output = ctx
        .execute(&parse(&["rules", "show", "--format", "json"]))
        .unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["skip_properties"][0], "min");
    assert_eq!(parsed["rules"][0]["property"], "amps");

    let err = ctx
        .execute(&parse(&["rules", "show", "--format", "yaml"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_unwritable_output_names_file() {
    let temp = TempDir::new().unwrap();
    let input = write_file(
        temp.path(),
        "edited.json",
        r#"{"device": [{"name": "voltage", "value": 5}]}"#,
    );
    let output_path = temp.path().join("missing-dir").join("device.toml");
    let ctx = context(temp.path());

    let err = ctx
        .execute(&parse(&[
            "fold",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(map_error(&err).contains("missing-dir"));
    assert!(!output_path.exists());
}
