//! Merge -> edit -> fold round trips through the public API.

use super::test_utils::{DEVICE_CONFIG_TOML, DEVICE_SCHEMA_JSON};
use fwconf::fold::{fold, fold_to_toml, FoldOptions};
use fwconf::merge::{any_node, merge};
use fwconf::rules::{parse_rules, RuleSet};
use fwconf::schema::Message;
use fwconf::value::{DataFormat, Value};

fn schema() -> Message {
    Message::from_json_str(DEVICE_SCHEMA_JSON).unwrap()
}

#[test]
fn test_merge_then_fold_reproduces_config() {
    let data = DataFormat::Toml.parse(DEVICE_CONFIG_TOML).unwrap();
    let nodes = merge(&schema(), &data).unwrap();
    let json_text = serde_json::to_string(&nodes).unwrap();

    let toml_text = fold_to_toml(&json_text, &RuleSet::default(), &FoldOptions::default()).unwrap();
    let folded: toml::Table = toml::from_str(&toml_text).unwrap();
    let original: toml::Table = toml::from_str(DEVICE_CONFIG_TOML).unwrap();
    assert_eq!(folded, original);
}

#[test]
fn test_merge_fills_defaults_for_missing_keys() {
    let data = DataFormat::Toml.parse("voltage = 3.3\n").unwrap();
    let nodes = merge(&schema(), &data).unwrap();

    let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["voltage", "mode", "taps", "uart", "channels"]);
    assert_eq!(nodes[1].value, Value::from("eco"));
    assert_eq!(nodes[3].fields[0].value, Value::from(115200));
    assert!(nodes[4].arrays.is_empty());
}

#[test]
fn test_edited_merge_output_folds_with_skip_properties() {
    let data = DataFormat::Toml.parse(DEVICE_CONFIG_TOML).unwrap();
    let nodes = merge(&schema(), &data).unwrap();
    assert!(any_node(&nodes, &|n| n.name == "gain"));

    let mut edited = serde_json::to_value(&nodes).unwrap();
    edited[0]["value"] = Value::from(7.5);

    let rules = parse_rules("id\nmin\nmax\ndefaultValue\ndataType\nisVisible").unwrap();
    let folded = fold(&edited, &rules, &FoldOptions::default()).unwrap();
    assert_eq!(folded["voltage"], Value::from(7.5));
    assert_eq!(folded["channels"][1]["label"], Value::from("right"));
}

#[test]
fn test_omit_rule_drops_element() {
    let data = DataFormat::Toml.parse(DEVICE_CONFIG_TOML).unwrap();
    let nodes = merge(&schema(), &data).unwrap();
    let json_text = serde_json::to_string(&nodes).unwrap();

    let rules = parse_rules("Rule:uart:omit:x").unwrap();
    let toml_text = fold_to_toml(&json_text, &rules, &FoldOptions::default()).unwrap();
    let folded: toml::Table = toml::from_str(&toml_text).unwrap();
    assert!(!folded.contains_key("uart"));
    assert_eq!(folded["mode"].as_str(), Some("boost"));
}

#[test]
fn test_json_config_merges_like_toml() {
    let json_data = DataFormat::Json
        .parse(r#"{"VOLTAGE": 5.5, "channels": [{"label": "solo", "gain": 4}]}"#)
        .unwrap();
    let nodes = merge(&schema(), &json_data).unwrap();
    assert_eq!(nodes[0].name, "voltage");
    assert_eq!(nodes[0].value, Value::from(5.5));

    let instance = &nodes[4].arrays[0];
    assert_eq!(instance[0].name, "label");
    assert_eq!(instance[1].name, "gain");
    assert_eq!(instance[1].id, 1);
}
