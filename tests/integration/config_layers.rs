//! Integration tests for layered configuration loading

use super::test_utils::{with_isolated_xdg, write_file};
use fwconf::config::{global_config_path, ConfigLoader, FwconfConfig};
use fwconf::service::ConversionService;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults_without_any_files() {
    with_isolated_xdg(|_| {
        let workspace = TempDir::new().unwrap();
        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.config_root, PathBuf::from("."));
        assert!(!config.fold.fold_all_sibling_arrays);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.output, "stderr");
    });
}

#[test]
fn test_global_path_follows_xdg() {
    with_isolated_xdg(|xdg| {
        assert_eq!(
            global_config_path(),
            Some(xdg.join("fwconf").join("config.toml"))
        );
    });
}

#[test]
fn test_workspace_file_overrides_global_file() {
    with_isolated_xdg(|xdg| {
        write_file(
            xdg,
            "fwconf/config.toml",
            "config_root = \"global\"\n[logging]\nlevel = \"warn\"\n",
        );
        let workspace = TempDir::new().unwrap();
        write_file(
            workspace.path(),
            "config/config.toml",
            "config_root = \"firmware\"\n",
        );

        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.config_root, PathBuf::from("firmware"));
        assert_eq!(config.logging.level, "warn");
    });
}

#[test]
fn test_service_from_config_reads_rule_store() {
    let workspace = TempDir::new().unwrap();
    write_file(
        workspace.path(),
        "firmware/configsetting/convertconfig.txt",
        "min\nRule:debug:inline:x\n",
    );
    let config = FwconfConfig {
        config_root: PathBuf::from("firmware"),
        ..FwconfConfig::default()
    };

    let service = ConversionService::from_config(&config, workspace.path()).unwrap();
    let rules = service.rules();
    assert!(rules.is_skipped("min"));
    assert_eq!(rules.rules.len(), 1);
    assert!(service
        .store()
        .path()
        .ends_with("firmware/configsetting/convertconfig.txt"));
}

#[test]
fn test_explicit_rules_file_and_fold_option() {
    let workspace = TempDir::new().unwrap();
    let config_file = write_file(
        workspace.path(),
        "fwconf.toml",
        "[rules]\nfile = \"rules/custom.txt\"\n\n[fold]\nfold_all_sibling_arrays = true\n",
    );
    write_file(workspace.path(), "rules/custom.txt", "max\n");

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let service = ConversionService::from_config(&config, workspace.path()).unwrap();
    assert!(service.rules().is_skipped("max"));
    assert!(service.fold_options().fold_all_sibling_arrays);
}
