//! Shared test utilities for integration tests

use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes XDG/HOME environment access across tests in this binary.
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
        }
    }

    fn restore(self) {
        match self.home {
            Some(orig) => std::env::set_var("HOME", orig),
            None => std::env::remove_var("HOME"),
        }
        match self.xdg_config_home {
            Some(orig) => std::env::set_var("XDG_CONFIG_HOME", orig),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointing into a fresh temp dir.
///
/// The closure receives the XDG config home; the original environment is
/// restored afterwards, even if `f` panics.
pub fn with_isolated_xdg<F, R>(f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let xdg_config = temp_dir.path().join("config");
    std::fs::create_dir_all(&xdg_config).unwrap();

    let state = EnvState::capture();
    std::env::set_var("HOME", temp_dir.path());
    std::env::set_var("XDG_CONFIG_HOME", &xdg_config);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(&xdg_config)));
    state.restore();
    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Write `contents` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// Device schema shared by the integration tests, as a JSON descriptor.
pub const DEVICE_SCHEMA_JSON: &str = r#"{
    "name": "device",
    "fields": [
        {"name": "voltage", "dataType": "float", "min": 0, "max": 24, "defaultValue": 12},
        {"name": "mode", "dataType": "string", "defaultValue": "eco"},
        {"name": "taps", "dataType": "int32"}
    ],
    "messages": [
        {"name": "uart", "fields": [{"name": "baud", "dataType": "int32", "defaultValue": 115200}]},
        {"name": "channels", "isRepeated": true, "fields": [
            {"name": "gain", "dataType": "int32", "min": 0, "max": 9},
            {"name": "label", "dataType": "string"}
        ]}
    ]
}"#;

/// Configuration matching [`DEVICE_SCHEMA_JSON`].
pub const DEVICE_CONFIG_TOML: &str = r#"voltage = 5.5
mode = "boost"
taps = [1, 2, 3]

[uart]
baud = 9600

[[channels]]
gain = 1
label = "left"

[[channels]]
gain = 2
label = "right"
"#;
