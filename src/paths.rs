//! Per-user file locations.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "wallswitch";

/// Application data directory (`<data_local_dir>/wallswitch`).
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
}

/// The stored hotkey bindings file.
pub fn hotkey_store_path() -> PathBuf {
    app_data_dir().join("hotkeys.json")
}

/// The daemon configuration file.
pub fn config_path() -> PathBuf {
    app_data_dir().join("config.json")
}

/// Directory holding JSONL log output.
pub fn log_dir() -> PathBuf {
    app_data_dir().join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_the_app_data_dir() {
        let base = app_data_dir();
        assert!(hotkey_store_path().starts_with(&base));
        assert!(config_path().starts_with(&base));
        assert!(log_dir().starts_with(&base));
    }

    #[test]
    fn well_known_file_names() {
        assert_eq!(hotkey_store_path().file_name().unwrap(), "hotkeys.json");
        assert_eq!(config_path().file_name().unwrap(), "config.json");
    }
}
