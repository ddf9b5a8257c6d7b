use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::paths;

/// Default hotkey text for advancing the slideshow.
pub const DEFAULT_NEXT_HOTKEY: &str = "Ctrl+Shift+N";

/// Default hotkey text for stepping the slideshow back.
pub const DEFAULT_PREVIOUS_HOTKEY: &str = "Ctrl+Shift+P";

/// Daemon configuration, stored as JSON in the per-user data dir.
///
/// Every field defaults independently, so a config written by an older
/// build keeps working after new fields appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Folders scanned for wallpaper images, in preference order.
    #[serde(default)]
    pub wallpaper_folders: Vec<String>,
    /// Hotkey text bound to "Next Wallpaper".
    #[serde(default = "default_next_hotkey")]
    pub next_hotkey: String,
    /// Hotkey text bound to "Previous Wallpaper".
    #[serde(default = "default_previous_hotkey")]
    pub previous_hotkey: String,
}

fn default_next_hotkey() -> String {
    DEFAULT_NEXT_HOTKEY.to_string()
}

fn default_previous_hotkey() -> String {
    DEFAULT_PREVIOUS_HOTKEY.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            wallpaper_folders: Vec::new(),
            next_hotkey: default_next_hotkey(),
            previous_hotkey: default_previous_hotkey(),
        }
    }
}

impl AppConfig {
    /// First configured folder that exists on disk, falling back to the
    /// user's picture directory.
    pub fn first_available_folder(&self) -> Option<PathBuf> {
        self.wallpaper_folders
            .iter()
            .map(PathBuf::from)
            .find(|folder| folder.is_dir())
            .or_else(dirs::picture_dir)
    }
}

/// Load the configuration from the default per-user location.
#[instrument(name = "load_config")]
pub fn load_config() -> AppConfig {
    load_config_from(&paths::config_path())
}

/// Load the configuration from `config_path`, falling back to defaults on
/// any failure. A broken config never stops the daemon.
pub fn load_config_from(config_path: &Path) -> AppConfig {
    if !config_path.exists() {
        info!(path = %config_path.display(), "config file not found, using defaults");
        return AppConfig::default();
    }

    match fs::read_to_string(config_path) {
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "failed to read config, using defaults");
            AppConfig::default()
        }
        Ok(raw) => match serde_json::from_str::<AppConfig>(&raw) {
            Ok(config) => {
                info!(path = %config_path.display(), "loaded config");
                config
            }
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "failed to parse config, using defaults");
                AppConfig::default()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_carry_the_stock_hotkeys() {
        let config = AppConfig::default();
        assert!(config.wallpaper_folders.is_empty());
        assert_eq!(config.next_hotkey, "Ctrl+Shift+N");
        assert_eq!(config.previous_hotkey, "Ctrl+Shift+P");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json"));
        assert_eq!(config.next_hotkey, DEFAULT_NEXT_HOTKEY);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json at all").unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.previous_hotkey, DEFAULT_PREVIOUS_HOTKEY);
    }

    #[test]
    fn partial_config_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"wallpaper_folders": ["C:\\Wallpapers"]}"#).unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.wallpaper_folders, vec!["C:\\Wallpapers"]);
        assert_eq!(config.next_hotkey, DEFAULT_NEXT_HOTKEY);
        assert_eq!(config.previous_hotkey, DEFAULT_PREVIOUS_HOTKEY);
    }

    #[test]
    fn full_config_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "wallpaper_folders": ["/srv/walls"],
                "next_hotkey": "Ctrl+Alt+F7",
                "previous_hotkey": "Ctrl+Alt+F6"
            }"#,
        )
        .unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.wallpaper_folders, vec!["/srv/walls"]);
        assert_eq!(config.next_hotkey, "Ctrl+Alt+F7");
        assert_eq!(config.previous_hotkey, "Ctrl+Alt+F6");
    }

    #[test]
    fn first_available_folder_skips_missing_entries() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("walls");
        fs::create_dir(&existing).unwrap();

        let config = AppConfig {
            wallpaper_folders: vec![
                "/definitely/not/here".to_string(),
                existing.to_string_lossy().into_owned(),
            ],
            ..AppConfig::default()
        };

        assert_eq!(config.first_available_folder(), Some(existing));
    }
}
