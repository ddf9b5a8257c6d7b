//! Durable JSON persistence for hotkey bindings.
//!
//! Bindings are stored as a JSON array of `{id, hotkey, name}` records at a
//! fixed per-user location. Load is tolerant: a missing file and an
//! unreadable file both come back as "no bindings", so the service's
//! first-run seeding path triggers uniformly for both. Only real I/O errors
//! (permissions, hardware) propagate. Save is a full replace of the file
//! contents, never a merge.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use super::types::HotkeyBinding;
use crate::paths;

/// Load/save capability for the set of registered hotkeys.
///
/// The synchronous forms block the calling thread and are meant for startup
/// paths where blocking is acceptable; the async forms suspend instead.
#[async_trait]
pub trait HotkeyStorage: Send + Sync {
    /// Read all stored bindings. Absent or unparseable content yields an
    /// empty list; only unrecoverable I/O errors are returned.
    fn load(&self) -> io::Result<Vec<HotkeyBinding>>;

    /// Replace the stored set with `bindings`, creating the containing
    /// directory if needed.
    fn save(&self, bindings: &[HotkeyBinding]) -> io::Result<()>;

    /// Async counterpart of [`load`](HotkeyStorage::load).
    async fn load_async(&self) -> io::Result<Vec<HotkeyBinding>>;

    /// Async counterpart of [`save`](HotkeyStorage::save).
    async fn save_async(&self, bindings: &[HotkeyBinding]) -> io::Result<()>;
}

/// JSON-file-backed [`HotkeyStorage`].
///
/// Default location: `<data_local_dir>/wallswitch/hotkeys.json`.
#[derive(Debug, Clone)]
pub struct JsonHotkeyStorage {
    location: PathBuf,
}

impl JsonHotkeyStorage {
    /// Storage at the default per-user location.
    pub fn new() -> Self {
        Self {
            location: paths::hotkey_store_path(),
        }
    }

    /// Storage at an explicit file path.
    pub fn at(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// The file this storage reads and writes.
    pub fn location(&self) -> &Path {
        &self.location
    }

    fn decode(&self, content: &str) -> Vec<HotkeyBinding> {
        match serde_json::from_str(content) {
            Ok(bindings) => bindings,
            Err(e) => {
                warn!(
                    path = %self.location.display(),
                    error = %e,
                    "hotkey store is unreadable, treating it as empty"
                );
                Vec::new()
            }
        }
    }

    fn encode(bindings: &[HotkeyBinding]) -> io::Result<String> {
        serde_json::to_string_pretty(bindings).map_err(io::Error::from)
    }
}

impl Default for JsonHotkeyStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HotkeyStorage for JsonHotkeyStorage {
    fn load(&self) -> io::Result<Vec<HotkeyBinding>> {
        let content = match fs::read_to_string(&self.location) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(self.decode(&content))
    }

    fn save(&self, bindings: &[HotkeyBinding]) -> io::Result<()> {
        if let Some(parent) = self.location.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.location, Self::encode(bindings)?)
    }

    async fn load_async(&self) -> io::Result<Vec<HotkeyBinding>> {
        let content = match tokio::fs::read_to_string(&self.location).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(self.decode(&content))
    }

    async fn save_async(&self, bindings: &[HotkeyBinding]) -> io::Result<()> {
        if let Some(parent) = self.location.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.location, Self::encode(bindings)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkeys::{Hotkey, Key, Modifiers};
    use tempfile::tempdir;

    fn sample_bindings() -> Vec<HotkeyBinding> {
        vec![
            HotkeyBinding::new(
                1000,
                Hotkey::new(Modifiers::CONTROL | Modifiers::ALT, Key::N),
                "Next Wallpaper",
            ),
            HotkeyBinding::new(
                1001,
                Hotkey::new(Modifiers::CONTROL | Modifiers::SHIFT, Key::P),
                "Previous Wallpaper",
            ),
        ]
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempdir().unwrap();
        let storage = JsonHotkeyStorage::at(dir.path().join("hotkeys.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let storage = JsonHotkeyStorage::at(dir.path().join("hotkeys.json"));

        let bindings = sample_bindings();
        storage.save(&bindings).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, 1000);
        assert_eq!(loaded[0].name, "Next Wallpaper");
        assert_eq!(loaded[0].hotkey, bindings[0].hotkey);
        assert_eq!(loaded[1].id, 1001);
        assert_eq!(loaded[1].name, "Previous Wallpaper");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("hotkeys.json");
        let storage = JsonHotkeyStorage::at(&nested);

        storage.save(&sample_bindings()).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn save_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let storage = JsonHotkeyStorage::at(dir.path().join("hotkeys.json"));

        storage.save(&sample_bindings()).unwrap();
        let one = vec![HotkeyBinding::new(
            42,
            Hotkey::new(Modifiers::WIN, Key::W),
            "Only",
        )];
        storage.save(&one).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 42);
        assert_eq!(loaded[0].name, "Only");
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hotkeys.json");
        fs::write(&path, "this is {{ not json").unwrap();

        let storage = JsonHotkeyStorage::at(&path);
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hotkeys.json");
        fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        let storage = JsonHotkeyStorage::at(&path);
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn io_errors_propagate() {
        // Reading a directory as a file is a real I/O error, not corruption.
        let dir = tempdir().unwrap();
        let storage = JsonHotkeyStorage::at(dir.path());
        assert!(storage.load().is_err());
    }

    #[test]
    fn written_json_uses_nested_hotkey_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hotkeys.json");
        let storage = JsonHotkeyStorage::at(&path);
        storage.save(&sample_bindings()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"hotkey\""));
        assert!(raw.contains("\"modifiers\""));
        assert!(raw.contains("\"key\""));
        assert!(raw.contains("CONTROL"));
        assert!(raw.contains("\"N\""));
    }

    #[tokio::test]
    async fn async_round_trip() {
        let dir = tempdir().unwrap();
        let storage = JsonHotkeyStorage::at(dir.path().join("hotkeys.json"));

        storage.save_async(&sample_bindings()).await.unwrap();
        let loaded = storage.load_async().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "Next Wallpaper");
    }

    #[tokio::test]
    async fn async_load_missing_file_returns_empty() {
        let dir = tempdir().unwrap();
        let storage = JsonHotkeyStorage::at(dir.path().join("hotkeys.json"));
        assert!(storage.load_async().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn async_corrupt_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hotkeys.json");
        tokio::fs::write(&path, "[{broken").await.unwrap();

        let storage = JsonHotkeyStorage::at(&path);
        assert!(storage.load_async().await.unwrap().is_empty());
    }
}
