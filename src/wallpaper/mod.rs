//! Wallpaper application and slideshow cycling.
//!
//! This module provides:
//! - A `WallpaperSetter` capability trait over the native "apply this image"
//!   surface
//! - `SlideshowCycler`, a wrapping cursor over a folder's sorted image list
//! - Folder validation and supported-extension helpers

mod cycler;
mod folder;

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

// Re-export the cycler
pub use cycler::SlideshowCycler;

// Re-export folder helpers
pub use folder::{
    image_count, is_supported_image, scan_images, validate_wallpaper_folder, FolderError,
    SUPPORTED_EXTENSIONS,
};

/// Native capability for applying a wallpaper image.
pub trait WallpaperSetter: Send {
    /// Apply the image at `path` as the desktop wallpaper.
    fn set_wallpaper(&mut self, path: &Path) -> io::Result<()>;

    /// Path of the currently applied wallpaper, if known.
    fn current_wallpaper(&self) -> Option<PathBuf>;
}

/// Setter that records what it would have applied and logs it. Stands in
/// for the platform implementation, which lives outside this crate.
#[derive(Debug, Default)]
pub struct LoggingSetter {
    current: Option<PathBuf>,
}

impl WallpaperSetter for LoggingSetter {
    fn set_wallpaper(&mut self, path: &Path) -> io::Result<()> {
        info!(path = %path.display(), "wallpaper applied");
        self.current = Some(path.to_path_buf());
        Ok(())
    }

    fn current_wallpaper(&self) -> Option<PathBuf> {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_setter_remembers_the_last_image() {
        let mut setter = LoggingSetter::default();
        assert!(setter.current_wallpaper().is_none());

        setter.set_wallpaper(Path::new("/walls/a.jpg")).unwrap();
        setter.set_wallpaper(Path::new("/walls/b.jpg")).unwrap();

        assert_eq!(
            setter.current_wallpaper(),
            Some(PathBuf::from("/walls/b.jpg"))
        );
    }
}
