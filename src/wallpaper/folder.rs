//! Wallpaper folder validation and image discovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// File extensions the slideshow treats as wallpaper images.
pub const SUPPORTED_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "bmp", "dib", "gif", "tif", "tiff", "jfif",
];

#[derive(Debug, Error)]
pub enum FolderError {
    #[error("wallpaper folder path is empty")]
    EmptyPath,

    #[error("wallpaper folder '{0}' does not exist or is not a directory")]
    NotADirectory(String),

    #[error("failed to read wallpaper folder '{path}'")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("wallpaper folder '{0}' contains no supported images")]
    NoImages(String),
}

/// Whether `path` names a file with a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Top-level files in `folder` with supported extensions, sorted by name.
/// Subdirectories are not descended into.
pub fn scan_images(folder: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Count of supported images at the top level of `path`. Blank or unreadable
/// paths count as zero.
pub fn image_count(path: &str) -> usize {
    if path.trim().is_empty() {
        return 0;
    }
    scan_images(Path::new(path))
        .map(|images| images.len())
        .unwrap_or(0)
}

/// Check that `path` names a readable directory holding at least one
/// supported image.
pub fn validate_wallpaper_folder(path: &str) -> Result<(), FolderError> {
    if path.trim().is_empty() {
        return Err(FolderError::EmptyPath);
    }

    let folder = Path::new(path);
    if !folder.is_dir() {
        return Err(FolderError::NotADirectory(path.to_string()));
    }

    let images = scan_images(folder).map_err(|source| FolderError::Unreadable {
        path: path.to_string(),
        source,
    })?;
    if images.is_empty() {
        return Err(FolderError::NoImages(path.to_string()));
    }
    Ok(())
}
