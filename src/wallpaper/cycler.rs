//! Slideshow state over a sorted image list.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::folder::{self, FolderError};
use super::WallpaperSetter;

/// Cycles through the images of one folder, in file-name order, applying
/// each step through a [`WallpaperSetter`].
pub struct SlideshowCycler<W: WallpaperSetter> {
    setter: W,
    folder: Option<String>,
    images: Vec<PathBuf>,
    index: usize,
}

impl<W: WallpaperSetter> SlideshowCycler<W> {
    pub fn new(setter: W) -> Self {
        Self {
            setter,
            folder: None,
            images: Vec::new(),
            index: 0,
        }
    }

    /// Select the folder to cycle through. Scans and sorts its images, then
    /// positions the show at the setter's current wallpaper when that image
    /// is in the list, so re-selecting a folder does not restart the show.
    pub fn set_folder(&mut self, path: &str) -> Result<(), FolderError> {
        folder::validate_wallpaper_folder(path)?;
        let images =
            folder::scan_images(Path::new(path)).map_err(|source| FolderError::Unreadable {
                path: path.to_string(),
                source,
            })?;

        self.index = self.resync_index(&images);
        self.images = images;
        self.folder = Some(path.to_string());
        info!(
            folder = %path,
            count = self.images.len(),
            index = self.index,
            "slideshow folder selected"
        );
        Ok(())
    }

    /// Rescan the selected folder, for when its contents changed on disk.
    /// Keeps position relative to the currently applied wallpaper.
    pub fn refresh(&mut self) -> Result<(), FolderError> {
        match self.folder.clone() {
            Some(folder) => self.set_folder(&folder),
            None => Ok(()),
        }
    }

    /// Apply the next image in name order, wrapping at the end.
    pub fn advance_forward(&mut self) -> io::Result<()> {
        self.advance(1)
    }

    /// Apply the previous image in name order, wrapping at the start.
    pub fn advance_backward(&mut self) -> io::Result<()> {
        self.advance(-1)
    }

    fn advance(&mut self, step: isize) -> io::Result<()> {
        if self.images.len() < 2 {
            debug!(count = self.images.len(), "nothing to cycle");
            return Ok(());
        }

        let len = self.images.len() as isize;
        let next = (self.index as isize + step).rem_euclid(len) as usize;
        // The index only moves once the setter succeeds, so a failed apply
        // retries the same image on the next activation.
        self.setter.set_wallpaper(&self.images[next])?;
        self.index = next;
        Ok(())
    }

    /// The sorted image list of the selected folder.
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    /// The image the show is currently positioned at.
    pub fn current_image(&self) -> Option<&Path> {
        self.images.get(self.index).map(PathBuf::as_path)
    }

    fn resync_index(&self, images: &[PathBuf]) -> usize {
        self.setter
            .current_wallpaper()
            .and_then(|current| images.iter().position(|image| *image == current))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::fs;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct FakeSetterState {
        applied: Vec<PathBuf>,
        current: Option<PathBuf>,
        fail: bool,
    }

    /// Recording setter; clones share state so tests can inspect it after
    /// the cycler takes ownership.
    #[derive(Default, Clone)]
    struct FakeSetter {
        state: Arc<Mutex<FakeSetterState>>,
    }

    impl FakeSetter {
        fn fail_next(&self, fail: bool) {
            self.state.lock().fail = fail;
        }

        fn applied_names(&self) -> Vec<String> {
            self.state
                .lock()
                .applied
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        }
    }

    impl WallpaperSetter for FakeSetter {
        fn set_wallpaper(&mut self, path: &Path) -> io::Result<()> {
            let mut state = self.state.lock();
            if state.fail {
                return Err(io::Error::other("setter rejected the image"));
            }
            state.applied.push(path.to_path_buf());
            state.current = Some(path.to_path_buf());
            Ok(())
        }

        fn current_wallpaper(&self) -> Option<PathBuf> {
            self.state.lock().current.clone()
        }
    }

    fn folder_with(files: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        for name in files {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    fn cycler_over(files: &[&str]) -> (SlideshowCycler<FakeSetter>, FakeSetter, TempDir) {
        let dir = folder_with(files);
        let setter = FakeSetter::default();
        let mut cycler = SlideshowCycler::new(setter.clone());
        cycler.set_folder(&dir.path().to_string_lossy()).unwrap();
        (cycler, setter, dir)
    }

    #[test]
    fn set_folder_scans_and_sorts_by_name() {
        let (cycler, _, _dir) = cycler_over(&["c.jpg", "a.png", "b.gif", "skip.txt"]);

        let names: Vec<_> = cycler
            .images()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.gif", "c.jpg"]);
        assert_eq!(
            cycler.current_image().unwrap().file_name().unwrap(),
            "a.png"
        );
    }

    #[test]
    fn set_folder_rejects_folders_without_images() {
        let dir = folder_with(&["only.txt"]);
        let mut cycler = SlideshowCycler::new(FakeSetter::default());

        assert!(matches!(
            cycler.set_folder(&dir.path().to_string_lossy()),
            Err(FolderError::NoImages(_))
        ));
        assert!(cycler.images().is_empty());
    }

    #[test]
    fn forward_steps_wrap_around() {
        let (mut cycler, setter, _dir) = cycler_over(&["a.jpg", "b.jpg", "c.jpg"]);

        cycler.advance_forward().unwrap();
        cycler.advance_forward().unwrap();
        cycler.advance_forward().unwrap();

        assert_eq!(setter.applied_names(), vec!["b.jpg", "c.jpg", "a.jpg"]);
    }

    #[test]
    fn backward_steps_wrap_around() {
        let (mut cycler, setter, _dir) = cycler_over(&["a.jpg", "b.jpg", "c.jpg"]);

        cycler.advance_backward().unwrap();
        cycler.advance_backward().unwrap();

        assert_eq!(setter.applied_names(), vec!["c.jpg", "b.jpg"]);
    }

    #[test]
    fn a_single_image_never_cycles() {
        let (mut cycler, setter, _dir) = cycler_over(&["only.jpg"]);

        cycler.advance_forward().unwrap();
        cycler.advance_backward().unwrap();

        assert!(setter.applied_names().is_empty());
    }

    #[test]
    fn no_folder_is_a_no_op() {
        let setter = FakeSetter::default();
        let mut cycler = SlideshowCycler::new(setter.clone());

        cycler.advance_forward().unwrap();
        cycler.refresh().unwrap();

        assert!(setter.applied_names().is_empty());
    }

    #[test]
    fn reselecting_the_folder_keeps_position() {
        let (mut cycler, setter, dir) = cycler_over(&["a.jpg", "b.jpg", "c.jpg"]);
        cycler.advance_forward().unwrap(); // now at b.jpg

        cycler.set_folder(&dir.path().to_string_lossy()).unwrap();
        cycler.advance_forward().unwrap();

        assert_eq!(setter.applied_names(), vec!["b.jpg", "c.jpg"]);
    }

    #[test]
    fn refresh_picks_up_new_files() {
        let (mut cycler, setter, dir) = cycler_over(&["a.jpg", "c.jpg"]);
        cycler.advance_forward().unwrap(); // now at c.jpg

        fs::write(dir.path().join("b.jpg"), b"").unwrap();
        cycler.refresh().unwrap();

        assert_eq!(cycler.images().len(), 3);
        // Still positioned at c.jpg, so the next step wraps to a.jpg.
        cycler.advance_forward().unwrap();
        assert_eq!(setter.applied_names(), vec!["c.jpg", "a.jpg"]);
    }

    #[test]
    fn a_failed_apply_keeps_the_position() {
        let (mut cycler, setter, _dir) = cycler_over(&["a.jpg", "b.jpg"]);

        setter.fail_next(true);
        assert!(cycler.advance_forward().is_err());

        setter.fail_next(false);
        cycler.advance_forward().unwrap();
        assert_eq!(setter.applied_names(), vec!["b.jpg"]);
    }
}
