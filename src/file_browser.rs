use std::io;
use std::path::{Path, PathBuf};

use crate::utilities::{list_directory, DirItem};

/// Directory listing the reading predictor picks files from.
#[derive(Debug)]
pub struct FileBrowser {
    dir: PathBuf,
    items: Vec<DirItem>,
    selected: usize,
}

impl FileBrowser {
    pub fn open(dir: &Path) -> io::Result<Self> {
        let dir = dir.canonicalize()?;
        let items = list_directory(&dir)?;
        Ok(Self { dir, items, selected: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn items(&self) -> &[DirItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    /// Enter the highlighted directory, or return the highlighted file.
    pub fn activate(&mut self) -> io::Result<Option<PathBuf>> {
        let Some(item) = self.items.get(self.selected).cloned() else {
            return Ok(None);
        };
        if item.is_dir {
            self.change_dir(&item.path)?;
            Ok(None)
        } else {
            Ok(Some(item.path))
        }
    }

    pub fn parent(&mut self) -> io::Result<()> {
        match self.dir.parent().map(Path::to_path_buf) {
            Some(parent) => self.change_dir(&parent),
            None => Ok(()),
        }
    }

    /// Listing failures leave the browser where it was.
    fn change_dir(&mut self, dir: &Path) -> io::Result<()> {
        let dir = dir.canonicalize()?;
        let items = list_directory(&dir)?;
        log::debug!("browsing {}", dir.display());
        self.dir = dir;
        self.items = items;
        self.selected = 0;
        Ok(())
    }
}
