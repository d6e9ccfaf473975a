//! Image catalog
//!
//! Sorted list of playable bitmaps in the image folder plus the index of the
//! one currently selected. Only the controller advances it.

use heapless::{String, Vec};

use crate::storage::{Storage, StorageError, StorageErrorKind, log_failure};

/// Images kept in the catalog
pub const MAX_IMAGES: usize = 32;

/// Longest accepted file name
pub const MAX_NAME_LEN: usize = 48;

pub type ImageName = String<MAX_NAME_LEN>;

#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    names: Vec<ImageName, MAX_IMAGES>,
    current: usize,
}

impl ImageCatalog {
    pub const fn new() -> Self {
        Self {
            names: Vec::new(),
            current: 0,
        }
    }

    /// Build a catalog from file names, keeping eligible ones in sorted order
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut catalog = Self::new();
        for name in names {
            catalog.insert(name);
        }
        catalog.sort();
        catalog
    }

    /// Scan `dir` on `storage`; a missing folder gives an empty catalog
    pub fn scan<S: Storage>(storage: &mut S, dir: &str) -> Result<Self, StorageError> {
        let mut catalog = Self::new();
        let listed = storage.list(dir, &mut |name| catalog.insert(name));
        match listed {
            Ok(()) => {}
            Err(error) if error.kind == StorageErrorKind::NotFound => {
                log::warn!("image folder {dir} not found");
            }
            Err(error) => {
                log_failure("listing", dir, &error);
                return Err(error);
            }
        }
        catalog.sort();
        for name in &catalog.names {
            log::info!("found image {dir}/{name}");
        }
        Ok(catalog)
    }

    /// Visible `.bmp` file (case-insensitive)
    pub fn is_eligible(name: &str) -> bool {
        let bytes = name.as_bytes();
        !name.starts_with('.')
            && bytes.len() > 4
            && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".bmp")
    }

    fn insert(&mut self, name: &str) {
        if !Self::is_eligible(name) {
            return;
        }
        let Ok(entry) = ImageName::try_from(name) else {
            log::warn!("skipping {name}: name longer than {MAX_NAME_LEN} bytes");
            return;
        };
        if self.names.push(entry).is_err() {
            log::warn!("skipping {name}: catalog holds {MAX_IMAGES} images");
        }
    }

    fn sort(&mut self) {
        self.names.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// File name of the selected image
    pub fn current(&self) -> Option<&str> {
        self.names.get(self.current).map(String::as_str)
    }

    /// Select the next image, wrapping after the last
    pub fn advance(&mut self) -> Option<&str> {
        if self.names.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.names.len();
        self.current()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
