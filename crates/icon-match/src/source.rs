//! Catalog icon pixel access. Kept as a narrow trait seam so the matcher stays testable
//! without disk I/O; a real implementation (file-backed, cached) is wired
//! up by the orchestrator.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::IconMatchError;

pub trait IconImageSource: Sync {
    fn load(&self, file_path: &str) -> Result<RgbImage, IconMatchError>;
}

/// An in-memory catalog, for tests and small embedded catalogs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIconImageSource {
    images: HashMap<String, RgbImage>,
}

impl InMemoryIconImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_path: impl Into<String>, image: RgbImage) {
        self.images.insert(file_path.into(), image);
    }
}

impl IconImageSource for InMemoryIconImageSource {
    fn load(&self, file_path: &str) -> Result<RgbImage, IconMatchError> {
        self.images.get(file_path).cloned().ok_or_else(|| IconMatchError::IconLoadFailed {
            file_path: file_path.to_string(),
            reason: "not present in the in-memory catalog".to_string(),
        })
    }
}

/// Loads catalog icons from `root`-relative paths on disk, decoding
/// straight to RGB the same way the hash-index builder does.
#[derive(Debug, Clone)]
pub struct FilesystemIconImageSource {
    root: PathBuf,
}

impl FilesystemIconImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl IconImageSource for FilesystemIconImageSource {
    fn load(&self, file_path: &str) -> Result<RgbImage, IconMatchError> {
        let full_path = self.root.join(file_path);
        image::open(&full_path)
            .map(|img| img.to_rgb8())
            .map_err(|e| IconMatchError::IconLoadFailed { file_path: file_path.to_string(), reason: e.to_string() })
    }
}
