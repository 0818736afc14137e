//! Shared image I/O error types.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ImageProcessingError {
    #[error("image not found: {0}")]
    NotFound(#[from] ImageNotFoundError),
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported image geometry: {0}")]
    UnsupportedGeometry(String),
}

#[derive(Debug, thiserror::Error)]
#[error("image file not found: {0}")]
pub struct ImageNotFoundError(pub PathBuf);
