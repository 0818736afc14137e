use std::path::PathBuf;

/// The on-disk hash index file could not be found.
#[derive(Debug, thiserror::Error)]
#[error("hash index not found at {0}")]
pub struct HashIndexNotFoundError(pub PathBuf);

/// Any other failure building, loading, or persisting the hash index.
#[derive(Debug, thiserror::Error)]
pub enum HashIndexError {
    #[error(transparent)]
    NotFound(#[from] HashIndexNotFoundError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse hash index document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] icon_model::ImageProcessingError),

    #[error("overlay image missing for {0}")]
    MissingOverlayImage(String),
}
