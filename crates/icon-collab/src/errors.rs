//! One `thiserror` enum per collaborator concern, unified by the
//! orchestrator's `PipelineError`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    #[error("label location failed: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("no build type could be classified from the located labels")]
    NoMatch,
    #[error("classification failed: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IconGroupLocatorError {
    #[error("no icon group rules registered for build type {0:?}")]
    NoRulesForBuildType(String),
    #[error("failed to parse geometry expression: {0}")]
    ExpressionParse(String),
    #[error("failed to evaluate geometry expression: {0}")]
    ExpressionEvaluation(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IconSlotError {
    #[error("no icon groups were provided to slot detection")]
    NoGroups,
    #[error("slot detection failed for group {group}: {reason}")]
    Failed { group: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CargoError {
    #[error("failed to download cargo data to {path}: {reason}")]
    Download { path: PathBuf, reason: String },
    #[error("failed to read image cache companion file {0}")]
    ImageCacheRead(PathBuf),
    #[error("failed to parse image cache companion file {path}: {source}")]
    ImageCacheParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
