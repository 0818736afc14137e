//! The orchestrator's error taxonomy: every stage-local error is caught
//! at the stage boundary and wrapped with the stage name plus a
//! serializable context snapshot.

use serde_json::Value;

/// The union of every stage-local error kind a collaborator or
/// algorithmic crate can raise.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Locate(#[from] icon_collab::LocatorError),
    #[error(transparent)]
    Classification(#[from] icon_collab::ClassificationError),
    #[error(transparent)]
    IconGroup(#[from] icon_collab::IconGroupLocatorError),
    #[error(transparent)]
    IconSlot(#[from] icon_collab::IconSlotError),
    #[error(transparent)]
    Prefilter(#[from] icon_prefilter::PrefilterError),
    #[error(transparent)]
    Cargo(#[from] icon_collab::CargoError),
    #[error(transparent)]
    HashIndex(#[from] icon_hashindex::HashIndexError),
    #[error("dependencies not met: {0} requires {1} to have completed successfully")]
    DependenciesNotMet(&'static str, &'static str),
}

/// A stage failure, wrapped with the stage's name and a JSON snapshot of
/// whatever run-state existed at the moment it failed.
#[derive(Debug, thiserror::Error)]
#[error("stage '{stage_name}' failed: {source}")]
pub struct PipelineError {
    pub stage_name: &'static str,
    #[source]
    pub source: StageError,
    pub context_snapshot: Value,
}

impl PipelineError {
    pub fn new(stage_name: &'static str, source: impl Into<StageError>, context_snapshot: Value) -> Self {
        Self { stage_name, source: source.into(), context_snapshot }
    }

    pub fn dependencies_not_met(stage_name: &'static str, missing: &'static str) -> Self {
        Self {
            stage_name,
            source: StageError::DependenciesNotMet(stage_name, missing),
            context_snapshot: Value::Null,
        }
    }
}
