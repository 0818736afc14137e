//! Stage orchestration for the icon-recognition pipeline: the typed stage
//! chain, the runtime dependency table, metrics, windowed progress,
//! output transformation, the match summary renderer, and the run loop
//! that ties them together.

pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod resources;
pub mod stages;
pub mod state;
pub mod summary;

pub use error::{PipelineError, StageError};
pub use metrics::{MetricsRecorder, StageMetric};
pub use orchestrator::{NoopCallbacks, Orchestrator, PipelineCallbacks, RunContext, ScreenshotRun, WorkerPoolHandle};
pub use output::{OutputOptions, BACKFILL_TRANSFORMATION};
pub use progress::{ProgressReporter, ProgressWindow};
pub use resources::{ResizeOptions, RunResources};
pub use stages::{descriptor_for, StageDescriptor, StageKind, STAGES};
pub use summary::format_match_summary;
