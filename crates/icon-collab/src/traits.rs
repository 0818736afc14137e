//! Collaborator trait objects the orchestrator depends on but does not
//! implement: OCR label location, build-type classification, icon-group
//! and slot geometry, and the cargo/wiki metadata feed. These are
//! out-of-scope seams; this crate defines only their signatures and
//! deterministic [`crate::testing`] doubles.

use std::path::Path;

use icon_model::{ClassificationSet, IconGroupMap, LabelMap, Screenshot, SlotMap};
use serde_json::Value;

use crate::errors::{CargoError, ClassificationError, IconGroupLocatorError, IconSlotError, LocatorError};
use crate::iconset::ImageCacheMap;

/// Locates and OCRs the on-screen text labels ("Fore Weapon", "Shield",
/// ...) in a build screenshot.
pub trait LabelLocator: Send + Sync {
    fn locate(&self, screenshot: &Screenshot) -> Result<LabelMap, LocatorError>;
}

/// Determines which build type(s) a screenshot's labels belong to.
pub trait LayoutClassifier: Send + Sync {
    fn classify(&self, labels: &LabelMap) -> Result<ClassificationSet, ClassificationError>;
}

/// Computes the rectangular icon groups (one per label) within which a
/// row or grid of icon slots is expected.
pub trait IconGroupLocator: Send + Sync {
    fn locate_groups(
        &self,
        labels: &LabelMap,
        classification: &ClassificationSet,
    ) -> Result<IconGroupMap, IconGroupLocatorError>;
}

/// Subdivides each icon group into individual icon slots.
pub trait IconSlotLocator: Send + Sync {
    fn locate_slots(&self, screenshot: &Screenshot, groups: &IconGroupMap) -> Result<SlotMap, IconSlotError>;
}

/// Fetches and exposes the wiki-sourced cargo/item metadata companion
/// file (`image_cache.json`) used to enrich catalog entries.
pub trait CargoCatalog: Send + Sync {
    fn download(&self, dest: &Path) -> Result<(), CargoError>;
    fn image_cache(&self) -> Result<ImageCacheMap, CargoError>;
}

/// Records arbitrary named JSON sections during a run, writing
/// `{prefix}_test_data.json` once the sink is dropped.
pub trait TestInstrumentationSink: Send {
    fn record(&mut self, section: &str, value: Value);
}

/// A no-op sink used when no instrumentation output was requested.
#[derive(Default)]
pub struct NoopInstrumentationSink;

impl TestInstrumentationSink for NoopInstrumentationSink {
    fn record(&mut self, _section: &str, _value: Value) {}
}

/// Thin progress-bar wrapper the CLI drives from the orchestrator's
/// `on_progress` callback. The core ships a no-op default for library
/// embedders and tests.
pub trait ProgressSink: Send + Sync {
    fn update(&self, stage: &str, label: &str, percent: f64);
}

/// A no-op progress sink (the default for library embedding and tests).
#[derive(Default)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn update(&self, _stage: &str, _label: &str, _percent: f64) {}
}
