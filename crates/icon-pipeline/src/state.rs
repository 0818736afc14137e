//! The run's typed stage progression: each stage's output embeds its predecessor, so a stage function
//! can only be called once the data it needs actually exists. This makes
//! "ran `classify_layout` before `locate_labels`" a compile error rather
//! than a runtime check — the [`crate::stages`] prerequisite table exists
//! alongside this chain for a different job: deciding, at run time,
//! whether a *later* stage should even attempt to run after an *earlier*
//! one failed.

use icon_model::{ClassificationSet, IconGroupMap, LabelMap, MatchSet, OverlayDetectionResult, PipelineOutput, PrefilterResult, Screenshot, SlotMap};

/// The screenshot a run operates on, already resized to its configured
/// bounds.
#[derive(Clone)]
pub struct Loaded {
    pub screenshot: Screenshot,
}

/// `locate_labels` output layered onto [`Loaded`].
#[derive(Clone)]
pub struct Labeled {
    pub loaded: Loaded,
    pub labels: LabelMap,
}

impl Labeled {
    pub fn screenshot(&self) -> &Screenshot {
        &self.loaded.screenshot
    }
}

/// `classify_layout` output layered onto [`Labeled`].
#[derive(Clone)]
pub struct Classified {
    pub labeled: Labeled,
    pub classifications: ClassificationSet,
}

impl Classified {
    pub fn screenshot(&self) -> &Screenshot {
        self.labeled.screenshot()
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labeled.labels
    }
}

/// `locate_icon_groups` output layered onto [`Classified`].
#[derive(Clone)]
pub struct Grouped {
    pub classified: Classified,
    pub groups: IconGroupMap,
}

impl Grouped {
    pub fn screenshot(&self) -> &Screenshot {
        self.classified.screenshot()
    }

    pub fn classifications(&self) -> &ClassificationSet {
        &self.classified.classifications
    }
}

/// `locate_icon_slots` output layered onto [`Grouped`].
#[derive(Clone)]
pub struct Slotted {
    pub grouped: Grouped,
    pub slots: SlotMap,
}

impl Slotted {
    pub fn classifications(&self) -> &ClassificationSet {
        self.grouped.classifications()
    }
}

/// `prefilter_icons` output layered onto [`Slotted`].
#[derive(Clone)]
pub struct Prefiltered {
    pub slotted: Slotted,
    pub prefiltered: PrefilterResult,
}

impl Prefiltered {
    pub fn slots(&self) -> &SlotMap {
        &self.slotted.slots
    }

    pub fn classifications(&self) -> &ClassificationSet {
        self.slotted.classifications()
    }
}

/// `detect_icon_overlays` output layered onto [`Prefiltered`]. Overlay
/// detection itself only reads the slot ROIs inherited through
/// `prefiltered.slotted`; it does not consume the prefilter shortlist.
#[derive(Clone)]
pub struct OverlayDetected {
    pub prefiltered: Prefiltered,
    pub overlays: OverlayDetectionResult,
}

impl OverlayDetected {
    pub fn slots(&self) -> &SlotMap {
        self.prefiltered.slots()
    }
}

/// `detect_icons` output layered onto [`OverlayDetected`].
#[derive(Clone)]
pub struct Matched {
    pub overlay_detected: OverlayDetected,
    pub matches: MatchSet,
}

/// `output_transformation` output: the final, user-facing result.
#[derive(Clone)]
pub struct Finalized {
    pub matched: Matched,
    pub output: PipelineOutput,
}
