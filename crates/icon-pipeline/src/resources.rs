//! Everything a run shares and treats as read-only once it starts: the hash index, overlay reference images, the
//! icon-set -> folder map, the collaborator trait objects, and every
//! stage's tunables. Built once by the CLI (or an embedding caller) and
//! handed to [`crate::Orchestrator::new`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use icon_collab::{CargoCatalog, IconGroupLocator, IconSetMap, IconSlotLocator, LabelLocator, LayoutClassifier, ProgressSink};
use icon_hashindex::HashIndex;
use icon_match::IconImageSource;
use icon_model::OverlayName;
use image::RgbaImage;

use crate::output::OutputOptions;

/// The optional downscale bound applied before `locate_labels`.
#[derive(Debug, Clone, Copy)]
pub struct ResizeOptions {
    pub enabled: bool,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self { enabled: true, max_width: icon_model::MAX_SCREENSHOT_WIDTH, max_height: icon_model::MAX_SCREENSHOT_HEIGHT }
    }
}

/// Read-only resources shared by every run, and every stage's tunables.
pub struct RunResources {
    pub label_locator: Arc<dyn LabelLocator>,
    pub layout_classifier: Arc<dyn LayoutClassifier>,
    pub icon_group_locator: Arc<dyn IconGroupLocator>,
    pub icon_slot_locator: Arc<dyn IconSlotLocator>,
    pub cargo_catalog: Option<Arc<dyn CargoCatalog>>,
    pub icon_root: Option<PathBuf>,

    pub hash_index: Arc<HashIndex>,
    pub icon_sets: Arc<IconSetMap>,
    pub overlay_images: Arc<HashMap<OverlayName, RgbaImage>>,
    pub icon_source: Arc<dyn IconImageSource>,
    pub progress_sink: Arc<dyn ProgressSink>,

    pub resize: ResizeOptions,
    pub prefilter_options: icon_prefilter::PrefilterOptions,
    pub overlay_options: icon_overlay::OverlayOptions,
    pub matcher_options: icon_match::MatcherOptions,
    pub output_options: OutputOptions,
}
