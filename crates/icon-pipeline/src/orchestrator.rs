//! The run loop: walks the typed stage chain ([`crate::state`]) for one
//! screenshot at a time, consulting the dependency table
//! ([`crate::stages`]) to decide whether a stage downstream of an earlier
//! failure should even attempt to run, and drives callbacks, metrics, and
//! progress around every stage.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use icon_model::{PipelineOutput, Screenshot};
use serde_json::json;
use tracing::{error, warn};

use crate::error::PipelineError;
use crate::metrics::{MetricsRecorder, StageMetric};
use crate::output;
use crate::progress::ProgressReporter;
use crate::resources::RunResources;
use crate::stages::{descriptor_for, StageKind};
use crate::state::{Classified, Grouped, Labeled, Loaded, Matched, OverlayDetected, Prefiltered, Slotted};
use crate::summary::format_match_summary;

/// Where a screenshot sits in a multi-screenshot run, handed to every
/// callback so it can tell runs apart without the orchestrator exposing
/// its internal loop state.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    pub screenshot_index: usize,
    pub total_screenshots: usize,
}

/// Observer hooks the CLI (or an embedding caller) can implement to watch
/// a run in progress. Every method defaults to a no-op, so implementors
/// only override what they need. A panic inside a callback is caught and
/// logged rather than unwinding the run.
pub trait PipelineCallbacks: Send + Sync {
    fn on_stage_start(&self, _stage: &str, _ctx: RunContext) {}
    fn on_stage_complete(&self, _stage: &str, _ctx: RunContext, _succeeded: bool) {}
    fn on_progress(&self, _stage: &str, _label: &str, _percent: f64, _ctx: RunContext) {}
    fn on_pipeline_complete(&self, _ctx: RunContext, _output: &PipelineOutput) {}
    fn on_error(&self, _err: &PipelineError) {}
    fn on_metrics_complete(&self, _metrics: &[StageMetric]) {}
}

/// The default, silent callback set, for library embedding and tests.
#[derive(Default)]
pub struct NoopCallbacks;
impl PipelineCallbacks for NoopCallbacks {}

/// Runs `f`, logging (not propagating) a panic raised inside it.
fn guarded(label: &str, f: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        let msg = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        error!(callback = label, panic = msg, "pipeline callback panicked; continuing the run");
    }
}

/// A thin wrapper around a dedicated `rayon` thread pool, so a run's CPU
/// parallelism is bounded independently of the process-wide global pool.
pub struct WorkerPoolHandle {
    pool: rayon::ThreadPool,
}

impl WorkerPoolHandle {
    pub fn new(num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(num_threads).build()?;
        Ok(Self { pool })
    }

    pub fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        self.pool.install(f)
    }
}

/// One screenshot's outcome: the finished output (if `output_transformation`
/// ran at all) plus every stage failure recorded along the way, in stage
/// order. A run can produce an output even with errors present: a stage
/// whose only dependents are other, independently-reachable stages does
/// not necessarily poison the whole chain.
pub struct ScreenshotRun {
    pub index: usize,
    pub output: Option<PipelineOutput>,
    pub errors: Vec<PipelineError>,
}

/// Drives one or many screenshots through the full stage chain.
pub struct Orchestrator {
    resources: RunResources,
    worker_pool: WorkerPoolHandle,
    callbacks: Arc<dyn PipelineCallbacks>,
}

impl Orchestrator {
    pub fn new(resources: RunResources, worker_pool: WorkerPoolHandle, callbacks: Arc<dyn PipelineCallbacks>) -> Self {
        Self { resources, worker_pool, callbacks }
    }

    /// Stamps the user's data directory with the built-in icon-set map if
    /// it is not already present. Idempotent, and safe to call on every
    /// launch.
    /// Bundled overlay reference images are not shipped inside this crate
    /// and are expected to already be present in `data_dir` (or supplied
    /// directly via [`RunResources::overlay_images`]); this only seeds the
    /// icon-set map, the one asset this crate can generate from code.
    pub fn startup(data_dir: &std::path::Path) -> std::io::Result<()> {
        std::fs::create_dir_all(data_dir)?;
        let icon_sets_path = data_dir.join("icon_sets.json");
        if icon_sets_path.exists() {
            return Ok(());
        }
        let icon_sets = icon_collab::builtin_sto_icon_sets();
        let json = serde_json::to_vec_pretty(&icon_sets).unwrap_or_default();
        std::fs::write(icon_sets_path, json)
    }

    /// Releases the dedicated worker pool. `rayon::ThreadPool` shuts its
    /// threads down on drop, so this only exists to give callers an
    /// explicit point to say "this run is over."
    pub fn shutdown(self) {
        drop(self.worker_pool);
    }

    /// A one-shot task that does not walk the per-screenshot stage chain:
    /// refreshing the cargo/wiki catalog metadata companion file used to
    /// enrich catalog entries at hash-index build time.
    pub fn refresh_cargo_catalog(&self, dest: &std::path::Path) -> Result<(), icon_collab::CargoError> {
        let Some(catalog) = &self.resources.cargo_catalog else {
            return Err(icon_collab::CargoError::Download {
                path: dest.to_path_buf(),
                reason: "no cargo catalog collaborator configured".to_string(),
            });
        };
        catalog.download(dest)
    }

    /// Another one-shot task: rebuilds the hash index from the icon root
    /// this orchestrator was configured with and persists it to
    /// `dest`. Runs on the dedicated worker pool since the underlying
    /// build already parallelizes per file.
    pub fn rebuild_hash_cache(&self, metadata_source: &dyn icon_hashindex::IconMetadataSource, dest: &std::path::Path) -> Result<(), icon_hashindex::HashIndexError> {
        let Some(icon_root) = &self.resources.icon_root else {
            return Err(icon_hashindex::HashIndexError::Io {
                path: dest.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no icon root configured"),
            });
        };
        let index = self.worker_pool.install(|| {
            icon_hashindex::HashIndex::build(icon_root, &self.resources.overlay_images, metadata_source, icon_hashindex::HashOptions::default())
        })?;
        index.persist(dest)
    }

    /// Runs every screenshot through the full chain, in order, reporting
    /// progress as `[i/N, (i+1)/N]` of the overall 0-100% scale.
    pub fn run(&self, screenshots: &[Screenshot]) -> Vec<ScreenshotRun> {
        let total = screenshots.len();
        screenshots
            .iter()
            .enumerate()
            .map(|(index, screenshot)| self.run_one(screenshot, RunContext { screenshot_index: index, total_screenshots: total }))
            .collect()
    }

    fn start_stage(&self, recorder: &mut MetricsRecorder, kind: StageKind, ctx: RunContext) {
        let name = descriptor_for(kind).name;
        recorder.start(name);
        guarded("on_stage_start", || self.callbacks.on_stage_start(name, ctx));
    }

    fn finish_stage(&self, recorder: &mut MetricsRecorder, kind: StageKind, ctx: RunContext, succeeded: bool) {
        let name = descriptor_for(kind).name;
        recorder.stop(name);
        guarded("on_stage_complete", || self.callbacks.on_stage_complete(name, ctx, succeeded));
    }

    /// Records a stage as attempted-but-skipped because one of its
    /// declared prerequisites did not complete successfully. Still opens and closes a metrics span and fires the
    /// start/complete callbacks, so `on_metrics_complete` reports a
    /// duration for every stage, including ones that never really ran.
    fn skip_stage(&self, recorder: &mut MetricsRecorder, kind: StageKind, ctx: RunContext, missing: &'static str, errors: &mut Vec<PipelineError>) {
        self.start_stage(recorder, kind, ctx);
        let err = PipelineError::dependencies_not_met(descriptor_for(kind).name, missing);
        self.report_error(&err);
        errors.push(err);
        self.finish_stage(recorder, kind, ctx, false);
    }

    fn report_error(&self, err: &PipelineError) {
        warn!(stage = err.stage_name, error = %err.source, "stage failed");
        guarded("on_error", || self.callbacks.on_error(err));
    }

    fn run_one(&self, screenshot: &Screenshot, ctx: RunContext) -> ScreenshotRun {
        let mut recorder = MetricsRecorder::new();
        let mut errors: Vec<PipelineError> = Vec::new();
        let progress = ProgressReporter::new("pipeline", self.resources.progress_sink.as_ref()).for_item(ctx.screenshot_index, ctx.total_screenshots.max(1));

        // locate_labels
        self.start_stage(&mut recorder, StageKind::LocateLabels, ctx);
        let resized = if self.resources.resize.enabled {
            screenshot.resize_to_bounds(self.resources.resize.max_width, self.resources.resize.max_height)
        } else {
            screenshot.clone()
        };
        let loaded = Loaded { screenshot: resized };
        let labeled = match self.resources.label_locator.locate(loaded.screenshot()) {
            Ok(labels) => {
                self.finish_stage(&mut recorder, StageKind::LocateLabels, ctx, true);
                Some(Labeled { loaded, labels })
            }
            Err(e) => {
                let err = PipelineError::new("locate_labels", e, json!({}));
                self.report_error(&err);
                errors.push(err);
                self.finish_stage(&mut recorder, StageKind::LocateLabels, ctx, false);
                None
            }
        };
        progress.report("locate_labels", 10.0);

        // classify_layout
        let classified = match &labeled {
            Some(labeled) => {
                self.start_stage(&mut recorder, StageKind::ClassifyLayout, ctx);
                match self.resources.layout_classifier.classify(&labeled.labels) {
                    Ok(classifications) => {
                        self.finish_stage(&mut recorder, StageKind::ClassifyLayout, ctx, true);
                        Some(Classified { labeled: labeled.clone(), classifications })
                    }
                    Err(e) => {
                        let err = PipelineError::new("classify_layout", e, json!({}));
                        self.report_error(&err);
                        errors.push(err);
                        self.finish_stage(&mut recorder, StageKind::ClassifyLayout, ctx, false);
                        None
                    }
                }
            }
            None => {
                self.skip_stage(&mut recorder, StageKind::ClassifyLayout, ctx, "locate_labels", &mut errors);
                None
            }
        };
        progress.report("classify_layout", 20.0);

        // locate_icon_groups
        let grouped = match &classified {
            Some(classified) => {
                self.start_stage(&mut recorder, StageKind::LocateIconGroups, ctx);
                match self.resources.icon_group_locator.locate_groups(classified.labels(), &classified.classifications) {
                    Ok(groups) => {
                        self.finish_stage(&mut recorder, StageKind::LocateIconGroups, ctx, true);
                        Some(Grouped { classified: classified.clone(), groups })
                    }
                    Err(e) => {
                        let err = PipelineError::new("locate_icon_groups", e, json!({}));
                        self.report_error(&err);
                        errors.push(err);
                        self.finish_stage(&mut recorder, StageKind::LocateIconGroups, ctx, false);
                        None
                    }
                }
            }
            None => {
                self.skip_stage(&mut recorder, StageKind::LocateIconGroups, ctx, "classify_layout", &mut errors);
                None
            }
        };
        progress.report("locate_icon_groups", 30.0);

        // locate_icon_slots
        let slotted = match &grouped {
            Some(grouped) => {
                self.start_stage(&mut recorder, StageKind::LocateIconSlots, ctx);
                match self.resources.icon_slot_locator.locate_slots(grouped.screenshot(), &grouped.groups) {
                    Ok(slots) => {
                        self.finish_stage(&mut recorder, StageKind::LocateIconSlots, ctx, true);
                        Some(Slotted { grouped: grouped.clone(), slots })
                    }
                    Err(e) => {
                        let err = PipelineError::new("locate_icon_slots", e, json!({}));
                        self.report_error(&err);
                        errors.push(err);
                        self.finish_stage(&mut recorder, StageKind::LocateIconSlots, ctx, false);
                        None
                    }
                }
            }
            None => {
                self.skip_stage(&mut recorder, StageKind::LocateIconSlots, ctx, "locate_icon_groups", &mut errors);
                None
            }
        };
        progress.report("locate_icon_slots", 40.0);

        // prefilter_icons
        let (prefiltered, prefilter_ok) = match &slotted {
            Some(slotted) => {
                self.start_stage(&mut recorder, StageKind::PrefilterIcons, ctx);
                let result = self.worker_pool.install(|| {
                    icon_prefilter::run(&slotted.slots, slotted.classifications(), &self.resources.icon_sets, &self.resources.hash_index, &self.resources.prefilter_options)
                });
                match result {
                    Ok(result) => {
                        self.finish_stage(&mut recorder, StageKind::PrefilterIcons, ctx, true);
                        (Some(Prefiltered { slotted: slotted.clone(), prefiltered: result }), true)
                    }
                    Err(e) => {
                        let err = PipelineError::new("prefilter_icons", e, json!({}));
                        self.report_error(&err);
                        errors.push(err);
                        self.finish_stage(&mut recorder, StageKind::PrefilterIcons, ctx, false);
                        // Substitute an empty shortlist so detect_icon_overlays, whose
                        // only real prerequisite is locate_icon_slots, can still run
                        // against the real slot ROIs.
                        (Some(Prefiltered { slotted: slotted.clone(), prefiltered: icon_model::PrefilterResult::new() }), false)
                    }
                }
            }
            None => {
                self.skip_stage(&mut recorder, StageKind::PrefilterIcons, ctx, "locate_icon_slots", &mut errors);
                (None, false)
            }
        };
        progress.report("prefilter_icons", 55.0);

        // detect_icon_overlays: depends only on locate_icon_slots, independent of prefilter_icons.
        let overlay_detected = match &prefiltered {
            Some(prefiltered) => {
                self.start_stage(&mut recorder, StageKind::DetectIconOverlays, ctx);
                let overlays = self.worker_pool.install(|| icon_overlay::run(prefiltered.slots(), &self.resources.overlay_images, &self.resources.overlay_options));
                self.finish_stage(&mut recorder, StageKind::DetectIconOverlays, ctx, true);
                Some(OverlayDetected { prefiltered: prefiltered.clone(), overlays })
            }
            None => {
                self.skip_stage(&mut recorder, StageKind::DetectIconOverlays, ctx, "locate_icon_slots", &mut errors);
                None
            }
        };
        progress.report("detect_icon_overlays", 65.0);

        // load_icons: depends on prefilter_icons actually succeeding (not merely on slots existing).
        self.start_stage(&mut recorder, StageKind::LoadIcons, ctx);
        let load_ok = if !prefilter_ok {
            let err = PipelineError::dependencies_not_met("load_icons", "prefilter_icons");
            self.report_error(&err);
            errors.push(err);
            self.finish_stage(&mut recorder, StageKind::LoadIcons, ctx, false);
            false
        } else {
            let prefiltered = prefiltered.as_ref().expect("prefilter_ok implies prefiltered is Some");
            match load_catalog_icons(&prefiltered.prefiltered, self.resources.icon_source.as_ref(), self.resources.cargo_catalog.as_deref(), self.resources.icon_root.as_deref()) {
                Ok(()) => {
                    self.finish_stage(&mut recorder, StageKind::LoadIcons, ctx, true);
                    true
                }
                Err(e) => {
                    let err = PipelineError::new("load_icons", e, json!({}));
                    self.report_error(&err);
                    errors.push(err);
                    self.finish_stage(&mut recorder, StageKind::LoadIcons, ctx, false);
                    false
                }
            }
        };
        progress.report("load_icons", 70.0);

        // detect_icons: depends on prefilter_icons, detect_icon_overlays, and load_icons all succeeding.
        let matched = if prefilter_ok && load_ok {
            match &overlay_detected {
                Some(overlay_detected) => {
                    self.start_stage(&mut recorder, StageKind::DetectIcons, ctx);
                    let matches = self.worker_pool.install(|| {
                        icon_match::run(
                            overlay_detected.slots(),
                            &overlay_detected.prefiltered.prefiltered,
                            &overlay_detected.overlays,
                            &self.resources.icon_sets,
                            &self.resources.overlay_images,
                            self.resources.icon_source.as_ref(),
                            &self.resources.matcher_options,
                        )
                    });
                    self.finish_stage(&mut recorder, StageKind::DetectIcons, ctx, true);
                    Some(Matched { overlay_detected: overlay_detected.clone(), matches })
                }
                None => {
                    self.skip_stage(&mut recorder, StageKind::DetectIcons, ctx, "detect_icon_overlays", &mut errors);
                    None
                }
            }
        } else {
            self.skip_stage(&mut recorder, StageKind::DetectIcons, ctx, "prefilter_icons, load_icons", &mut errors);
            None
        };
        progress.report("detect_icons", 90.0);

        // output_transformation
        let output = match &matched {
            Some(matched) => {
                self.start_stage(&mut recorder, StageKind::OutputTransformation, ctx);
                let build_type = matched.overlay_detected.prefiltered.slotted.classifications().main.build_type;
                let output = output::run(
                    matched.matches.clone(),
                    &matched.overlay_detected.prefiltered.prefiltered,
                    &matched.overlay_detected.overlays,
                    Some(build_type),
                    &self.resources.output_options,
                );
                self.finish_stage(&mut recorder, StageKind::OutputTransformation, ctx, true);
                Some(output)
            }
            None => {
                self.skip_stage(&mut recorder, StageKind::OutputTransformation, ctx, "detect_icons", &mut errors);
                None
            }
        };
        progress.report("output_transformation", 100.0);

        let metrics = recorder.into_completed();
        guarded("on_metrics_complete", || self.callbacks.on_metrics_complete(&metrics));

        if let Some(output) = &output {
            // format_match_summary's rendering is exercised by the `{prefix}_matches.txt`
            // writer at the CLI boundary; here it only needs to run without panicking.
            let _ = format_match_summary(output);
            guarded("on_pipeline_complete", || self.callbacks.on_pipeline_complete(ctx, output));
        }

        ScreenshotRun { index: ctx.screenshot_index, output, errors }
    }
}

/// Loads (or confirms the loadability of) every catalog file the
/// prefilter shortlisted, so a missing-asset failure surfaces as its own
/// stage rather than silently degrading every slot's matcher results.
/// When files are missing and a cargo catalog collaborator is configured,
/// this re-downloads the whole catalog once and does not retry the load:
/// the matcher itself tolerates per-candidate load failures, so a still-missing file after a refresh is
/// left for the matcher to skip rather than failing the run.
fn load_catalog_icons(
    prefiltered: &icon_model::PrefilterResult,
    icon_source: &dyn icon_match::IconImageSource,
    cargo_catalog: Option<&dyn icon_collab::CargoCatalog>,
    icon_root: Option<&std::path::Path>,
) -> Result<(), icon_collab::CargoError> {
    let mut missing = 0usize;
    for slots in prefiltered.by_slot.values() {
        for candidates in slots.values() {
            for candidate in candidates {
                if icon_source.load(&candidate.file_path).is_err() {
                    missing += 1;
                }
            }
        }
    }
    if missing == 0 {
        return Ok(());
    }
    match (cargo_catalog, icon_root) {
        (Some(catalog), Some(root)) => {
            warn!(missing, "missing catalog icon files, re-downloading the cargo catalog");
            catalog.download(root)
        }
        _ => {
            warn!(missing, "missing catalog icon files and no cargo catalog configured to re-fetch them");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icon_collab::testing::{FixedCargoCatalog, FixedIconGroupLocator, FixedIconSlotLocator, FixedLabelLocator, FixedLayoutClassifier};
    use icon_collab::{builtin_sto_icon_sets, ClassificationError, IconSetMap, LayoutClassifier, NoopProgressSink};
    use icon_hashindex::{HashIndex, HashOptions, IconFileMetadata, IconMetadataSource};
    use icon_match::InMemoryIconImageSource;
    use icon_model::{BBox, Classification, ClassificationSet, IconGroup, IconGroupMap, IconSetKey, Label, LabelMap, Platform, Point, Slot, SlotMap};
    use image::{Rgb, RgbImage};
    use std::collections::HashMap;

    struct EmptyMetadata;
    impl IconMetadataSource for EmptyMetadata {
        fn metadata_for(&self, _relative_path: &str) -> Option<IconFileMetadata> {
            None
        }
    }

    struct FailingLayoutClassifier;
    impl LayoutClassifier for FailingLayoutClassifier {
        fn classify(&self, _labels: &LabelMap) -> Result<ClassificationSet, ClassificationError> {
            Err(ClassificationError::NoMatch)
        }
    }

    fn resources_with_failing_classifier() -> RunResources {
        let dir = tempfile::tempdir().unwrap();
        let hash_index = HashIndex::build(dir.path(), &HashMap::new(), &EmptyMetadata, HashOptions::default()).unwrap();

        RunResources {
            label_locator: Arc::new(FixedLabelLocator { labels: LabelMap::new() }),
            layout_classifier: Arc::new(FailingLayoutClassifier),
            icon_group_locator: Arc::new(FixedIconGroupLocator { groups: IconGroupMap::new() }),
            icon_slot_locator: Arc::new(FixedIconSlotLocator { slots: SlotMap::new() }),
            cargo_catalog: Some(Arc::new(FixedCargoCatalog::default())),
            icon_root: None,
            hash_index: Arc::new(hash_index),
            icon_sets: Arc::new(builtin_sto_icon_sets()),
            overlay_images: Arc::new(HashMap::new()),
            icon_source: Arc::new(InMemoryIconImageSource::new()),
            progress_sink: Arc::new(NoopProgressSink),
            resize: crate::resources::ResizeOptions::default(),
            prefilter_options: icon_prefilter::PrefilterOptions::default(),
            overlay_options: icon_overlay::OverlayOptions::default(),
            matcher_options: icon_match::MatcherOptions::default(),
            output_options: output::OutputOptions::default(),
        }
    }

    #[test]
    fn classify_layout_failure_cascades_through_every_downstream_stage() {
        let resources = resources_with_failing_classifier();
        let pool = WorkerPoolHandle::new(1).unwrap();
        let orchestrator = Orchestrator::new(resources, pool, Arc::new(NoopCallbacks));

        let screenshot = Screenshot::new(RgbImage::from_pixel(64, 64, Rgb([10, 10, 10])));
        let runs = orchestrator.run(&[screenshot]);
        assert_eq!(runs.len(), 1);
        let run = &runs[0];

        assert!(run.output.is_none());
        // classify_layout itself failed, and every stage after it failed on a
        // missing dependency, down through output_transformation.
        assert!(run.errors.len() >= 7);
        assert!(run.errors.iter().any(|e| e.stage_name == "classify_layout"));
        assert!(run.errors.iter().any(|e| e.stage_name == "output_transformation"));
    }

    fn passthrough_resources() -> RunResources {
        let dir = tempfile::tempdir().unwrap();
        let icon_path = dir.path().join("icon.png");
        let icon_image = RgbImage::from_pixel(40, 40, Rgb([80, 80, 80]));
        icon_image.save(&icon_path).unwrap();

        struct FixedCategory;
        impl IconMetadataSource for FixedCategory {
            fn metadata_for(&self, _relative_path: &str) -> Option<IconFileMetadata> {
                Some(IconFileMetadata { image_category: "space/weapons/fore".to_string(), item_name: "Phaser Beam Array".to_string(), ..Default::default() })
            }
        }

        let hash_index = HashIndex::build(dir.path(), &HashMap::new(), &FixedCategory, HashOptions::default()).unwrap();

        let roi = RgbImage::from_pixel(40, 40, Rgb([80, 80, 80]));
        // Mirrors HashIndex::build: catalog entries are hashed after masking,
        // so the slot's own hash must be computed the same way to land in the
        // prefilter shortlist for this category.
        let masked_roi = icon_imaging::apply_mask(&roi, icon_model::MaskType::for_category("space/weapons/fore"));
        let (phash, dhash) = icon_hashindex::hash_roi(&masked_roi, HashOptions::default());
        let mut slots = SlotMap::new();
        slots.insert_group("Fore Weapon", vec![Slot::new("Fore Weapon", 0, BBox::new(0, 0, 40, 40), roi, phash, dhash)]);

        let mut icon_sets = IconSetMap::new();
        icon_sets.insert_set(IconSetKey::Ship, [("Fore Weapon".to_string(), vec!["space/weapons/fore".to_string()])].into_iter().collect());

        let mut icon_source = InMemoryIconImageSource::new();
        icon_source.insert("icon.png", icon_image);

        let mut labels = LabelMap::new();
        let corner = Point::new(0, 0);
        labels.insert(Label::new("Fore Weapon", [corner; 4]));

        let mut groups = IconGroupMap::new();
        groups.insert(IconGroup::new("Fore Weapon", BBox::new(0, 0, 40, 40)));

        RunResources {
            label_locator: Arc::new(FixedLabelLocator { labels }),
            layout_classifier: Arc::new(FixedLayoutClassifier {
                classification: ClassificationSet::new(Classification {
                    build_type: icon_model::BuildType::PcShipBuild,
                    score: 1.0,
                    is_required: true,
                    icon_set_key: IconSetKey::Ship,
                    platform: Platform::Pc,
                }),
            }),
            icon_group_locator: Arc::new(FixedIconGroupLocator { groups }),
            icon_slot_locator: Arc::new(FixedIconSlotLocator { slots }),
            cargo_catalog: None,
            icon_root: None,
            hash_index: Arc::new(hash_index),
            icon_sets: Arc::new(icon_sets),
            overlay_images: Arc::new(HashMap::new()),
            icon_source: Arc::new(icon_source),
            progress_sink: Arc::new(NoopProgressSink),
            resize: crate::resources::ResizeOptions::default(),
            prefilter_options: icon_prefilter::PrefilterOptions::default(),
            overlay_options: icon_overlay::OverlayOptions::default(),
            matcher_options: icon_match::MatcherOptions::default(),
            output_options: output::OutputOptions::default(),
        }
    }

    #[test]
    fn a_clean_run_reaches_output_transformation_with_no_errors() {
        let resources = passthrough_resources();
        let pool = WorkerPoolHandle::new(1).unwrap();
        let orchestrator = Orchestrator::new(resources, pool, Arc::new(NoopCallbacks));

        let screenshot = Screenshot::new(RgbImage::from_pixel(64, 64, Rgb([10, 10, 10])));
        let runs = orchestrator.run(&[screenshot]);
        let run = &runs[0];

        assert!(run.errors.is_empty());
        assert!(run.output.is_some());
    }
}
