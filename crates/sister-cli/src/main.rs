//! Sister entrypoint: argument parsing, logging, configuration loading,
//! and wiring the disk-backed resources an [`icon_pipeline::Orchestrator`]
//! needs for one screenshot.
//!
//! The label locator, layout classifier, icon-group locator, and icon-slot
//! locator are out-of-scope collaborators (OCR, rule-driven region
//! geometry, contour detection); this binary wires
//! [`icon_collab::unimplemented`]'s placeholders for them by default.
//! Embedders that have a real implementation of any of the four should
//! build their own [`icon_pipeline::RunResources`] and drive
//! [`icon_pipeline::Orchestrator`] directly rather than going through this
//! binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;
use icon_collab::{
    builtin_sto_icon_sets, CargoError, ImageCacheMap, ProgressSink, UnimplementedIconGroupLocator, UnimplementedIconSlotLocator,
    UnimplementedLabelLocator, UnimplementedLayoutClassifier,
};
use icon_hashindex::{HashIndex, HashOptions, IconFileMetadata, IconMetadataSource};
use icon_match::FilesystemIconImageSource;
use icon_model::{OverlayName, PipelineOutput, Screenshot};
use icon_pipeline::{
    format_match_summary, NoopCallbacks, Orchestrator, OutputOptions, PipelineCallbacks, PipelineError, ResizeOptions, RunContext, RunResources,
    StageMetric, WorkerPoolHandle,
};
use image::RgbaImage;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "sister", version, about = "Star Trek Online build-screenshot icon recognizer")]
struct Args {
    /// Screenshot to analyze. Required unless running a one-shot task
    /// (`--download` or `--build-hash-cache`).
    #[arg(long)]
    screenshot: Option<PathBuf>,

    #[arg(long)]
    icon_dir: Option<PathBuf>,

    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Where the JSON result is written. Defaults to
    /// `{output-dir}/{screenshot-stem}.json`.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,

    /// Disables the pre-`locate_labels` downscale pass.
    #[arg(long)]
    no_resize: bool,

    /// One-shot task: refresh the cargo/wiki metadata companion file.
    #[arg(long)]
    download: bool,

    /// One-shot task: rebuild `hash_index.json` from `--icon-dir`.
    #[arg(long)]
    build_hash_cache: bool,

    /// Accepted for compatibility with callers that still pass it; every
    /// stage in this crate runs on the CPU, so this flag is currently a
    /// no-op.
    #[arg(long)]
    gpu: bool,

    /// Writes `{prefix}_test_data.json` alongside the match summary.
    #[arg(long)]
    write_test_data: bool,
}

fn configure_logging(output_dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(output_dir)?;
    let file_appender = tracing_appender::rolling::never(output_dir, "sister.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_new(level).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(nb_writer).try_init().ok();
    Ok(guard)
}

/// Reads the `image_cache.json` companion file at the catalog root and
/// derives each file's category from its parent directory path.
struct FileMetadataSource {
    icon_root: PathBuf,
    cache: ImageCacheMap,
}

impl FileMetadataSource {
    fn load(icon_root: &Path) -> Self {
        let cache_path = icon_root.join("image_cache.json");
        let cache = std::fs::read_to_string(&cache_path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self { icon_root: icon_root.to_path_buf(), cache }
    }
}

impl IconMetadataSource for FileMetadataSource {
    fn metadata_for(&self, relative_path: &str) -> Option<IconFileMetadata> {
        let image_category = Path::new(relative_path).parent().map(|p| p.to_string_lossy().replace('\\', "/")).unwrap_or_default();
        let item_name = Path::new(relative_path).file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let mut metadata = IconFileMetadata { image_category, item_name, ..Default::default() };
        if let Some(entry) = self.cache.get(relative_path) {
            if !entry.item_name.is_empty() {
                metadata.item_name = entry.item_name.clone();
            }
            metadata.cargo_type = entry.cargo_type.clone();
            metadata.cargo_item_name = entry.cargo_item_name.clone();
            metadata.cargo_filters = entry.cargo_filters.clone();
        }
        let _ = &self.icon_root; // kept for future validation (e.g. existence checks)
        Some(metadata)
    }
}

fn load_overlay_images(overlay_dir: &Path) -> HashMap<OverlayName, RgbaImage> {
    let mut overlays = HashMap::new();
    for overlay in OverlayName::ALL {
        let path = overlay_dir.join(overlay.file_name());
        match image::open(&path) {
            Ok(img) => {
                overlays.insert(overlay, img.to_rgba8());
            }
            Err(e) => {
                warn!(overlay = overlay.as_str(), path = %path.display(), error = %e, "overlay reference image missing, overlay detection will skip this tier");
            }
        }
    }
    overlays
}

fn hash_index_path(icon_dir: &Path) -> PathBuf {
    icon_dir.join("hash_index.json")
}

fn load_or_build_hash_index(config: &icon_config::ConfigFile, icon_dir: &Path, overlays: &HashMap<OverlayName, RgbaImage>) -> Result<HashIndex> {
    let cache_path = hash_index_path(icon_dir);
    if cache_path.exists() {
        return HashIndex::load(&cache_path).context("loading cached hash index");
    }
    info!(path = %cache_path.display(), "no cached hash index found, building one from the icon catalog");
    let metadata_source = FileMetadataSource::load(icon_dir);
    let hash_options = HashOptions { match_width: config.hash.match_width, match_height: config.hash.match_height };
    let index = HashIndex::build(icon_dir, overlays, &metadata_source, hash_options).context("building hash index")?;
    if let Err(e) = index.persist(&cache_path) {
        warn!(error = %e, "failed to persist rebuilt hash index, continuing with the in-memory copy");
    }
    Ok(index)
}

/// A thin [`ProgressSink`] that logs instead of drawing a progress bar.
struct LoggingProgressSink;

impl ProgressSink for LoggingProgressSink {
    fn update(&self, stage: &str, label: &str, percent: f64) {
        info!(stage, label, percent, "progress");
    }
}

/// Collects a coarse per-stage record (attempted/succeeded/duration) plus
/// the final [`PipelineOutput`], for `--write-test-data`. Callbacks only
/// see stage names, success flags, and the final output, not each stage's
/// full typed state (see `icon_pipeline::state`), so this is a structured
/// summary of what ran rather than a per-stage input/output snapshot.
#[derive(Default)]
struct TestDataRecorder {
    sections: Mutex<serde_json::Map<String, Value>>,
}

impl PipelineCallbacks for TestDataRecorder {
    fn on_stage_start(&self, stage: &str, _ctx: RunContext) {
        let mut sections = self.sections.lock().unwrap();
        sections.entry(stage.to_string()).or_insert_with(|| json!({"attempted": true}));
    }

    fn on_stage_complete(&self, stage: &str, _ctx: RunContext, succeeded: bool) {
        let mut sections = self.sections.lock().unwrap();
        sections.insert(stage.to_string(), json!({"attempted": true, "succeeded": succeeded}));
    }

    fn on_error(&self, err: &PipelineError) {
        let mut sections = self.sections.lock().unwrap();
        sections.insert(format!("{}_error", err.stage_name), json!({"error": err.to_string(), "context": err.context_snapshot}));
    }

    fn on_metrics_complete(&self, metrics: &[StageMetric]) {
        let mut sections = self.sections.lock().unwrap();
        sections.insert("metrics".to_string(), json!(metrics));
    }

    fn on_pipeline_complete(&self, _ctx: RunContext, output: &PipelineOutput) {
        let mut sections = self.sections.lock().unwrap();
        sections.insert("output_transformation".to_string(), json!(output));
    }
}

impl TestDataRecorder {
    fn into_json(self) -> Value {
        Value::Object(self.sections.into_inner().unwrap())
    }
}

fn run_build_hash_cache(config: &icon_config::ConfigFile, icon_dir: &Path, overlay_dir: &Path) -> Result<()> {
    let overlays = load_overlay_images(overlay_dir);
    let metadata_source = FileMetadataSource::load(icon_dir);
    let hash_options = HashOptions { match_width: config.hash.match_width, match_height: config.hash.match_height };
    let index = HashIndex::build(icon_dir, &overlays, &metadata_source, hash_options).context("building hash index")?;
    let dest = hash_index_path(icon_dir);
    index.persist(&dest).context("persisting hash index")?;
    info!(path = %dest.display(), entries = index.len(), "hash cache rebuilt");
    Ok(())
}

fn run_download() -> Result<()> {
    // Cargo-catalog download from the game wiki is an out-of-scope
    // collaborator; this binary ships no implementation of it.
    bail!(CargoError::Download {
        path: PathBuf::from("image_cache.json"),
        reason: "no cargo catalog collaborator is compiled into this binary; embed the library with a real implementation".to_string(),
    })
}

fn prefilter_options_from(config: &icon_config::ConfigFile) -> icon_prefilter::PrefilterOptions {
    let file = &config.prefilter;
    icon_prefilter::PrefilterOptions {
        phash_radius: file.phash_radius,
        dhash_radius: file.dhash_radius,
        max_allowed_gap: file.max_allowed_gap,
        max_next_ranks: file.max_next_ranks,
        hash_options: icon_hashindex::HashOptions { match_width: config.hash.match_width, match_height: config.hash.match_height },
        chunksize: file.chunksize,
    }
}

fn overlay_options_from(config: &icon_config::ConfigFile) -> icon_overlay::OverlayOptions {
    let file = &config.overlay;
    icon_overlay::OverlayOptions {
        scale_min: file.scale_min,
        scale_max: file.scale_max,
        scale_steps: file.scale_steps,
        ssim_threshold: file.ssim_threshold,
        max_offset: file.max_offset,
        chunksize: file.chunksize,
    }
}

fn matcher_options_from(config: &icon_config::ConfigFile) -> icon_match::MatcherOptions {
    let file = &config.matcher;
    icon_match::MatcherOptions {
        scale_min: file.scale_min,
        scale_max: file.scale_max,
        scale_steps: file.scale_steps,
        ssim_threshold: file.ssim_threshold,
        chunksize: file.chunksize,
        common_branch_requires_threshold: file.common_branch_requires_threshold,
    }
}

fn run_pipeline(args: &Args, config: &icon_config::ConfigFile, icon_dir: &Path, overlay_dir: &Path, output_dir: &Path, resize: bool) -> Result<()> {
    let screenshot_path = args.screenshot.as_ref().context("--screenshot is required for a normal run")?;
    let screenshot_image = image::open(screenshot_path).with_context(|| format!("opening screenshot {}", screenshot_path.display()))?.to_rgb8();
    let screenshot = Screenshot::new(screenshot_image);

    let overlays = load_overlay_images(overlay_dir);
    let hash_index = load_or_build_hash_index(config, icon_dir, &overlays)?;
    info!(entries = hash_index.len(), "hash index ready");

    let resources = RunResources {
        label_locator: Arc::new(UnimplementedLabelLocator),
        layout_classifier: Arc::new(UnimplementedLayoutClassifier),
        icon_group_locator: Arc::new(UnimplementedIconGroupLocator),
        icon_slot_locator: Arc::new(UnimplementedIconSlotLocator),
        cargo_catalog: None,
        icon_root: Some(icon_dir.to_path_buf()),
        hash_index: Arc::new(hash_index),
        icon_sets: Arc::new(builtin_sto_icon_sets()),
        overlay_images: Arc::new(overlays),
        icon_source: Arc::new(FilesystemIconImageSource::new(icon_dir.to_path_buf())),
        progress_sink: Arc::new(LoggingProgressSink) as Arc<dyn ProgressSink>,
        resize: ResizeOptions { enabled: resize, max_width: config.resize.max_width, max_height: config.resize.max_height },
        prefilter_options: prefilter_options_from(config),
        overlay_options: overlay_options_from(config),
        matcher_options: matcher_options_from(config),
        output_options: OutputOptions::default(),
    };

    let pool = WorkerPoolHandle::new(num_cpus()).context("starting worker pool")?;
    // Keep a typed handle to the recorder alongside the type-erased one
    // handed to the orchestrator, so it can be unwrapped back out once the
    // orchestrator (and its own clone of the `Arc`) is dropped.
    let recorder = args.write_test_data.then(|| Arc::new(TestDataRecorder::default()));
    let callbacks: Arc<dyn PipelineCallbacks> = match &recorder {
        Some(recorder) => recorder.clone(),
        None => Arc::new(NoopCallbacks),
    };
    let orchestrator = Orchestrator::new(resources, pool, callbacks);

    Orchestrator::startup(output_dir).context("pipeline startup")?;

    let mut runs = orchestrator.run(&[screenshot]);
    let run = runs.pop().expect("run() returns exactly one ScreenshotRun per input screenshot");
    orchestrator.shutdown();

    for err in &run.errors {
        error!(stage = err.stage_name, error = %err, "stage failed");
    }

    let prefix = screenshot_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| "screenshot".to_string());

    let Some(output) = run.output else {
        bail!("pipeline produced no output for {}", screenshot_path.display());
    };

    let summary_path = output_dir.join(format!("{prefix}_matches.txt"));
    std::fs::write(&summary_path, format_match_summary(&output)).with_context(|| format!("writing {}", summary_path.display()))?;

    let json_path = args.output.clone().unwrap_or_else(|| output_dir.join(format!("{prefix}.json")));
    let json_text = serde_json::to_string_pretty(&output).context("serializing pipeline output")?;
    std::fs::write(&json_path, json_text).with_context(|| format!("writing {}", json_path.display()))?;

    if let Some(recorder) = recorder {
        let recorder = Arc::into_inner(recorder)
            .expect("orchestrator was shut down, so this is the only remaining reference");
        let test_data_path = output_dir.join(format!("{prefix}_test_data.json"));
        let test_data_text = serde_json::to_string_pretty(&recorder.into_json()).context("serializing test data")?;
        std::fs::write(&test_data_path, test_data_text).with_context(|| format!("writing {}", test_data_path.display()))?;
        info!(path = %test_data_path.display(), "wrote test data");
    }

    info!(summary = %summary_path.display(), output = %json_path.display(), "run complete");
    Ok(())
}

fn num_cpus() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = icon_config::load_from(None).context("loading sister.toml")?;

    let icon_dir = args.icon_dir.clone().unwrap_or_else(|| PathBuf::from(config.file.paths.icon_dir.clone()));
    let overlay_dir = args.overlay_dir.clone().unwrap_or_else(|| PathBuf::from(config.file.paths.overlay_dir.clone()));
    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from(config.file.paths.output_dir.clone()));
    let log_level = args.log_level.clone().unwrap_or_else(|| config.file.logging.level.clone());
    let resize = icon_config::resolve(if args.no_resize { Some(false) } else { None }, config.file.resize.enabled);

    let _log_guard = configure_logging(&output_dir, &log_level)?;
    info!(icon_dir = %icon_dir.display(), overlay_dir = %overlay_dir.display(), output_dir = %output_dir.display(), "starting");

    let result = if args.download {
        run_download()
    } else if args.build_hash_cache {
        run_build_hash_cache(&config.file, &icon_dir, &overlay_dir)
    } else {
        if args.gpu {
            warn!("--gpu was requested but every stage in this build runs on the CPU; ignoring");
        }
        run_pipeline(&args, &config.file, &icon_dir, &overlay_dir, &output_dir, resize)
    };

    if let Err(e) = result {
        error!(error = %e, "fatal error");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
