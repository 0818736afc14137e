//! The catalog hash index: build, persist, load, and radius-query over
//! every (icon file x overlay) perceptual hash pair.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use icon_model::{CatalogEntry, CatalogKey, CatalogMetadata, Hash64, HashKind, MaskType, OverlayName};
use image::RgbImage;
use md5::Digest as _;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bktree::BkTree;
use crate::error::{HashIndexError, HashIndexNotFoundError};

/// Per-icon metadata an icon-file-metadata provider hands back to the
/// index builder, merged into each of that file's six overlay entries.
#[derive(Debug, Clone, Default)]
pub struct IconFileMetadata {
    pub image_category: String,
    pub item_name: String,
    pub cargo_type: Option<String>,
    pub cargo_item_name: Option<String>,
    pub cargo_filters: HashMap<String, String>,
}

/// Supplies the metadata the hash index cannot derive from pixels alone
/// (category, display name, wiki cargo filters). Kept as a trait so this
/// crate never depends on the `image_cache.json` companion-file reader
/// that lives alongside the `CargoCatalog` collaborator.
pub trait IconMetadataSource: Send + Sync {
    fn metadata_for(&self, relative_path: &str) -> Option<IconFileMetadata>;
}

/// Tunables for the mask-then-resize-then-hash pipeline.
#[derive(Debug, Clone, Copy)]
pub struct HashOptions {
    pub match_width: u32,
    pub match_height: u32,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self { match_width: 16, match_height: 16 }
    }
}

/// Hashes an already-masked ROI: resize to the fixed match size, then
/// compute both pHash and dHash.
pub fn hash_roi(roi: &RgbImage, options: HashOptions) -> (Hash64, Hash64) {
    let resized = icon_imaging::resize_exact(roi, options.match_width, options.match_height);
    (icon_imaging::compute_phash(&resized), icon_imaging::compute_dhash(&resized))
}

#[derive(Debug, Serialize, Deserialize)]
struct HashIndexDocument {
    generated: String,
    hashes: HashMap<String, CatalogEntry>,
}

/// A comma-separated metadata filter, evaluated per "Query":
/// `Any` means "any of these values", `None` (no filter applied, absence
/// required) lives as the outer `Option` in [`Filters`].
#[derive(Debug, Clone)]
pub enum FieldFilter {
    /// Comma-separated "any of" list.
    AnyOf(Vec<String>),
    /// Leading `!`: "none of" this comma-separated list.
    NoneOf(Vec<String>),
    /// The field must be absent.
    Absent,
}

impl FieldFilter {
    pub fn parse(spec: &str) -> FieldFilter {
        if let Some(rest) = spec.strip_prefix('!') {
            FieldFilter::NoneOf(rest.split(',').map(str::trim).map(str::to_string).collect())
        } else {
            FieldFilter::AnyOf(spec.split(',').map(str::trim).map(str::to_string).collect())
        }
    }

    fn matches(&self, value: Option<&str>) -> bool {
        match self {
            FieldFilter::Absent => value.is_none(),
            FieldFilter::AnyOf(values) => value.is_some_and(|v| values.iter().any(|x| x == v)),
            FieldFilter::NoneOf(values) => value.is_none_or(|v| values.iter().all(|x| x != v)),
        }
    }
}

pub type Filters = HashMap<String, FieldFilter>;

fn metadata_field<'a>(metadata: &'a CatalogMetadata, field: &str) -> Option<&'a str> {
    match field {
        "image_path" => Some(metadata.image_path.as_str()),
        "image_filename" => Some(metadata.image_filename.as_str()),
        "image_category" => Some(metadata.image_category.as_str()),
        "overlay_name" => Some(metadata.overlay_name.as_str()),
        "cargo_type" => metadata.cargo_type.as_deref(),
        "cargo_item_name" => metadata.cargo_item_name.as_deref(),
        "item_name" => Some(metadata.item_name.as_str()),
        _ => metadata.cargo_filters.get(field).map(String::as_str),
    }
}

fn passes_filters(metadata: &CatalogMetadata, filters: &Filters) -> bool {
    filters.iter().all(|(field, filter)| filter.matches(metadata_field(metadata, field)))
}

/// One aggregated query hit: several catalog entries collapse into one
/// result whenever their source files share an MD5.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub file_path: String,
    pub distance: u32,
    /// Overlay variant that produced `distance`, i.e. the `metadata_list`
    /// entry with the closest hash to the query.
    pub best_overlay: Option<OverlayName>,
    pub metadata_list: Vec<CatalogMetadata>,
}

/// Owns the catalog entries and one BK-tree per hash kind.
pub struct HashIndex {
    entries: HashMap<CatalogKey, CatalogEntry>,
    phash_tree: BkTree,
    dhash_tree: BkTree,
    /// Reverse index from a stored hash value to the catalog keys that
    /// carry it, one map per hash kind, so `find_similar` doesn't have to
    /// linearly rescan every entry for each BK-tree hit.
    phash_lookup: HashMap<Hash64, Vec<CatalogKey>>,
    dhash_lookup: HashMap<Hash64, Vec<CatalogKey>>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            phash_tree: BkTree::new(),
            dhash_tree: BkTree::new(),
            phash_lookup: HashMap::new(),
            dhash_lookup: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walks every PNG under `icon_root`, blends each of the six overlays
    /// on, masks, and hashes it, merging metadata from `metadata_source`.
    /// Overlay-hash computation failures fail the whole build atomically:
    /// no entries are committed until every file succeeds.
    pub fn build(
        icon_root: &Path,
        overlays: &HashMap<OverlayName, image::RgbaImage>,
        metadata_source: &dyn IconMetadataSource,
        options: HashOptions,
    ) -> Result<Self, HashIndexError> {
        let files = discover_png_files(icon_root);
        info!(count = files.len(), root = %icon_root.display(), "scanning icon catalog");

        let built: Vec<Vec<CatalogEntry>> = files
            .par_iter()
            .map(|path| build_entries_for_file(icon_root, path, overlays, metadata_source, options))
            .collect::<Result<_, _>>()?;

        let mut index = HashIndex::new();
        for entries in built {
            for entry in entries {
                index.insert(entry);
            }
        }
        info!(entries = index.len(), "hash index built");
        Ok(index)
    }

    fn insert(&mut self, entry: CatalogEntry) {
        self.phash_tree.insert(entry.phash);
        self.dhash_tree.insert(entry.dhash);
        self.phash_lookup.entry(entry.phash).or_default().push(entry.key.clone());
        self.dhash_lookup.entry(entry.dhash).or_default().push(entry.key.clone());
        self.entries.insert(entry.key.clone(), entry);
    }

    pub fn load(path: &Path) -> Result<Self, HashIndexError> {
        if !path.exists() {
            return Err(HashIndexNotFoundError(path.to_path_buf()).into());
        }
        let text = std::fs::read_to_string(path).map_err(|source| HashIndexError::Io { path: path.to_path_buf(), source })?;
        let document: HashIndexDocument = serde_json::from_str(&text)?;

        let mut index = HashIndex::new();
        for (_key, entry) in document.hashes {
            index.insert(entry);
        }
        debug!(entries = index.len(), generated = %document.generated, "loaded hash index");
        Ok(index)
    }

    pub fn persist(&self, path: &Path) -> Result<(), HashIndexError> {
        let hashes: HashMap<String, CatalogEntry> =
            self.entries.iter().map(|(k, v)| (k.0.clone(), v.clone())).collect();
        let document = HashIndexDocument { generated: Utc::now().to_rfc3339(), hashes };
        let text = serde_json::to_string_pretty(&document)?;
        std::fs::write(path, text).map_err(|source| HashIndexError::Io { path: path.to_path_buf(), source })?;
        Ok(())
    }

    /// Radius search for `hash_kind`, aggregated by MD5 and filtered by
    /// metadata. `top_n` truncates after aggregation and sorting by
    /// ascending distance.
    pub fn find_similar(
        &self,
        hash_kind: HashKind,
        target: Hash64,
        max_distance: u32,
        top_n: Option<usize>,
        filters: Option<&Filters>,
    ) -> Vec<QueryHit> {
        let (tree, lookup) = match hash_kind {
            HashKind::PHash => (&self.phash_tree, &self.phash_lookup),
            HashKind::DHash => (&self.dhash_tree, &self.dhash_lookup),
        };
        let hits = tree.find_within(target, max_distance);
        if hits.is_empty() {
            return Vec::new();
        }

        // Map every matching hash back to its entries via the reverse
        // index (several catalog keys can share a hash value), filter,
        // then aggregate by MD5.
        let mut by_md5: HashMap<String, (String, u32, Option<OverlayName>, Vec<CatalogMetadata>)> = HashMap::new();
        for (hash, distance) in hits {
            let Some(keys) = lookup.get(&hash) else { continue };
            for key in keys {
                let Some(entry) = self.entries.get(key) else { continue };
                if let Some(filters) = filters {
                    if !passes_filters(&entry.metadata, filters) {
                        continue;
                    }
                }
                let bucket = by_md5.entry(entry.file_md5.clone()).or_insert_with(|| {
                    (entry.metadata.image_path.clone(), distance, None, Vec::new())
                });
                if distance <= bucket.1 {
                    bucket.1 = distance;
                    bucket.2 = Some(entry.metadata.overlay_name);
                }
                bucket.3.push(entry.metadata.clone());
            }
        }

        let mut results: Vec<QueryHit> = by_md5
            .into_values()
            .map(|(file_path, distance, best_overlay, metadata_list)| {
                QueryHit { file_path, distance, best_overlay, metadata_list }
            })
            .collect();
        results.sort_by_key(|hit| hit.distance);
        if let Some(top_n) = top_n {
            results.truncate(top_n);
        }
        results
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_png_files(root: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png")))
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

fn build_entries_for_file(
    icon_root: &Path,
    path: &Path,
    overlays: &HashMap<OverlayName, image::RgbaImage>,
    metadata_source: &dyn IconMetadataSource,
    options: HashOptions,
) -> Result<Vec<CatalogEntry>, HashIndexError> {
    let relative_path = path
        .strip_prefix(icon_root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");

    let bytes = std::fs::read(path).map_err(|source| HashIndexError::Io { path: path.to_path_buf(), source })?;
    let md5 = format!("{:x}", md5::Md5::digest(&bytes));
    let file_mtime = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    let base = image::load_from_memory(&bytes)
        .map_err(|source| icon_model::ImageProcessingError::Decode { path: path.to_path_buf(), source })?
        .to_rgb8();

    let file_metadata = metadata_source.metadata_for(&relative_path).unwrap_or_default();
    let mask_type = MaskType::for_category(&file_metadata.image_category);
    let image_filename = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();

    let mut entries = Vec::with_capacity(OverlayName::ALL.len());
    for overlay in OverlayName::ALL {
        let blended = match overlays.get(&overlay) {
            Some(overlay_image) => icon_imaging::alpha_blend(&base, overlay_image),
            None if overlay == OverlayName::Common => base.clone(),
            None => {
                warn!(overlay = overlay.as_str(), path = %path.display(), "no overlay image available, skipping");
                continue;
            }
        };
        let masked = icon_imaging::apply_mask(&blended, mask_type);
        let (phash, dhash) = hash_roi(&masked, options);

        entries.push(CatalogEntry {
            key: CatalogKey::new(&relative_path, overlay),
            phash,
            dhash,
            file_mtime,
            file_md5: md5.clone(),
            metadata: CatalogMetadata {
                image_path: relative_path.clone(),
                image_filename: image_filename.clone(),
                image_category: file_metadata.image_category.clone(),
                overlay_name: overlay,
                cargo_type: file_metadata.cargo_type.clone(),
                cargo_item_name: file_metadata.cargo_item_name.clone(),
                cargo_filters: file_metadata.cargo_filters.clone(),
                item_name: file_metadata.item_name.clone(),
                mask_type,
            },
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyMetadata;
    impl IconMetadataSource for EmptyMetadata {
        fn metadata_for(&self, _relative_path: &str) -> Option<IconFileMetadata> {
            Some(IconFileMetadata { image_category: "space/ship/deflector".to_string(), item_name: "Test Item".to_string(), ..Default::default() })
        }
    }

    #[test]
    fn field_filter_any_of_matches_listed_values() {
        let filter = FieldFilter::parse("rare,epic");
        assert!(filter.matches(Some("epic")));
        assert!(!filter.matches(Some("common")));
    }

    #[test]
    fn field_filter_none_of_excludes_listed_values() {
        let filter = FieldFilter::parse("!rare,epic");
        assert!(filter.matches(Some("common")));
        assert!(!filter.matches(Some("rare")));
    }

    #[test]
    fn field_filter_absent_requires_missing_value() {
        let filter = FieldFilter::Absent;
        assert!(filter.matches(None));
        assert!(!filter.matches(Some("anything")));
    }

    #[test]
    fn build_from_empty_directory_yields_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let overlays = HashMap::new();
        let index = HashIndex::build(dir.path(), &overlays, &EmptyMetadata, HashOptions::default()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn persist_and_load_round_trips_entries() {
        let dir = tempfile::tempdir().unwrap();
        let icon_path = dir.path().join("icon.png");
        image::RgbImage::from_pixel(32, 32, image::Rgb([10, 20, 30]))
            .save(&icon_path)
            .unwrap();

        let overlays = HashMap::new();
        let index = HashIndex::build(dir.path(), &overlays, &EmptyMetadata, HashOptions::default()).unwrap();
        assert_eq!(index.len(), 1); // only the "common" overlay, since no overlay images were supplied

        let index_path = dir.path().join("index.json");
        index.persist(&index_path).unwrap();
        let reloaded = HashIndex::load(&index_path).unwrap();
        assert_eq!(reloaded.len(), index.len());
    }

    #[test]
    fn load_of_missing_file_is_not_found_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = HashIndex::load(&missing).unwrap_err();
        assert!(matches!(err, HashIndexError::NotFound(_)));
    }
}
