//! Catalog entries: one per (icon file × overlay variant).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::hash::Hash64;
use crate::overlay::OverlayName;

/// How a catalog entry's source image is masked before hashing/matching.
/// A pure function of `image_category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskType {
    /// Zero the bottom-right quadrant (x >= W/2, y >= 3H/4) to suppress
    /// corner decorations. The default for most categories.
    BottomRightQuadrant,
    /// No masking; used for categories with no corner decoration.
    None,
}

impl MaskType {
    /// Pure function from category path to mask type. Trait categories
    /// carry rank/level badges on the corner that must still be
    /// suppressed, so only a couple of badge-free categories opt out.
    pub fn for_category(category: &str) -> MaskType {
        match category {
            "space/traits/active_reputation" | "ground/traits/active_reputation" => {
                MaskType::None
            }
            _ => MaskType::BottomRightQuadrant,
        }
    }
}

/// Fixed-field catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub image_path: String,
    pub image_filename: String,
    pub image_category: String,
    pub overlay_name: OverlayName,
    pub cargo_type: Option<String>,
    pub cargo_item_name: Option<String>,
    /// Open-ended wiki metadata; kept as a map since the upstream schema
    /// is not fixed.
    pub cargo_filters: HashMap<String, String>,
    pub item_name: String,
    pub mask_type: MaskType,
}

/// A catalog key, `"<relative-path>::<overlay-name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogKey(pub String);

impl CatalogKey {
    pub fn new(relative_path: &str, overlay: OverlayName) -> Self {
        CatalogKey(format!("{relative_path}::{}", overlay.as_str()))
    }

    pub fn split(&self) -> Option<(&str, OverlayName)> {
        let (path, overlay) = self.0.split_once("::")?;
        Some((path, OverlayName::parse(overlay)?))
    }
}

/// One (icon file × overlay) hash-index entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: CatalogKey,
    pub phash: Hash64,
    pub dhash: Hash64,
    pub file_mtime: f64,
    pub file_md5: String,
    pub metadata: CatalogMetadata,
}
