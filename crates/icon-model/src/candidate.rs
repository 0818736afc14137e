//! Prefilter candidates: the narrowed shortlist handed to the overlay
//! detector and matcher.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::CatalogMetadata;
use crate::hash::{Hash64, HashKind};
use crate::slot::SlotRef;

/// One prefiltered catalog file for one slot. `metadata_list` is plural
/// because several catalog entries may share the same source-file MD5
/// under different overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub file_path: String,
    pub overlay_name: Option<String>,
    pub hash_kind: HashKind,
    pub distance: u32,
    pub match_threshold: u32,
    pub target_phash: Hash64,
    pub target_dhash: Hash64,
    pub metadata_list: Vec<CatalogMetadata>,
}

impl MatchCandidate {
    pub fn method_tag(&self) -> &'static str {
        self.hash_kind.method_tag()
    }
}

/// `{group -> slot_index -> [candidate]}`, the prefilter stage's output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefilterResult {
    pub by_slot: HashMap<String, HashMap<u32, Vec<MatchCandidate>>>,
}

impl PrefilterResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: &SlotRef, candidates: Vec<MatchCandidate>) {
        self.by_slot
            .entry(slot.group_label.clone())
            .or_default()
            .insert(slot.slot_index, candidates);
    }

    pub fn get(&self, slot: &SlotRef) -> Option<&[MatchCandidate]> {
        self.by_slot
            .get(&slot.group_label)
            .and_then(|m| m.get(&slot.slot_index))
            .map(|v| v.as_slice())
    }

    pub fn is_empty_for(&self, slot: &SlotRef) -> bool {
        self.get(slot).map(|c| c.is_empty()).unwrap_or(true)
    }
}
