//! Match results and the final output object.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classification::BuildType;
use crate::overlay::OverlayDetection;

/// Which code path produced a match; diagnostic only, but downstream
/// sorting depends on the method *family* (hash vs ssim).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMethod(pub String);

impl MatchMethod {
    pub fn new(parts: &[&str]) -> Self {
        MatchMethod(parts.join("-"))
    }

    pub fn is_hash_family(&self) -> bool {
        self.0.starts_with("hash-")
    }

    pub fn is_ssim_family(&self) -> bool {
        self.0.starts_with("ssim-")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One confirmed (or backfilled) identity for a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub group: String,
    pub slot: u32,
    pub name: String,
    pub score: f64,
    pub scale: f64,
    pub overlay_scale: Option<f64>,
    pub overlay: Option<String>,
    pub method: MatchMethod,
    /// Present only on entries produced by the
    /// `BACKFILL_MATCHES_WITH_PREFILTERED` transformation.
    pub detected_overlay: Option<OverlayDetection>,
}

/// `{group -> slot_index -> [match]}`, the matcher stage's output before
/// output transformation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSet {
    pub by_slot: HashMap<String, HashMap<u32, Vec<MatchResult>>>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: MatchResult) {
        self.by_slot
            .entry(result.group.clone())
            .or_default()
            .entry(result.slot)
            .or_default()
            .push(result);
    }

    pub fn get(&self, group: &str, slot: u32) -> &[MatchResult] {
        self.by_slot
            .get(group)
            .and_then(|m| m.get(&slot))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty_for(&self, group: &str, slot: u32) -> bool {
        self.get(group, slot).is_empty()
    }

    /// Sorts each slot's matches by method family + score at
    /// serialization time, per: hash ascending distance, ssim
    /// descending score.
    pub fn sort_for_output(&mut self) {
        for slots in self.by_slot.values_mut() {
            for matches in slots.values_mut() {
                matches.sort_by(|a, b| {
                    let a_hash = a.method.is_hash_family();
                    let b_hash = b.method.is_hash_family();
                    match (a_hash, b_hash) {
                        (true, true) => a
                            .score
                            .partial_cmp(&b.score)
                            .unwrap_or(std::cmp::Ordering::Equal),
                        (false, false) => b
                            .score
                            .partial_cmp(&a.score)
                            .unwrap_or(std::cmp::Ordering::Equal),
                        (true, false) => std::cmp::Ordering::Less,
                        (false, true) => std::cmp::Ordering::Greater,
                    }
                });
            }
        }
    }
}

/// The final output object returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub matches: MatchSet,
    pub prefiltered_icons: crate::candidate::PrefilterResult,
    pub detected_overlays: HashMap<String, HashMap<u32, OverlayDetection>>,
    pub build_type: Option<BuildType>,
    pub transformations_applied: Vec<String>,
}
