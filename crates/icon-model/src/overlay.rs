//! Rarity overlay names and the detections the overlay detector emits.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::slot::SlotRef;

/// The six rarity tiers a game item can be decorated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayName {
    Common,
    Uncommon,
    Rare,
    VeryRare,
    UltraRare,
    Epic,
}

impl OverlayName {
    pub const ALL: [OverlayName; 6] = [
        OverlayName::Common,
        OverlayName::Uncommon,
        OverlayName::Rare,
        OverlayName::VeryRare,
        OverlayName::UltraRare,
        OverlayName::Epic,
    ];

    /// The non-`common` tiers the overlay detector scores against a
    /// slot's barcode stripe.
    pub const SCORED: [OverlayName; 5] = [
        OverlayName::Uncommon,
        OverlayName::Rare,
        OverlayName::VeryRare,
        OverlayName::UltraRare,
        OverlayName::Epic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayName::Common => "common",
            OverlayName::Uncommon => "uncommon",
            OverlayName::Rare => "rare",
            OverlayName::VeryRare => "very rare",
            OverlayName::UltraRare => "ultra rare",
            OverlayName::Epic => "epic",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            OverlayName::Common => "common.png",
            OverlayName::Uncommon => "uncommon.png",
            OverlayName::Rare => "rare.png",
            OverlayName::VeryRare => "very rare.png",
            OverlayName::UltraRare => "ultra rare.png",
            OverlayName::Epic => "epic.png",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "common" => OverlayName::Common,
            "uncommon" => OverlayName::Uncommon,
            "rare" => OverlayName::Rare,
            "very rare" => OverlayName::VeryRare,
            "ultra rare" => OverlayName::UltraRare,
            "epic" => OverlayName::Epic,
            _ => return None,
        })
    }
}

/// One slot's rarity detection, as emitted by `detect_icon_overlays`
///. `offset` is the `(dx, dy)` hint fed forward to the
/// matcher; `scale` is the overlay scale factor that produced the best
/// SSIM score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayDetection {
    pub overlay: OverlayName,
    pub scale: f64,
    pub offset: Option<(i32, i32)>,
    pub ssim: f64,
    pub method: OverlayDetectionMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayDetectionMethod {
    Detected,
    Fallback,
}

impl OverlayDetection {
    pub fn fallback() -> Self {
        Self {
            overlay: OverlayName::Common,
            scale: 0.6,
            offset: None,
            ssim: 0.0,
            method: OverlayDetectionMethod::Fallback,
        }
    }
}

/// `{group -> slot_index -> OverlayDetection}`, the overlay detector's
/// output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayDetectionResult {
    pub by_slot: HashMap<String, HashMap<u32, OverlayDetection>>,
}

impl OverlayDetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: &SlotRef, detection: OverlayDetection) {
        self.by_slot
            .entry(slot.group_label.clone())
            .or_default()
            .insert(slot.slot_index, detection);
    }

    pub fn get(&self, slot: &SlotRef) -> Option<&OverlayDetection> {
        self.by_slot.get(&slot.group_label).and_then(|m| m.get(&slot.slot_index))
    }
}
