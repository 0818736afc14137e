//! Icon slots: the unit of work for prefiltering, overlay detection, and
//! matching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use image::RgbImage;

use crate::geom::BBox;
use crate::hash::Hash64;

/// A single rectangular region expected to contain exactly one icon.
/// `slot_index` is assigned in top-to-bottom, left-to-right reading order
/// within the group: dense and zero-based.
#[derive(Debug, Clone)]
pub struct Slot {
    pub group_label: String,
    pub slot_index: u32,
    pub bbox: BBox,
    pub roi: RgbImage,
    pub phash: Hash64,
    pub dhash: Hash64,
}

impl Slot {
    pub fn new(
        group_label: impl Into<String>,
        slot_index: u32,
        bbox: BBox,
        roi: RgbImage,
        phash: Hash64,
        dhash: Hash64,
    ) -> Self {
        Self {
            group_label: group_label.into(),
            slot_index,
            bbox,
            roi,
            phash,
            dhash,
        }
    }
}

/// Per-group list of slots, as produced by `locate_icon_slots`.
#[derive(Debug, Clone, Default)]
pub struct SlotMap {
    pub groups: HashMap<String, Vec<Slot>>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_group(&mut self, group_label: impl Into<String>, mut slots: Vec<Slot>) {
        slots.sort_by_key(|s| s.bbox.reading_order_key());
        for (idx, slot) in slots.iter_mut().enumerate() {
            slot.slot_index = idx as u32;
        }
        self.groups.insert(group_label.into(), slots);
    }

    pub fn slot(&self, group_label: &str, index: u32) -> Option<&Slot> {
        self.groups
            .get(group_label)
            .and_then(|slots| slots.get(index as usize))
    }

    /// Checks that slot indices per group form a dense `{0, 1, ..., N-1}`
    /// range.
    pub fn indices_are_dense(&self) -> bool {
        self.groups.values().all(|slots| {
            slots
                .iter()
                .enumerate()
                .all(|(i, s)| s.slot_index == i as u32)
        })
    }
}

/// A serializable, coordinate-only identifier for a slot; used wherever we
/// need to key results by (group, slot) without carrying pixel data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub group_label: String,
    pub slot_index: u32,
}

impl SlotRef {
    pub fn new(group_label: impl Into<String>, slot_index: u32) -> Self {
        Self {
            group_label: group_label.into(),
            slot_index,
        }
    }
}

impl From<&Slot> for SlotRef {
    fn from(slot: &Slot) -> Self {
        SlotRef::new(slot.group_label.clone(), slot.slot_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Hash64;

    fn dummy_roi() -> RgbImage {
        RgbImage::new(4, 4)
    }

    #[test]
    fn insert_group_assigns_dense_reading_order_indices() {
        let mut map = SlotMap::new();
        let slots = vec![
            Slot::new(
                "Fore Weapon",
                99,
                BBox::new(0, 10, 4, 4),
                dummy_roi(),
                Hash64::new(0),
                Hash64::new(0),
            ),
            Slot::new(
                "Fore Weapon",
                99,
                BBox::new(0, 0, 4, 4),
                dummy_roi(),
                Hash64::new(0),
                Hash64::new(0),
            ),
        ];
        map.insert_group("Fore Weapon", slots);
        assert!(map.indices_are_dense());
        assert_eq!(map.slot("Fore Weapon", 0).unwrap().bbox.y, 0);
        assert_eq!(map.slot("Fore Weapon", 1).unwrap().bbox.y, 10);
    }
}
