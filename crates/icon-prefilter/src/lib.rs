//! The prefilter stage: reduces the catalog to a per-slot shortlist using
//! hash distance only.

pub mod cutoff;
pub mod error;
pub mod options;
pub mod stage;

pub use cutoff::adaptive_cutoff;
pub use error::PrefilterError;
pub use options::PrefilterOptions;
pub use stage::run;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use icon_collab::IconSetMap;
    use icon_hashindex::{HashIndex, HashOptions, IconFileMetadata, IconMetadataSource};
    use icon_model::{BBox, Classification, ClassificationSet, IconSetKey, Platform, Slot, SlotMap};
    use image::{Rgb, RgbImage};

    use super::*;

    struct FixedMetadata(String);
    impl IconMetadataSource for FixedMetadata {
        fn metadata_for(&self, _relative_path: &str) -> Option<IconFileMetadata> {
            Some(IconFileMetadata { image_category: self.0.clone(), item_name: "Phaser Array".to_string(), ..Default::default() })
        }
    }

    fn solid_icon(value: u8) -> RgbImage {
        RgbImage::from_pixel(32, 32, Rgb([value, value, value]))
    }

    fn sample_classification() -> ClassificationSet {
        ClassificationSet::new(Classification {
            build_type: icon_model::BuildType::PcShipBuild,
            score: 1.0,
            is_required: true,
            icon_set_key: IconSetKey::Ship,
            platform: Platform::Pc,
        })
    }

    #[test]
    fn prefilters_a_slot_against_a_matching_catalog_entry() {
        let dir = tempfile::tempdir().unwrap();
        let icon_path = dir.path().join("phaser.png");
        solid_icon(120).save(&icon_path).unwrap();

        let overlays = HashMap::new();
        let hash_index = HashIndex::build(dir.path(), &overlays, &FixedMetadata("space/weapons/fore".to_string()), HashOptions::default()).unwrap();

        let roi = solid_icon(120);
        let (phash, dhash) = icon_hashindex::hash_roi(&roi, HashOptions::default());

        let mut slots = SlotMap::new();
        slots.insert_group("Fore Weapon", vec![Slot::new("Fore Weapon", 0, BBox::new(0, 0, 32, 32), roi, phash, dhash)]);

        let mut icon_sets = IconSetMap::new();
        icon_sets.insert_set(IconSetKey::Ship, [("Fore Weapon".to_string(), vec!["space/weapons/fore".to_string()])].into_iter().collect());

        let result = run(&slots, &sample_classification(), &icon_sets, &hash_index, &PrefilterOptions::default()).unwrap();
        let slot_ref = icon_model::SlotRef::new("Fore Weapon", 0);
        let candidates = result.get(&slot_ref).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].distance, 0);
    }

    #[test]
    fn slot_with_no_matching_folder_yields_empty_shortlist() {
        let dir = tempfile::tempdir().unwrap();
        let overlays = HashMap::new();
        let hash_index = HashIndex::build(dir.path(), &overlays, &FixedMetadata("space/weapons/fore".to_string()), HashOptions::default()).unwrap();

        let roi = solid_icon(50);
        let (phash, dhash) = icon_hashindex::hash_roi(&roi, HashOptions::default());
        let mut slots = SlotMap::new();
        slots.insert_group("Shield", vec![Slot::new("Shield", 0, BBox::new(0, 0, 32, 32), roi, phash, dhash)]);

        let icon_sets = IconSetMap::new();
        let result = run(&slots, &sample_classification(), &icon_sets, &hash_index, &PrefilterOptions::default()).unwrap();
        let slot_ref = icon_model::SlotRef::new("Shield", 0);
        assert!(result.is_empty_for(&slot_ref));
    }
}
