//! Multi-scale SSIM icon matching: per-slot, per-candidate dispatch over
//! the prefiltered shortlist and the overlay detector's hints.

pub mod error;
pub mod multiscale;
pub mod options;
pub mod source;
pub mod stage;

pub use error::IconMatchError;
pub use multiscale::{multi_scale_match, ScaleMatch};
pub use options::MatcherOptions;
pub use source::{FilesystemIconImageSource, IconImageSource, InMemoryIconImageSource};
pub use stage::run;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use icon_collab::iconset::builtin_sto_icon_sets;
    use icon_model::{BBox, CatalogMetadata, Hash64, HashKind, MaskType, MatchCandidate, OverlayDetection, OverlayDetectionResult, OverlayName, Slot, SlotMap, SlotRef};
    use image::{Rgb, RgbImage};

    use super::*;

    fn metadata(item_name: &str, overlay: OverlayName) -> CatalogMetadata {
        CatalogMetadata {
            image_path: "space/weapons/fore/phaser.png".to_string(),
            image_filename: "phaser.png".to_string(),
            image_category: "space/weapons/fore".to_string(),
            overlay_name: overlay,
            cargo_type: None,
            cargo_item_name: None,
            cargo_filters: HashMap::new(),
            item_name: item_name.to_string(),
            mask_type: MaskType::BottomRightQuadrant,
        }
    }

    #[test]
    fn detected_overlay_branch_matches_a_blended_identical_icon() {
        let icon = RgbImage::from_fn(40, 40, |x, y| Rgb([(x * 3) as u8, (y * 5) as u8, 60]));
        let mut source = InMemoryIconImageSource::new();
        source.insert("phaser.png", icon.clone());

        let mut slots = SlotMap::new();
        let roi = icon.clone();
        slots.insert_group("Fore Weapon", vec![Slot::new("Fore Weapon", 0, BBox::new(0, 0, 40, 40), roi, Hash64::new(0), Hash64::new(0))]);

        let mut prefiltered = icon_model::PrefilterResult::new();
        prefiltered.insert(
            &SlotRef::new("Fore Weapon", 0),
            vec![MatchCandidate {
                file_path: "phaser.png".to_string(),
                overlay_name: Some("rare".to_string()),
                hash_kind: HashKind::PHash,
                distance: 2,
                match_threshold: 4,
                target_phash: Hash64::new(0),
                target_dhash: Hash64::new(0),
                metadata_list: vec![metadata("Phaser Beam Array", OverlayName::Rare)],
            }],
        );

        let mut overlay_detections = OverlayDetectionResult::new();
        overlay_detections.insert(
            &SlotRef::new("Fore Weapon", 0),
            OverlayDetection {
                overlay: OverlayName::Rare,
                scale: 1.0,
                offset: Some((0, 0)),
                ssim: 0.9,
                method: icon_model::OverlayDetectionMethod::Detected,
            },
        );

        let overlay_images = HashMap::new();
        let icon_sets = builtin_sto_icon_sets();
        let options = MatcherOptions::default();

        let matches = run(&slots, &prefiltered, &overlay_detections, &icon_sets, &overlay_images, &source, &options);
        let results = matches.get("Fore Weapon", 0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Phaser Beam Array");
        assert!(results[0].method.is_ssim_family());
        assert!(results[0].score > 0.9);
    }

    #[test]
    fn empty_shortlist_produces_no_matches() {
        let mut slots = SlotMap::new();
        slots.insert_group(
            "Fore Weapon",
            vec![Slot::new("Fore Weapon", 0, BBox::new(0, 0, 40, 40), RgbImage::new(40, 40), Hash64::new(0), Hash64::new(0))],
        );
        let prefiltered = icon_model::PrefilterResult::new();
        let overlay_detections = OverlayDetectionResult::new();
        let overlay_images = HashMap::new();
        let icon_sets = builtin_sto_icon_sets();
        let source = InMemoryIconImageSource::new();
        let options = MatcherOptions::default();

        let matches = run(&slots, &prefiltered, &overlay_detections, &icon_sets, &overlay_images, &source, &options);
        assert!(matches.is_empty_for("Fore Weapon", 0));
    }
}
