//! The `output_transformation` stage: assembles the final
//! [`PipelineOutput`] and, when enabled, backfills slots the matcher
//! left empty with their prefilter shortlist.

use icon_model::{
    BuildType, MatchMethod, MatchResult, MatchSet, OverlayDetectionResult, PipelineOutput, PrefilterResult,
};

pub const BACKFILL_TRANSFORMATION: &str = "BACKFILL_MATCHES_WITH_PREFILTERED";

/// Whether the optional backfill transformation runs. Resolved Open
/// Question: defaults to enabled, since a slot with a
/// clean hash shortlist but no SSIM-confirmed match is still useful
/// information to surface rather than silently dropping it.
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub backfill_with_prefiltered: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self { backfill_with_prefiltered: true }
    }
}

/// Builds a backfilled [`MatchResult`] from a prefilter candidate,
/// attaching the slot's detected overlay (if any).
fn backfill_entry(group: &str, slot: u32, candidate: &icon_model::MatchCandidate, detected_overlay: Option<icon_model::OverlayDetection>) -> Option<MatchResult> {
    let metadata = candidate.metadata_list.first()?;
    Some(MatchResult {
        group: group.to_string(),
        slot,
        name: metadata.item_name.clone(),
        score: candidate.distance as f64,
        scale: 0.0,
        overlay_scale: None,
        overlay: candidate.overlay_name.clone(),
        method: MatchMethod::new(&[candidate.method_tag(), "backfill"]),
        detected_overlay,
    })
}

/// Runs `output_transformation`: assembles the final output object and, if
/// `options.backfill_with_prefiltered` is set, fills in any slot the
/// matcher produced no results for from its prefilter shortlist.
pub fn run(
    mut matches: MatchSet,
    prefiltered: &PrefilterResult,
    overlays: &OverlayDetectionResult,
    build_type: Option<BuildType>,
    options: &OutputOptions,
) -> PipelineOutput {
    let mut transformations_applied = Vec::new();

    if options.backfill_with_prefiltered {
        let mut backfilled_any = false;
        for (group, slots) in &prefiltered.by_slot {
            for (&slot_index, candidates) in slots {
                if !matches.is_empty_for(group, slot_index) || candidates.is_empty() {
                    continue;
                }
                let detected_overlay = overlays.get(&icon_model::SlotRef::new(group.clone(), slot_index)).copied();
                for candidate in candidates {
                    if let Some(entry) = backfill_entry(group, slot_index, candidate, detected_overlay) {
                        matches.push(entry);
                        backfilled_any = true;
                    }
                }
            }
        }
        if backfilled_any {
            transformations_applied.push(BACKFILL_TRANSFORMATION.to_string());
        }
    }

    matches.sort_for_output();

    PipelineOutput {
        matches,
        prefiltered_icons: prefiltered.clone(),
        detected_overlays: overlays.by_slot.clone(),
        build_type,
        transformations_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icon_model::{CatalogMetadata, HashKind, MaskType, MatchCandidate, OverlayName};
    use std::collections::HashMap;

    fn candidate(item_name: &str) -> MatchCandidate {
        MatchCandidate {
            file_path: "space/shield/x.png".to_string(),
            overlay_name: Some("rare".to_string()),
            hash_kind: HashKind::PHash,
            distance: 5,
            match_threshold: 6,
            target_phash: icon_model::Hash64::new(0),
            target_dhash: icon_model::Hash64::new(0),
            metadata_list: vec![CatalogMetadata {
                image_path: "space/shield/x.png".to_string(),
                image_filename: "x.png".to_string(),
                image_category: "space/shield".to_string(),
                overlay_name: OverlayName::Rare,
                cargo_type: None,
                cargo_item_name: None,
                cargo_filters: HashMap::new(),
                item_name: item_name.to_string(),
                mask_type: MaskType::BottomRightQuadrant,
            }],
        }
    }

    #[test]
    fn empty_shortlist_stays_empty_when_backfill_enabled() {
        let matches = MatchSet::new();
        let prefiltered = PrefilterResult::new();
        let overlays = OverlayDetectionResult::new();
        let output = run(matches, &prefiltered, &overlays, None, &OutputOptions::default());
        assert!(output.matches.is_empty_for("Shield", 0));
        assert!(output.transformations_applied.is_empty());
    }

    #[test]
    fn backfills_an_empty_slot_from_its_prefilter_shortlist() {
        let matches = MatchSet::new();
        let mut prefiltered = PrefilterResult::new();
        prefiltered.insert(&icon_model::SlotRef::new("Shield", 0), vec![candidate("Resilient Shield Array")]);
        let overlays = OverlayDetectionResult::new();
        let output = run(matches, &prefiltered, &overlays, None, &OutputOptions::default());
        let backfilled = output.matches.get("Shield", 0);
        assert_eq!(backfilled.len(), 1);
        assert_eq!(backfilled[0].name, "Resilient Shield Array");
        assert_eq!(output.transformations_applied, vec![BACKFILL_TRANSFORMATION.to_string()]);
    }

    #[test]
    fn disabled_backfill_leaves_empty_slots_empty() {
        let matches = MatchSet::new();
        let mut prefiltered = PrefilterResult::new();
        prefiltered.insert(&icon_model::SlotRef::new("Shield", 0), vec![candidate("Resilient Shield Array")]);
        let overlays = OverlayDetectionResult::new();
        let options = OutputOptions { backfill_with_prefiltered: false };
        let output = run(matches, &prefiltered, &overlays, None, &options);
        assert!(output.matches.is_empty_for("Shield", 0));
        assert!(output.transformations_applied.is_empty());
    }

    #[test]
    fn slot_with_real_matches_is_never_backfilled() {
        let mut matches = MatchSet::new();
        matches.push(MatchResult {
            group: "Shield".to_string(),
            slot: 0,
            name: "Already Matched".to_string(),
            score: 0.9,
            scale: 0.65,
            overlay_scale: Some(0.65),
            overlay: Some("rare".to_string()),
            method: MatchMethod::new(&["ssim", "detected-overlay-scale", "no-stepping"]),
            detected_overlay: None,
        });
        let mut prefiltered = PrefilterResult::new();
        prefiltered.insert(&icon_model::SlotRef::new("Shield", 0), vec![candidate("Other Candidate")]);
        let overlays = OverlayDetectionResult::new();
        let output = run(matches, &prefiltered, &overlays, None, &OutputOptions::default());
        let results = output.matches.get("Shield", 0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Already Matched");
    }
}
