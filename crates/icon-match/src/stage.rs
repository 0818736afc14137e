//! The icon matcher stage itself: two-pass multi-scale SSIM matching of
//! each slot's prefiltered shortlist, using the overlay detector's
//! scale/offset hint on the first pass and a full sweep as fallback.

use std::collections::{HashMap, HashSet};

use icon_collab::IconSetMap;
use icon_imaging::{alpha_blend, apply_mask, blur3x3, normalize_to_reference};
use icon_model::{
    IconSetKey, MatchCandidate, MatchMethod, MatchResult, MatchSet, OverlayDetection, OverlayDetectionMethod, OverlayDetectionResult, OverlayName,
    PrefilterResult, Slot, SlotMap, SlotRef,
};
use image::{RgbImage, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::IconMatchError;
use crate::multiscale::{multi_scale_match, ScaleMatch};
use crate::options::{MatcherOptions, REFERENCE_HEIGHT, REFERENCE_WIDTH};
use crate::source::IconImageSource;

fn pick_metadata(candidate: &MatchCandidate, overlay: Option<OverlayName>) -> &icon_model::CatalogMetadata {
    overlay
        .and_then(|o| candidate.metadata_list.iter().find(|m| m.overlay_name == o))
        .unwrap_or(&candidate.metadata_list[0])
}

/// Matches one slot against one shortlisted candidate, returning `None`
/// when nothing clears the acceptance rule for its branch. `use_hint` selects pass 1 (narrow schedule,
/// overlay-detector hint honored) vs pass 2 (full sweep, hint disabled).
fn match_one(
    slot: &Slot,
    candidate: &MatchCandidate,
    overlay: &OverlayDetection,
    is_trait_group: bool,
    overlay_images: &HashMap<OverlayName, RgbaImage>,
    icon_source: &dyn IconImageSource,
    options: &MatcherOptions,
    use_hint: bool,
) -> Result<Option<MatchResult>, IconMatchError> {
    if candidate.metadata_list.is_empty() {
        return Err(IconMatchError::IconLoadFailed {
            file_path: candidate.file_path.clone(),
            reason: "catalog candidate carries no metadata".to_string(),
        });
    }
    let icon_rgb = icon_source.load(&candidate.file_path)?;
    let (normalized_roi, _scale) = normalize_to_reference(&slot.roi, REFERENCE_WIDTH, REFERENCE_HEIGHT);

    let is_common = overlay.method == OverlayDetectionMethod::Fallback;

    let (scale_match, method_parts, overlay_used, overlay_scale): (Option<ScaleMatch>, Vec<&'static str>, Option<OverlayName>, Option<f64>) =
        if is_common {
            if is_trait_group {
                let mask = pick_metadata(candidate, None).mask_type;
                let blurred_roi = blur3x3(&apply_mask(&normalized_roi, mask));
                let blurred_template = blur3x3(&apply_mask(&icon_rgb, mask));
                let m = multi_scale_match(&blurred_roi, &blurred_template, &options.scales(), None);
                (m, vec!["ssim", "trait", "raw"], None, None)
            } else {
                let mut best: Option<(ScaleMatch, OverlayName)> = None;
                for name in OverlayName::ALL {
                    let Some(overlay_rgba) = overlay_images.get(&name) else {
                        continue;
                    };
                    let mask = pick_metadata(candidate, Some(name)).mask_type;
                    let blended = alpha_blend(&icon_rgb, overlay_rgba);
                    let blurred_roi = blur3x3(&apply_mask(&normalized_roi, mask));
                    let blurred_template = blur3x3(&apply_mask(&blended, mask));
                    if let Some(m) = multi_scale_match(&blurred_roi, &blurred_template, &options.scales(), None) {
                        if best.as_ref().map(|(b, _)| m.score > b.score).unwrap_or(true) {
                            best = Some((m, name));
                        }
                    }
                }
                match best {
                    Some((m, name)) => (Some(m), vec!["ssim", "common", "all-overlays"], Some(name), None),
                    None => (None, vec!["ssim", "common", "all-overlays"], None, None),
                }
            }
        } else {
            let mask = pick_metadata(candidate, Some(overlay.overlay)).mask_type;
            let blended: RgbImage = match overlay_images.get(&overlay.overlay) {
                Some(rgba) => alpha_blend(&icon_rgb, rgba),
                None => icon_rgb.clone(),
            };
            let blurred_roi = blur3x3(&apply_mask(&normalized_roi, mask));
            let blurred_template = blur3x3(&apply_mask(&blended, mask));
            let scales = if use_hint { vec![overlay.scale] } else { options.scales() };
            let hint = if use_hint { overlay.offset } else { None };
            let m = multi_scale_match(&blurred_roi, &blurred_template, &scales, hint);
            let tag: Vec<&'static str> = if use_hint {
                vec!["ssim", "detected-overlay-scale"]
            } else {
                vec!["ssim", "detected-overlay-all-scales-fallback"]
            };
            (m, tag, Some(overlay.overlay), Some(overlay.scale))
        };

    let Some(scale_match) = scale_match else {
        return Ok(None);
    };

    let accept = if is_common {
        !options.common_branch_requires_threshold || scale_match.score >= options.ssim_threshold
    } else {
        scale_match.score >= options.ssim_threshold
    };
    if !accept {
        return Ok(None);
    }

    let mut parts = method_parts;
    parts.push(if scale_match.stepping { "stepping" } else { "no-stepping" });

    let name_metadata = pick_metadata(candidate, overlay_used);
    Ok(Some(MatchResult {
        group: slot.group_label.clone(),
        slot: slot.slot_index,
        name: name_metadata.item_name.clone(),
        score: scale_match.score,
        scale: scale_match.scale,
        overlay_scale,
        overlay: overlay_used.map(|o| o.as_str().to_string()),
        method: MatchMethod::new(&parts),
        detected_overlay: None,
    }))
}

/// Runs the matcher over every slot's prefiltered shortlist, in two passes.
pub fn run(
    slots: &SlotMap,
    prefiltered: &PrefilterResult,
    overlay_detections: &OverlayDetectionResult,
    icon_sets: &IconSetMap,
    overlay_images: &HashMap<OverlayName, RgbaImage>,
    icon_source: &dyn IconImageSource,
    options: &MatcherOptions,
) -> MatchSet {
    let trait_labels: HashSet<&str> = icon_sets.labels_for(IconSetKey::Traits).collect();

    let work: Vec<(&Slot, &[MatchCandidate], OverlayDetection, bool)> = slots
        .groups
        .iter()
        .flat_map(|(group_label, group_slots)| {
            let is_trait = trait_labels.contains(group_label.as_str());
            group_slots.iter().map(move |slot| {
                let slot_ref = SlotRef::new(group_label.clone(), slot.slot_index);
                let candidates = prefiltered.get(&slot_ref).unwrap_or(&[]);
                let overlay = overlay_detections.get(&slot_ref).copied().unwrap_or_else(OverlayDetection::fallback);
                (slot, candidates, overlay, is_trait)
            })
        })
        .collect();

    debug!(slots = work.len(), "matching slots with chunksize {}", options.chunksize);

    let run_pass = |items: &[(&Slot, &[MatchCandidate], OverlayDetection, bool)], use_hint: bool| -> Vec<Vec<MatchResult>> {
        items
            .par_iter()
            .with_min_len(options.chunksize.max(1))
            .map(|(slot, candidates, overlay, is_trait)| {
                candidates
                    .iter()
                    .filter_map(|c| match match_one(slot, c, overlay, *is_trait, overlay_images, icon_source, options, use_hint) {
                        Ok(r) => r,
                        Err(err) => {
                            warn!(file = %c.file_path, error = %err, "failed to load catalog icon");
                            None
                        }
                    })
                    .collect()
            })
            .collect()
    };

    let pass1 = run_pass(&work, true);

    let mut matches = MatchSet::new();
    let mut needs_pass2: Vec<(&Slot, &[MatchCandidate], OverlayDetection, bool)> = Vec::new();
    for (item, results) in work.iter().zip(pass1.into_iter()) {
        if results.is_empty() && !item.1.is_empty() {
            needs_pass2.push(*item);
        }
        for r in results {
            matches.push(r);
        }
    }

    if !needs_pass2.is_empty() {
        debug!(slots = needs_pass2.len(), "pass 2: widening scale/offset sweep for unmatched slots");
        for results in run_pass(&needs_pass2, false) {
            for r in results {
                matches.push(r);
            }
        }
    }

    matches.sort_for_output();
    matches
}
