//! The prefilter stage itself: narrows each slot's catalog candidates to
//! a short list via dual-hash radius queries and the adaptive cutoff.

use std::collections::HashMap;

use icon_collab::IconSetMap;
use icon_hashindex::{FieldFilter, Filters, HashIndex};
use icon_model::{CatalogMetadata, Classification, ClassificationSet, HashKind, MatchCandidate, OverlayName, PrefilterResult, Slot, SlotMap, SlotRef};
use rayon::prelude::*;
use tracing::debug;

use crate::cutoff::adaptive_cutoff;
use crate::error::PrefilterError;
use crate::options::PrefilterOptions;

/// The catalog folders searched for `label`: the first classification
/// (main, then additional, in declared order) whose icon-set entry for
/// this label is non-empty. Builds never reset each other's folder lists
/// as the per-build dict in the original did; instead the first
/// classification that actually knows about this label wins.
fn folders_for_group<'a>(classifications: &ClassificationSet, icon_sets: &'a IconSetMap, label: &str) -> &'a [String] {
    classifications
        .all()
        .map(|c: &Classification| icon_sets.folders_for(c.icon_set_key, label))
        .find(|folders| !folders.is_empty())
        .unwrap_or(&[])
}

struct Bucket {
    distance: u32,
    hash_kind: HashKind,
    overlay: Option<OverlayName>,
    metadata_list: Vec<CatalogMetadata>,
}

fn prefilter_slot(slot: &Slot, folders: &[String], hash_index: &HashIndex, options: &PrefilterOptions) -> Vec<MatchCandidate> {
    let mut filters = Filters::new();
    filters.insert("image_category".to_string(), FieldFilter::AnyOf(folders.to_vec()));

    let mut by_file: HashMap<String, Bucket> = HashMap::new();
    for (hash_kind, radius, target) in [
        (HashKind::PHash, options.phash_radius, slot.phash),
        (HashKind::DHash, options.dhash_radius, slot.dhash),
    ] {
        let hits = hash_index.find_similar(hash_kind, target, radius, None, Some(&filters));
        for hit in hits {
            match by_file.get_mut(&hit.file_path) {
                Some(bucket) if hit.distance < bucket.distance => {
                    bucket.distance = hit.distance;
                    bucket.hash_kind = hash_kind;
                    bucket.overlay = hit.best_overlay;
                    bucket.metadata_list = hit.metadata_list;
                }
                Some(_) => {}
                None => {
                    by_file.insert(
                        hit.file_path.clone(),
                        Bucket { distance: hit.distance, hash_kind, overlay: hit.best_overlay, metadata_list: hit.metadata_list },
                    );
                }
            }
        }
    }

    if by_file.is_empty() {
        return Vec::new();
    }

    let distances: Vec<u32> = by_file.values().map(|b| b.distance).collect();
    let cutoff = adaptive_cutoff(&distances, options.max_allowed_gap, options.max_next_ranks);

    by_file
        .into_iter()
        .filter(|(_, bucket)| bucket.distance <= cutoff)
        .map(|(file_path, bucket)| MatchCandidate {
            file_path,
            overlay_name: bucket.overlay.map(|o| o.as_str().to_string()),
            hash_kind: bucket.hash_kind,
            distance: bucket.distance,
            match_threshold: cutoff,
            target_phash: slot.phash,
            target_dhash: slot.dhash,
            metadata_list: bucket.metadata_list,
        })
        .collect()
}

/// Prefilters every slot in `slots` down to a shortlist, using the
/// catalog folders the active classification(s) permit for each slot's
/// group label.
pub fn run(
    slots: &SlotMap,
    classifications: &ClassificationSet,
    icon_sets: &IconSetMap,
    hash_index: &HashIndex,
    options: &PrefilterOptions,
) -> Result<PrefilterResult, PrefilterError> {
    let work: Vec<(SlotRef, &Slot, &[String])> = slots
        .groups
        .iter()
        .flat_map(|(group_label, group_slots)| {
            let folders = folders_for_group(classifications, icon_sets, group_label);
            group_slots.iter().map(move |slot| (SlotRef::from(slot), slot, folders))
        })
        .collect();

    debug!(slots = work.len(), "prefiltering slots with chunksize {}", options.chunksize);

    let results: Vec<(SlotRef, Vec<MatchCandidate>)> = work
        .par_iter()
        .with_min_len(options.chunksize.max(1))
        .map(|(slot_ref, slot, folders)| {
            if folders.is_empty() {
                debug!(group = %slot_ref.group_label, "no icon directories found for icon group");
            }
            (slot_ref.clone(), prefilter_slot(slot, folders, hash_index, options))
        })
        .collect();

    let mut output = PrefilterResult::new();
    for (slot_ref, candidates) in results {
        output.insert(&slot_ref, candidates);
    }
    Ok(output)
}
