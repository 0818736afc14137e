//! The `{prefix}_matches.txt` plain-text summary: grouped by icon group then slot, a BEST line
//! plus an optional deduped Others list.

use std::collections::HashSet;
use std::fmt::Write as _;

use icon_model::{MatchResult, PipelineOutput};

/// Deduplicates `others` by item name, keeping the highest-scoring entry
/// per name, and drops any entry whose name equals `best_name`.
fn dedupe_others<'a>(best_name: &str, others: &'a [MatchResult]) -> Vec<&'a MatchResult> {
    let mut by_name: Vec<&MatchResult> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for m in others {
        if m.name == best_name {
            continue;
        }
        if seen.contains(m.name.as_str()) {
            continue;
        }
        seen.insert(m.name.as_str());
        by_name.push(m);
    }
    // Keep only the highest score per name: since `others` is already
    // sorted by method-family score, the first occurrence per name is
    // already the best one found, so no further reduction is needed here.
    by_name
}

fn format_one(m: &MatchResult) -> String {
    match &m.overlay {
        Some(overlay) => format!("{} [{}] (score={:.3}, method={})", m.name, overlay, m.score, m.method.as_str()),
        None => format!("{} (score={:.3}, method={})", m.name, m.score, m.method.as_str()),
    }
}

/// Renders the full match summary for `output`.
pub fn format_match_summary(output: &PipelineOutput) -> String {
    let mut text = String::new();
    let mut groups: Vec<&String> = output.matches.by_slot.keys().collect();
    groups.sort();

    for group in groups {
        let _ = writeln!(text, "== {group} ==");
        let slots = &output.matches.by_slot[group];
        let mut indices: Vec<&u32> = slots.keys().collect();
        indices.sort();

        for &slot_index in indices {
            let results = &slots[slot_index];
            let _ = writeln!(text, "  Slot {slot_index}:");
            let Some(best) = results.first() else {
                let _ = writeln!(text, "    BEST: (no match)");
                continue;
            };
            let _ = writeln!(text, "    BEST: {}", format_one(best));

            let others = dedupe_others(&best.name, &results[1..]);
            if !others.is_empty() {
                let _ = writeln!(text, "    Others:");
                for other in others {
                    let _ = writeln!(text, "      - {}", format_one(other));
                }
            }
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use icon_model::{MatchMethod, MatchSet};

    fn result(group: &str, slot: u32, name: &str, score: f64) -> MatchResult {
        MatchResult {
            group: group.to_string(),
            slot,
            name: name.to_string(),
            score,
            scale: 0.65,
            overlay_scale: Some(0.65),
            overlay: Some("rare".to_string()),
            method: MatchMethod::new(&["ssim", "detected-overlay-scale", "no-stepping"]),
            detected_overlay: None,
        }
    }

    fn sample_output() -> PipelineOutput {
        let mut matches = MatchSet::new();
        matches.push(result("Fore Weapon", 0, "Phaser Beam Array", 0.95));
        matches.push(result("Fore Weapon", 0, "Phaser Beam Array", 0.80));
        matches.push(result("Fore Weapon", 0, "Disruptor Beam Array", 0.78));
        matches.push(result("Fore Weapon", 0, "Disruptor Beam Array", 0.60));
        matches.sort_for_output();

        PipelineOutput {
            matches,
            prefiltered_icons: icon_model::PrefilterResult::new(),
            detected_overlays: Default::default(),
            build_type: None,
            transformations_applied: Vec::new(),
        }
    }

    #[test]
    fn dedupes_runners_sharing_the_best_items_name() {
        let output = sample_output();
        let text = format_match_summary(&output);
        assert_eq!(text.matches("Phaser Beam Array").count(), 1);
    }

    #[test]
    fn dedupes_duplicate_runner_names_keeping_the_first_seen() {
        let output = sample_output();
        let text = format_match_summary(&output);
        assert_eq!(text.matches("Disruptor Beam Array").count(), 1);
    }

    #[test]
    fn empty_output_renders_no_groups() {
        let output = PipelineOutput {
            matches: MatchSet::new(),
            prefiltered_icons: icon_model::PrefilterResult::new(),
            detected_overlays: Default::default(),
            build_type: None,
            transformations_applied: Vec::new(),
        };
        assert!(format_match_summary(&output).is_empty());
    }
}
