//! Stage identity and the dependency table the orchestrator walks to
//! decide, at run time, which stages are even eligible to run after an
//! earlier one has failed.
//!
//! The [`crate::state`] chain is the compile-time half of this story: it
//! guarantees a stage function is never *called* without the data it
//! needs. This table is the runtime half: it lets the orchestrator mark
//! every stage downstream of a failure as skipped, with a reason, instead
//! of silently stopping the run.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    LocateLabels,
    ClassifyLayout,
    LocateIconGroups,
    LocateIconSlots,
    PrefilterIcons,
    DetectIconOverlays,
    LoadIcons,
    DetectIcons,
    OutputTransformation,
}

pub struct StageDescriptor {
    pub kind: StageKind,
    pub name: &'static str,
    pub prerequisites: &'static [StageKind],
}

/// `load_icons` is an internal bookkeeping stage: it loads the prefiltered shortlist's catalog files into memory
/// before matching runs. It does not appear in the [`crate::state`] chain
/// because nothing downstream needs its output threaded through the
/// types — `detect_icons` consumes the loaded source directly as a local
/// value — but it still gets its own metrics entry and prerequisite
/// checks like every other stage.
pub const STAGES: [StageDescriptor; 9] = [
    StageDescriptor { kind: StageKind::LocateLabels, name: "locate_labels", prerequisites: &[] },
    StageDescriptor { kind: StageKind::ClassifyLayout, name: "classify_layout", prerequisites: &[StageKind::LocateLabels] },
    StageDescriptor { kind: StageKind::LocateIconGroups, name: "locate_icon_groups", prerequisites: &[StageKind::ClassifyLayout] },
    StageDescriptor { kind: StageKind::LocateIconSlots, name: "locate_icon_slots", prerequisites: &[StageKind::LocateIconGroups] },
    StageDescriptor { kind: StageKind::PrefilterIcons, name: "prefilter_icons", prerequisites: &[StageKind::LocateIconSlots] },
    StageDescriptor { kind: StageKind::DetectIconOverlays, name: "detect_icon_overlays", prerequisites: &[StageKind::LocateIconSlots] },
    StageDescriptor { kind: StageKind::LoadIcons, name: "load_icons", prerequisites: &[StageKind::PrefilterIcons] },
    StageDescriptor {
        kind: StageKind::DetectIcons,
        name: "detect_icons",
        prerequisites: &[StageKind::PrefilterIcons, StageKind::DetectIconOverlays, StageKind::LoadIcons],
    },
    StageDescriptor { kind: StageKind::OutputTransformation, name: "output_transformation", prerequisites: &[StageKind::DetectIcons] },
];

pub fn descriptor_for(kind: StageKind) -> &'static StageDescriptor {
    STAGES.iter().find(|d| d.kind == kind).expect("every StageKind has a descriptor in STAGES")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_prerequisite_names_a_real_stage() {
        for descriptor in &STAGES {
            for prereq in descriptor.prerequisites {
                // Panics (via descriptor_for's expect) if a prerequisite
                // were ever a typo'd StageKind not present in STAGES.
                descriptor_for(*prereq);
            }
        }
    }

    #[test]
    fn output_transformation_is_the_only_terminal_stage() {
        let terminal = STAGES.iter().filter(|d| !STAGES.iter().any(|other| other.prerequisites.contains(&d.kind))).collect::<Vec<_>>();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].kind, StageKind::OutputTransformation);
    }
}
