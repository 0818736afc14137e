//! The icon-set → folder map: which catalog folders are searched for a
//! given icon group's label under a given icon-set key.
//!
//! Includes the "Deflector" / "Secondary Deflector" aliasing (console
//! builds have no distinct Secondary Deflector label, so the Deflector
//! icon group searches both folders) and the "Kit" / "Kit Frame" swap
//! between PC and console ground builds.

use std::collections::HashMap;

use icon_model::IconSetKey;
use serde::{Deserialize, Serialize};

/// Maps an icon-set key to, for each icon-group label under it, the list
/// of catalog folders (relative to the icon root) the prefilter searches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IconSetMap {
    sets: HashMap<IconSetKey, HashMap<String, Vec<String>>>,
}

impl IconSetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_set(&mut self, key: IconSetKey, folders_by_label: HashMap<String, Vec<String>>) {
        self.sets.insert(key, folders_by_label);
    }

    /// The catalog folders allowed for `label` under `key`'s icon set, or
    /// an empty slice if the label is unknown to that set.
    pub fn folders_for(&self, key: IconSetKey, label: &str) -> &[String] {
        self.sets
            .get(&key)
            .and_then(|by_label| by_label.get(label))
            .map_or(&[], Vec::as_slice)
    }

    pub fn labels_for(&self, key: IconSetKey) -> impl Iterator<Item = &str> {
        self.sets.get(&key).into_iter().flat_map(|m| m.keys().map(String::as_str))
    }
}

/// Builds the concrete Star Trek Online icon-set map.
pub fn builtin_sto_icon_sets() -> IconSetMap {
    let mut map = IconSetMap::new();

    map.insert_set(
        IconSetKey::Ship,
        [
            ("Fore Weapon", vec!["space/weapons/fore", "space/weapons/unrestricted"]),
            ("Aft Weapon", vec!["space/weapons/aft", "space/weapons/unrestricted"]),
            ("Experimental Weapon", vec!["space/weapons/experimental"]),
            ("Shield", vec!["space/shield"]),
            ("Secondary Deflector", vec!["space/secondary_deflector"]),
            // Console builds have no distinct Secondary Deflector label;
            // the Deflector icon group must search both folders.
            ("Deflector", vec!["space/deflector", "space/secondary_deflector"]),
            ("Impulse", vec!["space/impulse"]),
            ("Warp", vec!["space/warp"]),
            ("Singularity", vec!["space/singularity"]),
            ("Hangar", vec!["space/hangar"]),
            ("Devices", vec!["space/device"]),
            (
                "Universal Console",
                vec![
                    "space/consoles/universal",
                    "space/consoles/engineering",
                    "space/consoles/tactical",
                    "space/consoles/science",
                ],
            ),
            ("Engineering Console", vec!["space/consoles/engineering", "space/consoles/universal"]),
            ("Tactical Console", vec!["space/consoles/tactical", "space/consoles/universal"]),
            ("Science Console", vec!["space/consoles/science", "space/consoles/universal"]),
        ]
        .into_iter()
        .map(|(label, folders)| (label.to_string(), folders.into_iter().map(str::to_string).collect()))
        .collect(),
    );

    map.insert_set(
        IconSetKey::PcGround,
        [
            ("Body", vec!["ground/armor"]),
            ("Shield", vec!["ground/shield"]),
            ("EV Suit", vec!["ground/ev_suit"]),
            ("Kit Modules", vec!["ground/kit_module"]),
            ("Kit", vec!["ground/kit"]),
            ("Devices", vec!["ground/device"]),
            ("Weapon", vec!["ground/weapon"]),
        ]
        .into_iter()
        .map(|(label, folders)| (label.to_string(), folders.into_iter().map(str::to_string).collect()))
        .collect(),
    );

    map.insert_set(
        IconSetKey::ConsoleGround,
        [
            ("Body", vec!["ground/armor"]),
            ("Shield", vec!["ground/shield"]),
            ("EV Suit", vec!["ground/ev_suit"]),
            // Console swaps "Kit Modules" to "Kit"...
            ("Kit", vec!["ground/kit_module"]),
            // ...and "Kit" becomes "Kit Frame".
            ("Kit Frame", vec!["ground/kit"]),
            ("Devices", vec!["ground/device"]),
            ("Weapon", vec!["ground/weapon"]),
        ]
        .into_iter()
        .map(|(label, folders)| (label.to_string(), folders.into_iter().map(str::to_string).collect()))
        .collect(),
    );

    map.insert_set(
        IconSetKey::Traits,
        [
            ("Personal Space Traits", vec!["space/traits/personal"]),
            ("Space Reputation", vec!["space/traits/reputation"]),
            ("Active Space Reputation", vec!["space/traits/active_reputation"]),
            ("Personal Ground Traits", vec!["ground/traits/personal"]),
            ("Ground Reputation", vec!["ground/traits/reputation"]),
            ("Active Ground Reputation", vec!["ground/traits/active_reputation"]),
            ("Starship Traits", vec!["space/traits/starship"]),
        ]
        .into_iter()
        .map(|(label, folders)| (label.to_string(), folders.into_iter().map(str::to_string).collect()))
        .collect(),
    );

    map
}

/// One entry of the wiki-sourced `image_cache.json` companion file: the
/// cargo metadata merged into a catalog entry's metadata at hash-index
/// build time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageCacheEntry {
    pub item_name: String,
    pub cargo_type: Option<String>,
    pub cargo_item_name: Option<String>,
    #[serde(default)]
    pub cargo_filters: HashMap<String, String>,
}

/// The companion file in full: relative icon path to its cargo metadata.
pub type ImageCacheMap = HashMap<String, ImageCacheEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflector_searches_both_deflector_folders() {
        let map = builtin_sto_icon_sets();
        let folders = map.folders_for(IconSetKey::Ship, "Deflector");
        assert_eq!(folders, &["space/deflector".to_string(), "space/secondary_deflector".to_string()]);
    }

    #[test]
    fn console_ground_swaps_kit_and_kit_frame() {
        let map = builtin_sto_icon_sets();
        assert_eq!(map.folders_for(IconSetKey::ConsoleGround, "Kit"), &["ground/kit_module".to_string()]);
        assert_eq!(map.folders_for(IconSetKey::ConsoleGround, "Kit Frame"), &["ground/kit".to_string()]);
    }

    #[test]
    fn pc_ground_keeps_kit_modules_and_kit_separate() {
        let map = builtin_sto_icon_sets();
        assert_eq!(map.folders_for(IconSetKey::PcGround, "Kit Modules"), &["ground/kit_module".to_string()]);
        assert_eq!(map.folders_for(IconSetKey::PcGround, "Kit"), &["ground/kit".to_string()]);
    }

    #[test]
    fn unknown_label_yields_no_folders() {
        let map = builtin_sto_icon_sets();
        assert!(map.folders_for(IconSetKey::Ship, "Nonexistent").is_empty());
    }
}
