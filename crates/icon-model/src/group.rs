//! Icon groups: named rectangles within which one column/row/grid of slots
//! is expected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::geom::BBox;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconGroup {
    pub label: String,
    pub bbox: BBox,
}

impl IconGroup {
    pub fn new(label: impl Into<String>, bbox: BBox) -> Self {
        Self {
            label: label.into(),
            bbox,
        }
    }
}

/// Per-label icon-group bbox, as produced by `locate_icon_groups`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IconGroupMap {
    pub groups: HashMap<String, IconGroup>,
}

impl IconGroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: IconGroup) {
        self.groups.insert(group.label.clone(), group);
    }

    pub fn get(&self, label: &str) -> Option<&IconGroup> {
        self.groups.get(label)
    }
}
