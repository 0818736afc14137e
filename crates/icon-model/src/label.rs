//! OCR label output, consumed by classification and icon-group location.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::geom::Point;

/// A located text label: its recognized text and the four corners of its
/// bounding quadrilateral, in screenshot pixel coordinates. Immutable once
/// produced by the (out of scope) label locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub corners: [Point; 4],
}

impl Label {
    pub fn new(text: impl Into<String>, corners: [Point; 4]) -> Self {
        Self {
            text: text.into(),
            corners,
        }
    }

    pub fn left(&self) -> i32 {
        self.corners.iter().map(|p| p.x).min().unwrap_or(0)
    }

    pub fn right(&self) -> i32 {
        self.corners.iter().map(|p| p.x).max().unwrap_or(0)
    }

    pub fn top(&self) -> i32 {
        self.corners.iter().map(|p| p.y).min().unwrap_or(0)
    }

    pub fn bottom(&self) -> i32 {
        self.corners.iter().map(|p| p.y).max().unwrap_or(0)
    }

    pub fn mid_y(&self) -> i32 {
        (self.top() + self.bottom()) / 2
    }

    pub fn mid_x(&self) -> i32 {
        (self.left() + self.right()) / 2
    }
}

/// Per-screenshot label bbox map, keyed by the label's recognized text.
/// Multiple labels with identical text (e.g. repeated "Devices" headers)
/// are kept as a list under that key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelMap {
    pub labels: HashMap<String, Vec<Label>>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: Label) {
        self.labels.entry(label.text.clone()).or_default().push(label);
    }

    pub fn first(&self, text: &str) -> Option<&Label> {
        self.labels.get(text).and_then(|v| v.first())
    }

    pub fn all(&self, text: &str) -> &[Label] {
        self.labels.get(text).map_or(&[], |v| v.as_slice())
    }
}
