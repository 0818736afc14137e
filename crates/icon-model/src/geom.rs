//! Screenshot-pixel-space geometry shared by every stage.

use serde::{Deserialize, Serialize};

/// A point in screenshot pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screenshot pixel coordinates, `[x, y, width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BBox {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn mid_y(&self) -> i32 {
        self.y + self.height as i32 / 2
    }

    pub fn mid_x(&self) -> i32 {
        self.x + self.width as i32 / 2
    }

    /// Reading-order comparison: top-to-bottom, then left-to-right, used to
    /// assign dense slot indices within an icon group.
    pub fn reading_order_key(&self) -> (i32, i32) {
        (self.y, self.x)
    }
}
