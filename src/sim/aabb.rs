//! Axis-aligned bounding boxes
//!
//! Screen-style coordinates: `pos` is the top-left corner and y grows downward.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: DVec2,
    pub size: DVec2,
}

impl Aabb {
    pub fn new(pos: DVec2, size: DVec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Whether a horizontal span at `screen_x` of `width` is inside a viewport of `viewport_width`
#[inline]
pub fn is_visible(screen_x: f64, width: f64, viewport_width: f64) -> bool {
    screen_x + width > 0.0 && screen_x < viewport_width
}
