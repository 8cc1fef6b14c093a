//! Axis-aligned box overlap in the playfield's mixed coordinate space
//!
//! Horizontal positions are percentages of the playfield width, vertical
//! positions are absolute units. Boxes are centered horizontally on their x
//! and top-aligned on their y. Percentages are converted to absolute units
//! before testing, since a percentage distance is not comparable to a size.

use glam::Vec2;
use serde::Serialize;

use crate::percent_to_px;

/// A collision box positioned in playfield space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hitbox {
    /// Horizontal center (percent of playfield width)
    pub x_percent: f32,
    /// Top edge (absolute units)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(x_percent: f32, y: f32, (width, height): (f32, f32)) -> Self {
        Self {
            x_percent,
            y,
            width,
            height,
        }
    }

    /// Resolve to an absolute-space rectangle
    pub fn to_rect(&self, playfield_width: f32) -> Rect {
        let left = percent_to_px(self.x_percent, playfield_width) - self.width / 2.0;
        Rect {
            min: Vec2::new(left, self.y),
            max: Vec2::new(left + self.width, self.y + self.height),
        }
    }
}

/// Absolute-space rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Strict interval overlap on both axes (touching edges do not overlap)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Test two hitboxes for overlap.
///
/// Fails closed: with no usable playfield width (not yet measured, zero,
/// negative or non-finite) nothing collides.
pub fn overlaps(a: &Hitbox, b: &Hitbox, playfield_width: Option<f32>) -> bool {
    let Some(width) = playfield_width.filter(|w| w.is_finite() && *w > 0.0) else {
        return false;
    };
    a.to_rect(width).intersects(&b.to_rect(width))
}
