//! Spatial primitives and collision-free placement for canvas nodes.

pub mod placement;

pub use placement::*;

use serde::{Deserialize, Serialize};

/// A position on the infinite canvas, in canvas units.
///
/// The y axis grows downward, matching screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point displaced by the given offset.
    pub fn offset_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The rendered footprint of a node card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Returns this rectangle grown by `margin` units on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            origin: Point::new(self.origin.x - margin, self.origin.y - margin),
            size: Size::new(
                self.size.width + 2.0 * margin,
                self.size.height + 2.0 * margin,
            ),
        }
    }

    /// Axis-aligned separation test. Rectangles that merely touch do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.origin.x < other.origin.x + other.size.width
            && self.origin.x + self.size.width > other.origin.x
            && self.origin.y < other.origin.y + other.size.height
            && self.origin.y + self.size.height > other.origin.y
    }
}

/// Optional source of live-measured card dimensions.
///
/// When a card has grown beyond its static footprint (expanded text, loaded
/// media), the session can supply actual rendered sizes through this trait and
/// the placement search will use them instead of the per-type defaults.
pub trait DimensionLookup {
    fn dimensions(&self, node_id: &str) -> Option<Size>;
}
