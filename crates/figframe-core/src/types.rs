//! Geometry value types.

use crate::spec::Axis;

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The extent along an axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Axis-aligned box in figure coordinates.
///
/// The origin is the bottom-left corner of the figure and y grows upwards, so
/// `(x, y)` is the bottom-left corner of the box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the top edge (y + height).
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Lower edge along an axis (left or bottom).
    pub fn low(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Upper edge along an axis (right or top).
    pub fn high(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.right(),
            Axis::Vertical => self.top(),
        }
    }

    /// Shrink by per-side insets.
    pub fn inset(&self, left: f64, right: f64, top: f64, bottom: f64) -> Bounds {
        Bounds::new(
            self.x + left,
            self.y + bottom,
            self.width - left - right,
            self.height - top - bottom,
        )
    }

    /// Check whether `other` lies inside these bounds, allowing `tolerance`.
    pub fn contains_bounds(&self, other: &Bounds, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.top() <= self.top() + tolerance
    }
}
