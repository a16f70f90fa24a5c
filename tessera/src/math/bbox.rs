//! Axis-aligned bounding box for pixel regions.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with inclusive `usize` bounds.
///
/// A pixel at `(x, y)` is inside if `x_min <= x <= x_max` and `y_min <= y <= y_max`.
/// `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl Aabb {
    #[inline]
    pub const fn new(x_min: usize, x_max: usize, y_min: usize, y_max: usize) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Inverted box that any `include()` call overwrites.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            x_min: usize::MAX,
            x_max: 0,
            y_min: usize::MAX,
            y_max: 0,
        }
    }

    #[inline]
    pub fn include(&mut self, x: usize, y: usize) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Number of columns covered.
    #[inline]
    pub const fn width(&self) -> usize {
        self.x_max.saturating_sub(self.x_min) + 1
    }

    /// Number of rows covered.
    #[inline]
    pub const fn height(&self) -> usize {
        self.y_max.saturating_sub(self.y_min) + 1
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Whether a sub-pixel point lies inside the box grown by `margin` on every side.
    #[inline]
    pub fn contains_point(&self, x: f64, y: f64, margin: f64) -> bool {
        x >= self.x_min as f64 - margin
            && x <= self.x_max as f64 + margin
            && y >= self.y_min as f64 - margin
            && y <= self.y_max as f64 + margin
    }
}
