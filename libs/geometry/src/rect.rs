//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// An axis-aligned rectangle, specified by its lower-left and upper-right corners.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Rect {
    p0: Point,
    p1: Point,
}

/// Per-side expansion amounts for a [`Rect`].
///
/// Positive values grow the rectangle outward on the given side.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sides {
    /// Expansion on the north (top) side.
    pub top: f64,
    /// Expansion on the south (bottom) side.
    pub bottom: f64,
    /// Expansion on the west (left) side.
    pub left: f64,
    /// Expansion on the east (right) side.
    pub right: f64,
}

impl Sides {
    /// Creates a [`Sides`] with the same expansion on all four sides.
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

impl Rect {
    /// Creates a rectangle from the given side coordinates.
    ///
    /// Coordinates are normalized, so the arguments may be given in any order.
    pub fn from_sides(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            p0: Point::new(x0.min(x1), y0.min(y1)),
            p1: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Creates a rectangle that tightly encloses the given points.
    ///
    /// Returns [`None`] if the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut rect = Self {
            p0: first,
            p1: first,
        };
        for p in points {
            rect.p0.x = rect.p0.x.min(p.x);
            rect.p0.y = rect.p0.y.min(p.y);
            rect.p1.x = rect.p1.x.max(p.x);
            rect.p1.y = rect.p1.y.max(p.y);
        }
        Some(rect)
    }

    /// The leftmost x-coordinate.
    #[inline]
    pub fn left(&self) -> f64 {
        self.p0.x
    }

    /// The rightmost x-coordinate.
    #[inline]
    pub fn right(&self) -> f64 {
        self.p1.x
    }

    /// The bottom y-coordinate.
    #[inline]
    pub fn bot(&self) -> f64 {
        self.p0.y
    }

    /// The top y-coordinate.
    #[inline]
    pub fn top(&self) -> f64 {
        self.p1.y
    }

    /// The width of the rectangle.
    #[inline]
    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    /// The height of the rectangle.
    #[inline]
    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    /// The center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(
            (self.p0.x + self.p1.x) / 2.0,
            (self.p0.y + self.p1.y) / 2.0,
        )
    }

    /// The four corners of the rectangle, in counterclockwise order
    /// starting from the lower-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.p0.x, self.p0.y),
            Point::new(self.p1.x, self.p0.y),
            Point::new(self.p1.x, self.p1.y),
            Point::new(self.p0.x, self.p1.y),
        ]
    }

    /// Expands the rectangle by the given per-side amounts.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r = Rect::from_sides(0.0, 0.0, 2.0, 1.0).expand(Sides::uniform(0.5));
    /// assert_eq!(r, Rect::from_sides(-0.5, -0.5, 2.5, 1.5));
    /// ```
    pub fn expand(&self, sides: Sides) -> Self {
        Self::from_sides(
            self.p0.x - sides.left,
            self.p0.y - sides.bottom,
            self.p1.x + sides.right,
            self.p1.y + sides.top,
        )
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: Rect) -> Self {
        Self::from_sides(
            self.p0.x.min(other.p0.x),
            self.p0.y.min(other.p0.y),
            self.p1.x.max(other.p1.x),
            self.p1.y.max(other.p1.y),
        )
    }
}
