//! Polygons with floating-point vertex coordinates.

use serde::{Deserialize, Serialize};

use crate::bbox::Bbox;
use crate::point::{rotate, Point};
use crate::rect::Rect;

/// A polygon, given by its vertices.
///
/// Vertices form a closed boundary; no particular winding is assumed,
/// and consumers must not rely on one.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon with the given vertices.
    pub fn from_verts(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The vertices of this polygon.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether this polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns this polygon translated by `offset`.
    pub fn translated(&self, offset: Point) -> Self {
        Self {
            points: self.points.iter().map(|&p| p + offset).collect(),
        }
    }

    /// Returns this polygon rotated counterclockwise about the origin by `degrees`.
    pub fn rotated(&self, degrees: f64) -> Self {
        Self {
            points: self.points.iter().map(|&p| rotate(p, degrees)).collect(),
        }
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(value: Vec<Point>) -> Self {
        Self::from_verts(value)
    }
}

impl From<Rect> for Polygon {
    fn from(value: Rect) -> Self {
        Self::from_verts(value.corners().to_vec())
    }
}

impl FromIterator<Point> for Polygon {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Self::from_verts(iter.into_iter().collect())
    }
}

impl Bbox for Polygon {
    fn bbox(&self) -> Option<Rect> {
        Rect::from_points(self.points.iter().copied())
    }
}
