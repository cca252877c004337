//! 2-D points.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

/// A point in two-dimensional space.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Point {
    /// The x-coordinate of the point.
    pub x: f64,
    /// The y-coordinate of the point.
    pub y: f64,
}

impl Point {
    /// Creates a new [`Point`] from (x, y) coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin, `(0, 0)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let origin = Point::zero();
    /// assert_eq!(origin, Point::new(0.0, 0.0));
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// The Euclidean norm of this point treated as a vector from the origin.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns this point scaled to unit length.
    ///
    /// Returns [`Point::zero`] if the norm is zero.
    pub fn normalized(&self) -> Self {
        let n = self.norm();
        if n == 0.0 {
            Self::zero()
        } else {
            Self::new(self.x / n, self.y / n)
        }
    }

    /// The dot product of this point with `other`.
    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Returns the vector perpendicular to this one,
    /// obtained by rotating 90 degrees counterclockwise.
    #[inline]
    pub const fn perp(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Snaps the x and y coordinates of this point to the nearest multiple of `grid`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// # use approx::assert_abs_diff_eq;
    /// let p = Point::new(1.2345, -0.0004).snap_to_grid(1e-3);
    /// assert_abs_diff_eq!(p, Point::new(1.234, 0.0), epsilon = 1e-12);
    /// ```
    #[inline]
    pub fn snap_to_grid(&self, grid: f64) -> Self {
        Self::new((self.x / grid).round() * grid, (self.y / grid).round() * grid)
    }
}

/// Rotates vector `v` counterclockwise by `degrees`.
///
/// An orientation of 0 degrees points along the +x axis.
///
/// # Example
///
/// ```
/// # use geometry::prelude::*;
/// # use approx::assert_abs_diff_eq;
/// let v = rotate(Point::new(1.0, 0.0), 90.0);
/// assert_abs_diff_eq!(v, Point::new(0.0, 1.0), epsilon = 1e-12);
/// ```
pub fn rotate(v: Point, degrees: f64) -> Point {
    let (sa, ca) = degrees.to_radians().sin_cos();
    Point::new(ca * v.x - sa * v.y, sa * v.x + ca * v.y)
}

impl std::ops::Add<Point> for Point {
    type Output = Self;
    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Point {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl AbsDiffEq for Point {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for Point {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotate_follows_ccw_convention() {
        let v = Point::new(2.0, 0.0);
        assert_abs_diff_eq!(rotate(v, 0.0), Point::new(2.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(rotate(v, 90.0), Point::new(0.0, 2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(rotate(v, 180.0), Point::new(-2.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(rotate(v, 270.0), Point::new(0.0, -2.0), epsilon = 1e-12);
    }

    #[test]
    fn rotate_composes() {
        let v = Point::new(1.25, -3.5);
        let once = rotate(rotate(v, 30.0), 60.0);
        let at_once = rotate(v, 90.0);
        assert_abs_diff_eq!(once, at_once, epsilon = 1e-12);
    }

    #[test]
    fn perp_is_ccw_quarter_turn() {
        let v = Point::new(3.0, 1.0);
        assert_abs_diff_eq!(v.perp(), rotate(v, 90.0), epsilon = 1e-12);
    }

    #[test]
    fn snap_to_grid_rounds_to_nearest() {
        let p = Point::new(0.12349, 0.12351).snap_to_grid(1e-3);
        assert_abs_diff_eq!(p, Point::new(0.123, 0.124), epsilon = 1e-12);
    }
}
