//! Extrusion of a centerline path into a polygon of finite width.

use crate::point::Point;
use crate::polygon::Polygon;

/// Extrudes a centerline `path` into a closed polygon of the given `width`.
///
/// At each interior vertex the two adjacent segment normals are mitered so
/// that the extruded boundary keeps a constant perpendicular width through
/// bends, which keeps curvature-discretized paths (e.g. sampled bezier
/// curves) smooth. Endpoints use the normal of their single adjacent
/// segment.
///
/// Degenerate inputs produce an empty polygon: fewer than two points, or a
/// non-positive width.
pub fn extrude(path: &[Point], width: f64) -> Polygon {
    if path.len() < 2 || width <= 0.0 {
        return Polygon::default();
    }

    let half = width / 2.0;
    let n = path.len();
    let mut upper = Vec::with_capacity(n);
    let mut lower = Vec::with_capacity(n);

    for i in 0..n {
        let before = if i > 0 {
            (path[i] - path[i - 1]).normalized()
        } else {
            (path[1] - path[0]).normalized()
        };
        let after = if i + 1 < n {
            (path[i + 1] - path[i]).normalized()
        } else {
            before
        };

        let n1 = before.perp();
        let n2 = after.perp();
        let miter = (n1 + n2).normalized();
        let cos_half = miter.dot(n1);
        // A fold-back sharper than ~168 degrees would blow up the miter;
        // fall back to the incoming segment normal.
        let offset = if cos_half.abs() < 0.1 {
            n1 * half
        } else {
            miter * (half / cos_half)
        };

        upper.push(path[i] + offset);
        lower.push(path[i] - offset);
    }

    lower.reverse();
    upper.extend(lower);
    Polygon::from_verts(upper)
}
