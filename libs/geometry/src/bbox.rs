//! Axis-aligned rectangular bounding boxes.

use crate::rect::Rect;

/// A geometric object that has an axis-aligned rectangular bounding box.
pub trait Bbox {
    /// Computes the axis-aligned rectangular bounding box.
    ///
    /// If the object contains no geometry, this method returns `None`.
    fn bbox(&self) -> Option<Rect>;

    /// Computes the axis-aligned rectangular bounding box, panicking
    /// if the object contains no geometry.
    fn bbox_rect(&self) -> Rect {
        self.bbox().unwrap()
    }
}

impl<T> Bbox for &T
where
    T: Bbox,
{
    fn bbox(&self) -> Option<Rect> {
        T::bbox(*self)
    }
}

impl<T: Bbox> Bbox for Vec<T> {
    fn bbox(&self) -> Option<Rect> {
        self.as_slice().bbox()
    }
}

impl<T: Bbox> Bbox for [T] {
    fn bbox(&self) -> Option<Rect> {
        let mut bbox: Option<Rect> = None;
        for item in self {
            bbox = union(bbox, item.bbox());
        }
        bbox
    }
}

impl Bbox for Rect {
    fn bbox(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl Bbox for Option<Rect> {
    fn bbox(&self) -> Option<Rect> {
        *self
    }
}

/// The bounding union of two optional rectangles.
pub fn union(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_handles_empties() {
        let a = Rect::from_sides(0.0, 0.0, 1.0, 1.0);
        let b = Rect::from_sides(-1.0, -1.0, 0.0, 0.0);
        assert_eq!(union(Some(a), Some(b)), Some(a.union(b)));
        assert_eq!(union(Some(a), None), Some(a));
        assert_eq!(union(None, Some(b)), Some(b));
        assert_eq!(union(None, None), None);
    }

    #[test]
    fn slice_bbox_unions_elements() {
        let rects = vec![
            Rect::from_sides(0.0, 0.0, 1.0, 1.0),
            Rect::from_sides(2.0, -2.0, 3.0, 0.0),
        ];
        assert_eq!(rects.bbox(), Some(Rect::from_sides(0.0, -2.0, 3.0, 1.0)));
        let empty: Vec<Rect> = vec![];
        assert_eq!(empty.bbox(), None);
    }
}
