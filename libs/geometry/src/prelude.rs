//! A prelude re-exporting commonly used items.

pub use crate::bbox::Bbox;
pub use crate::path::extrude;
pub use crate::point::{rotate, Point};
pub use crate::polygon::Polygon;
pub use crate::rect::{Rect, Sides};
