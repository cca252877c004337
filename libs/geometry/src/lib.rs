//! Floating-point 2-D geometry primitives for photonic layout.
//!
//! Photonic components live on a micron-scale floating-point grid with
//! arbitrary (non-Manhattan) port orientations, so all coordinates here are
//! `f64` and rotations are expressed in degrees counterclockwise, with 0
//! degrees pointing along the +x axis.
#![warn(missing_docs)]

pub mod bbox;
pub mod path;
pub mod point;
pub mod polygon;
pub mod prelude;
pub mod rect;
