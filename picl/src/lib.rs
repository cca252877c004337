//! Parametric photonic component layout.
//!
//! Components are built by parameterized cell factories. Each invocation is
//! assigned a canonical, collision-resistant name derived from the factory
//! identity and its parameters, and memoized in an injected build cache so
//! that equal invocations share one component ([`cell`], [`name`]). Built
//! hierarchies are decorated for downstream verification by the pin/outline
//! annotation pipeline ([`pins`]), non-destructively via containerizing
//! wrappers ([`container`]).
#![warn(missing_docs)]

pub mod cell;
pub mod component;
pub mod container;
pub mod error;
pub mod layer;
pub mod name;
pub mod pins;
pub mod ports;

/// A prelude re-exporting commonly used items.
pub mod prelude {
    pub use crate::cell::{build_cell, CellCache, CellFactory, CellOptions};
    pub use crate::component::{Component, Port, Reference};
    pub use crate::container::containerize;
    pub use crate::error::{Error, Result};
    pub use crate::layer::{Layer, Layers, PortType};
    pub use crate::name::{ParamValue, Params};
    pub use crate::params;
    pub use crate::pins::{add_pins, Decorate, PinStyle};
    pub use geometry::prelude::*;
}
