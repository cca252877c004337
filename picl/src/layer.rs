//! Layer identifiers and the static layer table.

use serde::{Deserialize, Serialize};

/// A GDS-style layer identifier: a layer number and a datatype.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Layer {
    /// The layer number.
    pub layer: u16,
    /// The datatype number.
    pub datatype: u16,
}

impl Layer {
    /// Creates a new [`Layer`].
    pub const fn new(layer: u16, datatype: u16) -> Self {
        Self { layer, datatype }
    }
}

impl From<(u16, u16)> for Layer {
    fn from(value: (u16, u16)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// The type of signal a port carries.
///
/// Selects the marker layer used when stamping pin markers for the port.
#[derive(Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum PortType {
    /// An optical waveguide port.
    #[default]
    Optical,
    /// A DC electrical port.
    Dc,
    /// A heater port.
    Heater,
    /// A superconducting electrical port.
    Superconducting,
}

/// The static layer table.
///
/// Maps the annotation pipeline's outputs to layers. The defaults follow the
/// SiEPIC-style verification convention: device-recognition outlines on
/// DEVREC, optical pins on PORT, electrical pins on PORTE, and label layers
/// for settings dumps and instance names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layers {
    /// Waveguide core geometry.
    pub wg: Layer,
    /// Device-recognition outline polygons.
    pub devrec: Layer,
    /// Optical pin markers.
    pub port: Layer,
    /// Electrical pin markers.
    pub porte: Layer,
    /// Port name labels.
    pub text: Layer,
    /// Settings-dump labels.
    pub label_settings: Layer,
    /// Instance identity labels.
    pub label_instance: Layer,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            wg: Layer::new(1, 0),
            devrec: Layer::new(68, 0),
            port: Layer::new(1, 10),
            porte: Layer::new(1, 11),
            text: Layer::new(66, 0),
            label_settings: Layer::new(202, 0),
            label_instance: Layer::new(206, 0),
        }
    }
}

impl Layers {
    /// The pin marker layer for ports of the given type.
    pub fn port_layer(&self, port_type: PortType) -> Layer {
        match port_type {
            PortType::Optical => self.port,
            PortType::Dc | PortType::Heater | PortType::Superconducting => self.porte,
        }
    }
}
