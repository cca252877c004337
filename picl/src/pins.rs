//! Pin, outline, and label annotation for placed references.
//!
//! Downstream verification reads device-recognition outlines, per-port pin
//! markers, and settings/instance labels off fixed layers. This module
//! stamps those markers onto a target component for each placed reference,
//! deriving all geometry from the reference's transformed ports and
//! bounding box. Every step is deterministic and individually toggleable
//! through [`Decorate`].
//!
//! The step functions mutate the target component they are given. To
//! annotate a component without touching it, go through [`add_pins`],
//! which wraps the component in a new container first (see
//! [`crate::container`]).

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::bbox::Bbox;
use geometry::prelude::{rotate, Point, Polygon, Sides};

use crate::cell::CellCache;
use crate::component::{Component, Port, Reference};
use crate::container::containerize;
use crate::layer::{Layer, Layers};

/// The pin marker style stamped at each port.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PinStyle {
    /// A right triangle pointing outward along the port orientation, with
    /// its apex half a port-width beyond the port edge.
    Triangle,
    /// A rectangle fully inside the port edge.
    SquareInside,
    /// A rectangle straddling the port edge, half in and half out.
    #[default]
    Square,
}

/// Configuration for the annotation pipeline.
///
/// Each of the four steps (outline, pins, settings label, instance label)
/// can be toggled independently; the remaining fields parameterize the
/// steps that are enabled.
#[derive(Debug, Clone)]
pub struct Decorate {
    /// The layer table markers are stamped on.
    pub layers: Layers,
    /// Stamp the device-recognition outline.
    pub outline: bool,
    /// Stamp per-port pin markers and port name labels.
    pub pins: bool,
    /// Stamp the settings-dump label.
    pub settings_label: bool,
    /// Stamp the instance identity label.
    pub instance_label: bool,
    /// The pin marker style.
    pub style: PinStyle,
    /// The length of square pin markers along the port orientation.
    pub pin_length: f64,
    /// Extra pin width beyond the port width, per side.
    pub port_margin: f64,
    /// Per-side outline padding beyond the bounding box.
    pub padding: Sides,
    /// Explicit instance label text, overriding the
    /// `{name},{x},{y}` default.
    pub instance_name: Option<ArcStr>,
}

impl Default for Decorate {
    fn default() -> Self {
        Self {
            layers: Layers::default(),
            outline: true,
            pins: true,
            settings_label: true,
            instance_label: true,
            style: PinStyle::default(),
            pin_length: 0.1,
            port_margin: 0.0,
            padding: Sides::default(),
            instance_name: None,
        }
    }
}

/// The marker polygon for a port, in parent coordinates.
///
/// Marker shapes are computed in the port's local frame (+x pointing
/// outward along the port orientation) and rotated into place, so the
/// 0/90/180/270 degree cases follow the same rotation convention as
/// everything else.
pub fn pin_marker(port: &Port, style: PinStyle, pin_length: f64, port_margin: f64) -> Polygon {
    let d = port.width / 2.0;
    let local: Vec<Point> = match style {
        PinStyle::Triangle => vec![
            Point::new(0.0, -d),
            Point::new(0.0, d),
            Point::new(d, 0.0),
        ],
        PinStyle::SquareInside => vec![
            Point::new(0.0, -d),
            Point::new(0.0, d),
            Point::new(-pin_length, d),
            Point::new(-pin_length, -d),
        ],
        PinStyle::Square => {
            let d = d + port_margin;
            vec![
                Point::new(pin_length / 2.0, -d),
                Point::new(pin_length / 2.0, d),
                Point::new(-pin_length / 2.0, d),
                Point::new(-pin_length / 2.0, -d),
            ]
        }
    };
    local
        .into_iter()
        .map(|p| port.midpoint + rotate(p, port.orientation))
        .collect()
}

/// Stamps the marker polygon for one port, plus a label carrying the port
/// name at the port midpoint.
///
/// The inside-square style stamps the polygon only; the marker sits in
/// live geometry where a label would collide with the port label of the
/// enclosing device.
pub fn add_pin(
    component: &mut Component,
    port: &Port,
    style: PinStyle,
    pin_length: f64,
    port_margin: f64,
    layer: Layer,
    label_layer: Layer,
) {
    component.add_polygon(pin_marker(port, style, pin_length, port_margin), layer);
    if style != PinStyle::SquareInside {
        component.add_label(port.name.clone(), port.midpoint, label_layer);
    }
}

/// Outline step: stamps the reference's bounding box, expanded by the
/// configured per-side padding, on the device-recognition layer.
///
/// A reference with no geometry produces no outline.
pub fn add_outline(component: &mut Component, reference: &Reference, decorate: &Decorate) {
    if let Some(bbox) = reference.bbox() {
        component.add_polygon(
            Polygon::from(bbox.expand(decorate.padding)),
            decorate.layers.devrec,
        );
    }
}

/// Pins step: stamps a marker and a name label for every port the
/// reference exposes, on the layer selected by each port's type.
///
/// A reference with no ports produces no markers.
pub fn add_pins_step(component: &mut Component, reference: &Reference, decorate: &Decorate) {
    for (_, port) in reference.ports() {
        let layer = decorate.layers.port_layer(port.port_type);
        add_pin(
            component,
            &port,
            decorate.style,
            decorate.pin_length,
            decorate.port_margin,
            layer,
            layer,
        );
    }
}

/// Settings-label step: stamps the referenced component's recorded settings
/// as a JSON text block anchored at the reference center.
///
/// A component with no recorded settings still gets a label (`settings={}`).
pub fn add_settings_label(component: &mut Component, reference: &Reference, decorate: &Decorate) {
    let settings = reference.settings();
    let body = serde_json::to_string_pretty(&settings.full).unwrap_or_else(|e| {
        tracing::error!("failed to serialize settings for `{}`: {e}", reference.name());
        "{}".to_string()
    });
    component.add_label(
        arcstr::format!("settings={body}"),
        reference.center(),
        decorate.layers.label_settings,
    );
}

/// Instance-label step: stamps `{name},{x},{y}` (coordinates rounded to
/// integers) at the reference position, snapped to a 1 nm grid, unless an
/// explicit instance name is configured.
pub fn add_instance_label(component: &mut Component, reference: &Reference, decorate: &Decorate) {
    let position = reference.position();
    let text = decorate.instance_name.clone().unwrap_or_else(|| {
        arcstr::format!(
            "{},{},{}",
            reference.name(),
            position.x.round() as i64,
            position.y.round() as i64
        )
    });
    component.add_label(
        text,
        position.snap_to_grid(1e-3),
        decorate.layers.label_instance,
    );
}

/// Runs the enabled annotation steps for one reference placed in
/// `component`: outline, pins, settings label, instance label.
pub fn add_pins_labels_and_outline(
    component: &mut Component,
    reference: &Reference,
    decorate: &Decorate,
) {
    if decorate.outline {
        add_outline(component, reference, decorate);
    }
    if decorate.pins {
        add_pins_step(component, reference, decorate);
    }
    if decorate.settings_label {
        add_settings_label(component, reference, decorate);
    }
    if decorate.instance_label {
        add_instance_label(component, reference, decorate);
    }
}

/// Runs [`add_pins_labels_and_outline`] for every reference in
/// `component`, or for an explicit subset.
pub fn add_pins_to_references(
    component: &mut Component,
    references: Option<&[Reference]>,
    decorate: &Decorate,
) {
    let references: Vec<Reference> = match references {
        Some(references) => references.to_vec(),
        None => component.references().to_vec(),
    };
    for reference in &references {
        add_pins_labels_and_outline(component, reference, decorate);
    }
}

/// Self-annotation: stamps the outline and pin markers for a component's
/// own bounding box and ports, onto itself.
///
/// This is the default marker function run at build time (before caching),
/// where the freshly built component has no enclosing reference yet; only
/// the geometric steps apply.
pub fn add_component_pins(component: &mut Component, decorate: &Decorate) {
    if decorate.outline {
        if let Some(bbox) = component.bbox() {
            component.add_polygon(
                Polygon::from(bbox.expand(decorate.padding)),
                decorate.layers.devrec,
            );
        }
    }
    if decorate.pins {
        let ports: Vec<Port> = component.ports().map(|(_, port)| port.clone()).collect();
        for port in &ports {
            let layer = decorate.layers.port_layer(port.port_type);
            add_pin(
                component,
                port,
                decorate.style,
                decorate.pin_length,
                decorate.port_margin,
                layer,
                layer,
            );
        }
    }
}

/// Annotates `component` without mutating it: returns a new container named
/// `{name}_pins` holding one reference to `component`, with that top-level
/// reference annotated. When `recursive` is set, every reference directly
/// inside `component` is annotated as well (one level, onto the container).
///
/// Cache-aware: repeated calls for the same component return the same
/// container.
pub fn add_pins(
    cache: &mut CellCache,
    component: &Arc<Component>,
    recursive: bool,
    decorate: &Decorate,
) -> Arc<Component> {
    containerize(cache, component, "pins", |container, reference| {
        add_pins_labels_and_outline(container, reference, decorate);
        if recursive {
            for inner in component.references().to_vec() {
                add_pins_labels_and_outline(container, &inner, decorate);
            }
        }
    })
}
