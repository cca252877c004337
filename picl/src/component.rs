//! The component model: containers, placed references, ports, and labels.
//!
//! A [`Component`] owns polygons, labels, ports, recorded build settings,
//! and child [`Reference`]s. Identity is its name; the build cache in
//! [`crate::cell`] guarantees at most one live component per canonical name
//! within a process run, so references share ownership through [`Arc`].

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::bbox::{union, Bbox};
use geometry::prelude::{rotate, Point, Polygon, Rect};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::{Layer, PortType};
use crate::name::Params;

/// A connection point on a component boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// The port name, unique within its owning component.
    pub name: ArcStr,
    /// The center of the port edge.
    pub midpoint: Point,
    /// The width of the port edge. Must be positive.
    pub width: f64,
    /// The outward orientation of the port, in degrees counterclockwise
    /// from the +x axis, interpreted mod 360.
    pub orientation: f64,
    /// The type of signal the port carries.
    pub port_type: PortType,
    /// The layer the port geometry belongs to.
    pub layer: Layer,
}

impl Port {
    /// Creates a new optical [`Port`].
    pub fn new(
        name: impl Into<ArcStr>,
        midpoint: impl Into<Point>,
        width: f64,
        orientation: f64,
        layer: Layer,
    ) -> Self {
        Self {
            name: name.into(),
            midpoint: midpoint.into(),
            width,
            orientation,
            port_type: PortType::Optical,
            layer,
        }
    }

    /// Sets the port type.
    pub fn with_type(mut self, port_type: PortType) -> Self {
        self.port_type = port_type;
        self
    }
}

/// A polygon tagged with the layer it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    polygon: Polygon,
    layer: Layer,
}

impl Shape {
    /// Creates a new [`Shape`].
    pub fn new(polygon: impl Into<Polygon>, layer: Layer) -> Self {
        Self {
            polygon: polygon.into(),
            layer,
        }
    }

    /// The polygon.
    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// The layer the polygon belongs to.
    #[inline]
    pub fn layer(&self) -> Layer {
        self.layer
    }
}

/// A text annotation anchored at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    text: ArcStr,
    origin: Point,
    layer: Layer,
}

impl Text {
    /// Creates a new [`Text`].
    pub fn new(text: impl Into<ArcStr>, origin: Point, layer: Layer) -> Self {
        Self {
            text: text.into(),
            origin,
            layer,
        }
    }

    /// The label text.
    #[inline]
    pub fn text(&self) -> &ArcStr {
        &self.text
    }

    /// The anchor position.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The layer the label belongs to.
    #[inline]
    pub fn layer(&self) -> Layer {
        self.layer
    }
}

/// The construction settings recorded on a built component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// The identifying name of the factory that built the component.
    pub function_name: Option<ArcStr>,
    /// The module the factory belongs to.
    pub module: Option<ArcStr>,
    /// Declared defaults overlaid with the explicitly supplied parameters.
    pub full: Params,
    /// Only the explicitly supplied parameters.
    pub changed: Params,
}

/// A named container of polygons, labels, ports, and placed references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    name: ArcStr,
    name_long: Option<ArcStr>,
    polygons: Vec<Shape>,
    labels: Vec<Text>,
    ports: IndexMap<ArcStr, Port>,
    settings: Settings,
    references: Vec<Reference>,
}

impl Component {
    /// Creates a new, empty component.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The name of the component.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The pre-truncation name, present when the canonical name exceeded
    /// the maximum cell name length.
    #[inline]
    pub fn name_long(&self) -> Option<&ArcStr> {
        self.name_long.as_ref()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<ArcStr>) {
        self.name = name.into();
    }

    pub(crate) fn set_name_long(&mut self, name: impl Into<ArcStr>) {
        self.name_long = Some(name.into());
    }

    /// Adds a polygon on the given layer.
    pub fn add_polygon(&mut self, polygon: impl Into<Polygon>, layer: Layer) {
        self.polygons.push(Shape::new(polygon, layer));
    }

    /// Adds a text label anchored at `origin` on the given layer.
    pub fn add_label(&mut self, text: impl Into<ArcStr>, origin: Point, layer: Layer) {
        self.labels.push(Text::new(text, origin, layer));
    }

    /// Adds a port.
    ///
    /// Port names are unique within a component; adding a second port with
    /// an existing name is an error.
    pub fn add_port(&mut self, port: Port) -> Result<()> {
        if self.ports.contains_key(&port.name) {
            tracing::error!(
                "component `{}` already has a port named `{}`",
                self.name,
                port.name
            );
            return Err(Error::DuplicatePort {
                name: port.name.clone(),
                cell: self.name.clone(),
            });
        }
        self.ports.insert(port.name.clone(), port);
        Ok(())
    }

    /// Adds a placed reference to another component.
    pub fn add_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    /// Iterates over the ports of this component.
    #[inline]
    pub fn ports(&self) -> impl Iterator<Item = (&ArcStr, &Port)> {
        self.ports.iter()
    }

    /// The number of ports.
    #[inline]
    pub fn num_ports(&self) -> usize {
        self.ports.len()
    }

    /// Gets a port by name.
    ///
    /// # Panics
    ///
    /// Panics if no port has the given name.
    /// For a non-panicking alternative, see [`Component::try_port`].
    #[inline]
    pub fn port(&self, name: &str) -> &Port {
        self.try_port(name).unwrap()
    }

    /// Gets a port by name.
    #[inline]
    pub fn try_port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    pub(crate) fn take_ports(&mut self) -> IndexMap<ArcStr, Port> {
        std::mem::take(&mut self.ports)
    }

    pub(crate) fn set_ports(&mut self, ports: IndexMap<ArcStr, Port>) {
        self.ports = ports;
    }

    /// The polygons of this component (child references excluded).
    #[inline]
    pub fn polygons(&self) -> &[Shape] {
        &self.polygons
    }

    /// Iterates over the polygons on the given layer.
    pub fn shapes_on(&self, layer: Layer) -> impl Iterator<Item = &Shape> {
        self.polygons.iter().filter(move |s| s.layer() == layer)
    }

    /// The labels of this component.
    #[inline]
    pub fn labels(&self) -> &[Text] {
        &self.labels
    }

    /// The placed references inside this component.
    #[inline]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// The recorded construction settings.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

impl Bbox for Component {
    /// The bounding box over this component's polygons and the transformed
    /// bounding boxes of its references. Labels and ports carry no area.
    fn bbox(&self) -> Option<Rect> {
        let mut bbox = self.polygons.iter().map(|s| s.polygon().bbox()).fold(
            None,
            |acc, b| union(acc, b),
        );
        for reference in &self.references {
            bbox = union(bbox, reference.bbox());
        }
        bbox
    }
}

/// A placement of one component inside another.
///
/// Holds shared ownership of the referenced component together with a
/// 2-D placement: a translation, a counterclockwise rotation in degrees,
/// and an optional reflection about the x-axis (applied before rotation).
/// Ports, center, and bounding geometry are derived on demand from the
/// referenced component through the placement transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    cell: Arc<Component>,
    origin: Point,
    rotation: f64,
    reflect_vert: bool,
}

impl Reference {
    /// Creates a reference to `cell` placed at the origin with no rotation.
    pub fn new(cell: Arc<Component>) -> Self {
        Self {
            cell,
            origin: Point::zero(),
            rotation: 0.0,
            reflect_vert: false,
        }
    }

    /// Moves the reference to `origin`.
    pub fn at(mut self, origin: impl Into<Point>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Rotates the reference counterclockwise by `degrees`.
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Reflects the reference about the x-axis (before rotation).
    pub fn reflected(mut self) -> Self {
        self.reflect_vert = true;
        self
    }

    /// The referenced component.
    #[inline]
    pub fn cell(&self) -> &Arc<Component> {
        &self.cell
    }

    /// The name of the referenced component.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        self.cell.name()
    }

    /// The recorded settings of the referenced component.
    #[inline]
    pub fn settings(&self) -> &Settings {
        self.cell.settings()
    }

    /// The placement position (translation) of this reference.
    #[inline]
    pub fn position(&self) -> Point {
        self.origin
    }

    /// The placement rotation of this reference, in degrees.
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Maps a point from the referenced component's coordinates into the
    /// parent's coordinates.
    pub fn transform_point(&self, p: Point) -> Point {
        let p = if self.reflect_vert {
            Point::new(p.x, -p.y)
        } else {
            p
        };
        rotate(p, self.rotation) + self.origin
    }

    fn transform_orientation(&self, orientation: f64) -> f64 {
        let orientation = if self.reflect_vert {
            -orientation
        } else {
            orientation
        };
        (orientation + self.rotation).rem_euclid(360.0)
    }

    /// The ports of the referenced component, mapped through the placement
    /// transform. Insertion order follows the referenced component.
    pub fn ports(&self) -> IndexMap<ArcStr, Port> {
        self.cell
            .ports()
            .map(|(name, port)| {
                let mut port = port.clone();
                port.midpoint = self.transform_point(port.midpoint);
                port.orientation = self.transform_orientation(port.orientation);
                (name.clone(), port)
            })
            .collect()
    }

    /// The center of this reference's bounding box, or its position if the
    /// referenced component holds no geometry.
    pub fn center(&self) -> Point {
        self.bbox().map(|b| b.center()).unwrap_or(self.origin)
    }
}

impl Bbox for Reference {
    /// The bounding box of the referenced component's bounding box corners
    /// mapped through the placement transform.
    fn bbox(&self) -> Option<Rect> {
        let bbox = self.cell.bbox()?;
        Rect::from_points(bbox.corners().map(|p| self.transform_point(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layers;
    use approx::assert_abs_diff_eq;

    fn straight(length: f64, width: f64) -> Component {
        let layers = Layers::default();
        let w = width / 2.0;
        let mut c = Component::new("straight");
        c.add_polygon(
            vec![
                Point::new(0.0, -w),
                Point::new(length, -w),
                Point::new(length, w),
                Point::new(0.0, w),
            ],
            layers.wg,
        );
        c.add_port(Port::new("W0", (0.0, 0.0), width, 180.0, layers.wg))
            .unwrap();
        c.add_port(Port::new("E0", (length, 0.0), width, 0.0, layers.wg))
            .unwrap();
        c
    }

    #[test]
    fn duplicate_port_is_rejected() {
        let layers = Layers::default();
        let mut c = Component::new("c");
        c.add_port(Port::new("W0", (0.0, 0.0), 0.5, 180.0, layers.wg))
            .unwrap();
        let err = c
            .add_port(Port::new("W0", (1.0, 0.0), 0.5, 0.0, layers.wg))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicatePort { .. }));
    }

    #[test]
    fn reference_translates_and_rotates_ports() {
        let cell = Arc::new(straight(10.0, 0.5));
        let reference = Reference::new(cell).at((5.0, 2.0)).rotated(90.0);
        let ports = reference.ports();
        let east = &ports["E0"];
        assert_abs_diff_eq!(east.midpoint, Point::new(5.0, 12.0), epsilon = 1e-9);
        assert_abs_diff_eq!(east.orientation, 90.0, epsilon = 1e-9);
        let west = &ports["W0"];
        assert_abs_diff_eq!(west.midpoint, Point::new(5.0, 2.0), epsilon = 1e-9);
        assert_abs_diff_eq!(west.orientation, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn reference_bbox_follows_placement() {
        let cell = Arc::new(straight(10.0, 0.5));
        let reference = Reference::new(cell).at((1.0, 1.0)).rotated(90.0);
        let bbox = reference.bbox().unwrap();
        assert_abs_diff_eq!(bbox.left(), 0.75, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.right(), 1.25, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.bot(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.top(), 11.0, epsilon = 1e-9);
    }

    #[test]
    fn component_bbox_includes_references() {
        let cell = Arc::new(straight(10.0, 0.5));
        let mut circuit = Component::new("circuit");
        circuit.add_reference(Reference::new(cell.clone()));
        circuit.add_reference(Reference::new(cell).at((10.0, 0.0)));
        let bbox = circuit.bbox().unwrap();
        assert_abs_diff_eq!(bbox.right(), 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.left(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn reflection_flips_port_orientation() {
        let cell = Arc::new(straight(10.0, 0.5));
        let mut with_angle = (*cell).clone();
        with_angle
            .add_port(Port::new(
                "N0",
                (5.0, 0.25),
                0.5,
                90.0,
                Layers::default().wg,
            ))
            .unwrap();
        let reference = Reference::new(Arc::new(with_angle)).reflected();
        let ports = reference.ports();
        assert_abs_diff_eq!(ports["N0"].orientation, 270.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ports["N0"].midpoint, Point::new(5.0, -0.25), epsilon = 1e-9);
    }
}
