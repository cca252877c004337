//! Port direction classification and standard port renaming.
//!
//! Ports are renamed to a convention downstream netlisting relies on:
//! optical ports are named after the side of the component they face
//! (`E0`, `W1`, ...), while electrical port groups are numbered
//! counterclockwise around the boundary with a per-type prefix.

use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::component::{Component, Port};
use crate::layer::PortType;

/// The side of a component a port faces, classified from its orientation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    /// Facing +y.
    North,
    /// Facing -y.
    South,
    /// Facing +x.
    East,
    /// Facing -x.
    West,
}

impl Side {
    /// Classifies an orientation (degrees, interpreted mod 360) into the
    /// side it faces. Diagonal orientations snap to the nearest side, with
    /// 45-degree boundaries resolved counterclockwise (45 is east,
    /// 135 is north, 225 is west).
    pub fn of(orientation: f64) -> Self {
        let angle = orientation.rem_euclid(360.0);
        if angle <= 45.0 || angle >= 315.0 {
            Self::East
        } else if angle <= 135.0 {
            Self::North
        } else if angle <= 225.0 {
            Self::West
        } else {
            Self::South
        }
    }

    /// The single-letter name of this side.
    pub fn letter(&self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }
}

fn by_side(ports: Vec<Port>) -> IndexMap<Side, Vec<Port>> {
    let mut sides: IndexMap<Side, Vec<Port>> = [Side::East, Side::North, Side::West, Side::South]
        .into_iter()
        .map(|side| (side, Vec::new()))
        .collect();
    for port in ports {
        sides[&Side::of(port.orientation)].push(port);
    }
    sides
}

/// Renames a group of ports by the side they face: sorted within each side
/// (east/west ports bottom-to-top, north/south ports left-to-right) and
/// named `{prefix}{side}{index}`.
fn rename_facing_side(ports: Vec<Port>, prefix: &str) -> Vec<Port> {
    let mut sides = by_side(ports);
    for (side, ports) in sides.iter_mut() {
        match side {
            Side::East | Side::West => ports.sort_by(|a, b| {
                a.midpoint
                    .y
                    .total_cmp(&b.midpoint.y)
                    .then(a.midpoint.x.total_cmp(&b.midpoint.x))
            }),
            Side::North | Side::South => ports.sort_by(|a, b| {
                a.midpoint
                    .x
                    .total_cmp(&b.midpoint.x)
                    .then(a.midpoint.y.total_cmp(&b.midpoint.y))
            }),
        }
        for (i, port) in ports.iter_mut().enumerate() {
            port.name = ArcStr::from(format!("{prefix}{}{i}", side.letter()));
        }
    }
    sides.into_values().flatten().collect()
}

/// Renames a group of ports counterclockwise around the boundary, starting
/// on the east side: east ports south-to-north, north ports east-to-west,
/// west ports north-to-south, south ports west-to-east, named
/// `{prefix}{index}`.
fn rename_counter_clockwise(ports: Vec<Port>, prefix: &str) -> Vec<Port> {
    let mut sides = by_side(ports);
    let mut ordered = Vec::new();
    for (side, ports) in sides.iter_mut() {
        match side {
            Side::East => ports.sort_by(|a, b| a.midpoint.y.total_cmp(&b.midpoint.y)),
            Side::North => ports.sort_by(|a, b| b.midpoint.x.total_cmp(&a.midpoint.x)),
            Side::West => ports.sort_by(|a, b| b.midpoint.y.total_cmp(&a.midpoint.y)),
            Side::South => ports.sort_by(|a, b| a.midpoint.x.total_cmp(&b.midpoint.x)),
        }
        ordered.append(ports);
    }
    for (i, port) in ordered.iter_mut().enumerate() {
        port.name = ArcStr::from(format!("{prefix}{i}"));
    }
    ordered
}

fn reinsert(component: &mut Component, ports: impl IntoIterator<Item = Port>) {
    let mut map = IndexMap::new();
    for port in ports {
        map.insert(port.name.clone(), port);
    }
    component.set_ports(map);
}

/// Renames every port of `component` by the side it faces (`E0`, `N0`,
/// `W1`, ...), regardless of port type.
pub fn rename_ports_by_orientation(component: &mut Component) {
    let ports: Vec<Port> = component.take_ports().into_values().collect();
    let renamed = rename_facing_side(ports, "");
    reinsert(component, renamed);
}

/// Renames every port of `component` by its type's convention: optical
/// ports by facing side, electrical port groups counterclockwise with a
/// `E_`/`H_`/`SC_` prefix.
pub fn auto_rename_ports(component: &mut Component) {
    let ports: Vec<Port> = component.take_ports().into_values().collect();

    let mut groups: IndexMap<PortType, Vec<Port>> = IndexMap::new();
    for port in ports {
        groups.entry(port.port_type).or_default().push(port);
    }

    let mut renamed = Vec::new();
    for (port_type, group) in groups {
        renamed.extend(match port_type {
            PortType::Optical => rename_facing_side(group, ""),
            PortType::Dc => rename_counter_clockwise(group, "E_"),
            PortType::Heater => rename_counter_clockwise(group, "H_"),
            PortType::Superconducting => rename_counter_clockwise(group, "SC_"),
        });
    }
    reinsert(component, renamed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layers;

    #[test]
    fn side_classification_is_mod_360() {
        assert_eq!(Side::of(0.0), Side::East);
        assert_eq!(Side::of(45.0), Side::East);
        assert_eq!(Side::of(46.0), Side::North);
        assert_eq!(Side::of(90.0), Side::North);
        assert_eq!(Side::of(135.0), Side::North);
        assert_eq!(Side::of(180.0), Side::West);
        assert_eq!(Side::of(225.0), Side::West);
        assert_eq!(Side::of(270.0), Side::South);
        assert_eq!(Side::of(314.9), Side::South);
        assert_eq!(Side::of(315.0), Side::East);
        assert_eq!(Side::of(359.0), Side::East);
        assert_eq!(Side::of(360.0), Side::East);
        assert_eq!(Side::of(-90.0), Side::South);
        assert_eq!(Side::of(450.0), Side::North);
    }

    fn component_with_ports(ports: Vec<Port>) -> Component {
        let mut c = Component::new("c");
        for port in ports {
            c.add_port(port).unwrap();
        }
        c
    }

    #[test]
    fn rename_by_orientation_names_each_side() {
        let wg = Layers::default().wg;
        let mut c = component_with_ports(vec![
            Port::new("a", (10.0, 0.0), 0.5, 0.0, wg),
            Port::new("b", (10.0, 2.0), 0.5, 0.0, wg),
            Port::new("c", (0.0, 1.0), 0.5, 180.0, wg),
            Port::new("d", (5.0, 3.0), 0.5, 90.0, wg),
        ]);
        rename_ports_by_orientation(&mut c);
        // East ports sorted bottom to top.
        assert_eq!(c.port("E0").midpoint.y, 0.0);
        assert_eq!(c.port("E1").midpoint.y, 2.0);
        assert!(c.try_port("W0").is_some());
        assert!(c.try_port("N0").is_some());
        assert_eq!(c.num_ports(), 4);
    }

    #[test]
    fn auto_rename_numbers_electrical_ports_counter_clockwise() {
        let layers = Layers::default();
        let mut c = component_with_ports(vec![
            Port::new("p1", (5.0, 3.0), 10.0, 90.0, layers.porte).with_type(PortType::Dc),
            Port::new("p2", (0.0, 1.0), 10.0, 180.0, layers.porte).with_type(PortType::Dc),
            Port::new("p3", (10.0, 1.0), 10.0, 0.0, layers.porte).with_type(PortType::Dc),
            Port::new("o1", (0.0, 0.0), 0.5, 180.0, layers.wg),
        ]);
        auto_rename_ports(&mut c);
        // Counterclockwise from east: east, north, west.
        assert_eq!(c.port("E_0").midpoint.x, 10.0);
        assert_eq!(c.port("E_1").midpoint.y, 3.0);
        assert_eq!(c.port("E_2").midpoint.x, 0.0);
        // The optical port uses the facing-side scheme.
        assert!(c.try_port("W0").is_some());
        assert_eq!(c.num_ports(), 4);
    }
}
