//! Integration tests for the annotation pipeline over a small circuit
//! hierarchy: a 2x2 interferometer with two waveguide arms, four optical
//! ports, and three DC pads.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use picl::pins::add_pins_to_references;
use picl::prelude::*;

fn straight(length: f64, width: f64, layers: &Layers) -> Component {
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

fn mzi_factory() -> CellFactory {
    CellFactory::new("mzi2x2", "picl::tests::pins", |params| {
        let layers = Layers::default();
        let length = params
            .get("length")
            .and_then(ParamValue::as_f64)
            .unwrap_or(10.0);
        let arm = Arc::new(straight(length, 0.5, &layers));
        let mut c = Component::new("mzi2x2");
        c.add_reference(Reference::new(arm.clone()).at((0.0, 2.0)));
        c.add_reference(Reference::new(arm).at((0.0, -2.0)));
        c.add_port(Port::new("W0", (0.0, 2.0), 0.5, 180.0, layers.wg))?;
        c.add_port(Port::new("W1", (0.0, -2.0), 0.5, 180.0, layers.wg))?;
        c.add_port(Port::new("E0", (length, 2.0), 0.5, 0.0, layers.wg))?;
        c.add_port(Port::new("E1", (length, -2.0), 0.5, 0.0, layers.wg))?;
        for (i, x) in [2.0, 5.0, 8.0].into_iter().enumerate() {
            c.add_port(
                Port::new(format!("pad{i}"), (x, 2.25), 1.0, 90.0, layers.porte)
                    .with_type(PortType::Dc),
            )?;
        }
        Ok(c)
    })
    .with_param("length", Some(10.0.into()))
}

fn build_mzi(cache: &mut CellCache) -> Arc<Component> {
    build_cell(cache, &mzi_factory(), Params::default(), &CellOptions::new()).unwrap()
}

fn labels_on(component: &Component, layer: Layer) -> Vec<&str> {
    component
        .labels()
        .iter()
        .filter(|l| l.layer() == layer)
        .map(|l| l.text().as_str())
        .collect()
}

#[test_log::test]
fn pin_markers_are_counted_per_port_type() {
    let layers = Layers::default();
    let mut cache = CellCache::new();
    let mzi = build_mzi(&mut cache);

    let wrapped = add_pins(&mut cache, &mzi, false, &Decorate::default());
    assert_eq!(wrapped.name().as_str(), "mzi2x2_pins");
    assert_eq!(wrapped.shapes_on(layers.port).count(), 4);
    assert_eq!(wrapped.shapes_on(layers.porte).count(), 3);
    assert_eq!(wrapped.shapes_on(layers.devrec).count(), 1);
}

#[test_log::test]
fn recursive_annotation_covers_inner_references() {
    let layers = Layers::default();
    let mut cache = CellCache::new();
    let mzi = build_mzi(&mut cache);

    let wrapped = add_pins(&mut cache, &mzi, true, &Decorate::default());
    // 4 top-level optical ports plus 2 ports on each of the 2 arms.
    assert_eq!(wrapped.shapes_on(layers.port).count(), 8);
    // DC pads only exist at the top level.
    assert_eq!(wrapped.shapes_on(layers.porte).count(), 3);
    // One outline per annotated reference.
    assert_eq!(wrapped.shapes_on(layers.devrec).count(), 3);
}

#[test_log::test]
fn outline_matches_bbox_corners_at_zero_padding() {
    let layers = Layers::default();
    let mut cache = CellCache::new();
    let mzi = build_mzi(&mut cache);

    let wrapped = add_pins(&mut cache, &mzi, false, &Decorate::default());
    let outline = wrapped.shapes_on(layers.devrec).next().unwrap();
    let expected = mzi.bbox().unwrap().corners();
    assert_eq!(outline.polygon().len(), 4);
    for (got, want) in outline.polygon().points().iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
    }
}

#[test_log::test]
fn outline_padding_expands_per_side() {
    let layers = Layers::default();
    let mut cache = CellCache::new();
    let mzi = build_mzi(&mut cache);

    let decorate = Decorate {
        padding: Sides {
            top: 1.0,
            bottom: 2.0,
            left: 0.5,
            right: 0.25,
        },
        ..Decorate::default()
    };
    let wrapped = add_pins(&mut cache, &mzi, false, &decorate);
    let outline = wrapped.shapes_on(layers.devrec).next().unwrap();
    let got = outline.polygon().bbox().unwrap();
    let want = mzi.bbox().unwrap().expand(decorate.padding);
    assert_abs_diff_eq!(got.left(), want.left(), epsilon = 1e-9);
    assert_abs_diff_eq!(got.right(), want.right(), epsilon = 1e-9);
    assert_abs_diff_eq!(got.bot(), want.bot(), epsilon = 1e-9);
    assert_abs_diff_eq!(got.top(), want.top(), epsilon = 1e-9);
}

#[test_log::test]
fn wrapping_never_mutates_the_original() {
    let mut cache = CellCache::new();
    let mzi = build_mzi(&mut cache);
    let snapshot = (*mzi).clone();

    let _wrapped = add_pins(&mut cache, &mzi, true, &Decorate::default());
    assert_eq!(*mzi, snapshot);
}

#[test_log::test]
fn settings_and_instance_labels_are_stamped() {
    let layers = Layers::default();
    let mut cache = CellCache::new();
    let mzi = build_mzi(&mut cache);

    let wrapped = add_pins(&mut cache, &mzi, false, &Decorate::default());

    let settings = labels_on(&wrapped, layers.label_settings);
    assert_eq!(settings.len(), 1);
    let body = settings[0].strip_prefix("settings=").unwrap();
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert!(json.get("length").is_some());

    let instance = labels_on(&wrapped, layers.label_instance);
    assert_eq!(instance, vec!["mzi2x2,0,0"]);

    // One name label per port, on the port's marker layer.
    assert_eq!(labels_on(&wrapped, layers.port).len(), 4);
    assert_eq!(labels_on(&wrapped, layers.porte).len(), 3);
}

#[test_log::test]
fn steps_are_individually_toggleable() {
    let layers = Layers::default();
    let mut cache = CellCache::new();
    let mzi = build_mzi(&mut cache);

    let decorate = Decorate {
        pins: false,
        settings_label: false,
        instance_label: false,
        ..Decorate::default()
    };
    let wrapped = add_pins(&mut cache, &mzi, false, &decorate);
    assert_eq!(wrapped.shapes_on(layers.port).count(), 0);
    assert_eq!(wrapped.shapes_on(layers.devrec).count(), 1);
    assert!(wrapped.labels().is_empty());
}

#[test_log::test]
fn portless_component_gets_a_settings_label_but_no_pins() {
    let layers = Layers::default();
    let mut cache = CellCache::new();
    let empty = Arc::new(Component::new("spacer"));

    let wrapped = add_pins(&mut cache, &empty, false, &Decorate::default());
    assert_eq!(wrapped.shapes_on(layers.port).count(), 0);
    assert_eq!(wrapped.shapes_on(layers.porte).count(), 0);
    // No geometry, no outline.
    assert_eq!(wrapped.shapes_on(layers.devrec).count(), 0);
    // The settings label is present even with nothing recorded.
    let settings = labels_on(&wrapped, layers.label_settings);
    assert_eq!(settings, vec!["settings={}"]);
}

#[test_log::test]
fn annotating_in_place_covers_every_reference() {
    let layers = Layers::default();
    let mut cache = CellCache::new();
    let mzi = build_mzi(&mut cache);
    let mut circuit = (*mzi).clone();

    add_pins_to_references(&mut circuit, None, &Decorate::default());
    // Two arm references, each with two optical ports.
    assert_eq!(circuit.shapes_on(layers.port).count(), 4);
    assert_eq!(circuit.shapes_on(layers.devrec).count(), 2);
}
