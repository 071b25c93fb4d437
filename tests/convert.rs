use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use ctfile_x3d::io::{self, Format};
use ctfile_x3d::scene::{FADE_IN, FADE_OUT, NodeKind, TIME_SENSOR};
use ctfile_x3d::{Config, DisplayMode, Scene, SceneError, Structure, render};

fn data(name: &str) -> BufReader<File> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    BufReader::new(File::open(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display())))
}

fn read(name: &str, format: Format) -> Structure {
    io::read_structure(data(name), format, &Config::default()).unwrap()
}

fn to_x3d(scene: &Scene) -> String {
    let mut out = Vec::new();
    io::write_scene(&mut out, scene, Format::X3d).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn water_molfile_becomes_static_scene() {
    let structure = read("water.mol", Format::Mol);
    let Structure::Molecule(water) = &structure else {
        panic!("expected a molecule");
    };
    assert_eq!(water.atom_count(), 3);
    assert_eq!(water.bond_count(), 2);

    let scene = render(&structure, &Config::default(), DisplayMode::BallsSticks).unwrap();
    assert!(!scene.is_animated());

    let xml = to_x3d(&scene);
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<X3D profile="Immersive" version="3.3">"#));
    assert_eq!(xml.matches(r#"<Group DEF="H""#).count(), 1);
    assert_eq!(xml.matches(r#"<Group USE="H"/>"#).count(), 1);
    assert!(xml.contains(r#"description="water""#));
    assert!(xml.trim_end().ends_with("</X3D>"));
}

#[test]
fn every_display_mode_renders_water() {
    let structure = read("water.mol", Format::Mol);
    for display in DisplayMode::ALL {
        let scene = render(&structure, &Config::default(), display).unwrap();
        let spheres = scene
            .nodes()
            .filter(|(_, node)| matches!(node.kind, NodeKind::Sphere { .. }))
            .count();
        assert_eq!(spheres, 2, "{display}: one sphere per element");
        assert!(scene.get("O").is_some() && scene.get("H").is_some());
    }
}

#[test]
fn hydrogenation_animates_bond_changes() {
    let structure = read("hydrogenation.rxn", Format::Rxn);
    let Structure::Reaction(reaction) = &structure else {
        panic!("expected a reaction");
    };
    assert_eq!(reaction.name, "hydrogenation");
    assert_eq!(reaction.reactants.atom_count(), 4);
    assert_eq!(reaction.products.bond_count(), 3);

    let scene = render(&structure, &Config::default(), DisplayMode::Mixed).unwrap();
    assert!(scene.is_animated());
    assert!(scene.get(TIME_SENSOR).is_some());
    assert!(scene.get(FADE_OUT).is_some(), "H-H breaks and C=C loses its order");
    assert!(scene.get(FADE_IN).is_some(), "C-H bonds form");
    for formed in ["P1-3", "P2-4"] {
        assert!(scene.get(formed).is_some(), "{formed} is drawn hidden");
    }
    assert!(scene.get("P1-2").is_some(), "retyped bond gets a product copy");
    assert!(scene.get("P3-4").is_none(), "broken bonds have no product copy");

    let xml = to_x3d(&scene);
    assert!(xml.contains(r#"<X3D profile="Full" version="3.3">"#));
    assert!(xml.contains(r#"description="hydrogenation""#));
    assert!(xml.contains(r#"<ROUTE fromNode="TimeSensor" fromField="fraction_changed""#));
    assert!(xml.contains(r#"toNode="BondMaterial-3-4" toField="transparency""#));
    assert!(xml.contains(r#"toNode="BondMaterial-P1-3" toField="transparency""#));
}

#[test]
fn unmapped_product_atom_is_reported() {
    let text = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/hydrogenation.rxn"),
    )
    .unwrap();
    // remap the last product hydrogen so reactant atom 4 has no partner
    let last = text.rfind("  4  0  0").unwrap();
    let broken = format!("{}  5{}", &text[..last], &text[last + 3..]);

    let structure =
        io::read_structure(Cursor::new(broken), Format::Rxn, &Config::default()).unwrap();
    let err = render(&structure, &Config::default(), DisplayMode::Mixed).unwrap_err();
    assert_eq!(err, SceneError::Lookup { key: 4 });
}

#[test]
fn truncated_molfile_reports_line() {
    let err = io::read_structure(
        Cursor::new("water\n  ctx3d\n\n  3  2  0  0  0  0            999 V2000\n"),
        Format::Mol,
        &Config::default(),
    )
    .unwrap_err();
    assert_eq!(err.line(), Some(5));
}
