use crate::io::error::Error;
use crate::model::types::Color;
use crate::scene::{Node, NodeId, NodeKind, Scene};
use std::fmt::Display;
use std::io::Write;

pub const X3D_VERSION: &str = "3.3";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const DOCTYPE: &str = r#"<!DOCTYPE X3D PUBLIC "ISO//Web3D//DTD X3D 3.3//EN" "http://www.web3d.org/specifications/x3d-3.3.dtd">"#;
const INDENT: &str = "  ";

/// Writes `scene` as an X3D document.
///
/// Animated scenes declare the `Full` profile, static ones `Immersive`.
pub fn write<W: Write>(mut writer: W, scene: &Scene) -> Result<(), Error> {
    let profile = if scene.is_animated() {
        "Full"
    } else {
        "Immersive"
    };

    writeln!(writer, "{}", XML_DECLARATION)?;
    writeln!(writer, "{}", DOCTYPE)?;
    writeln!(writer, r#"<X3D profile="{}" version="{}">"#, profile, X3D_VERSION)?;
    writeln!(writer, "{}<Scene>", INDENT)?;

    for &id in scene.roots() {
        write_node(&mut writer, scene, id, 2)?;
    }
    for route in scene.routes() {
        writeln!(
            writer,
            r#"{}<ROUTE fromNode="{}" fromField="{}" toNode="{}" toField="{}"/>"#,
            INDENT.repeat(2),
            escape(&route.from_node),
            route.from_field,
            escape(&route.to_node),
            route.to_field
        )?;
    }

    writeln!(writer, "{}</Scene>", INDENT)?;
    writeln!(writer, "</X3D>")?;
    writer.flush()?;
    Ok(())
}

fn write_node<W: Write>(
    writer: &mut W,
    scene: &Scene,
    id: NodeId,
    depth: usize,
) -> Result<(), Error> {
    let indent = INDENT.repeat(depth);
    let node = scene.node(id);

    if let NodeKind::Use(target) = node.kind {
        let element = scene.resolve(target).kind.element().unwrap_or("Group");
        let name = scene.node(target).def.as_deref().unwrap_or_default();
        writeln!(writer, r#"{}<{} USE="{}"/>"#, indent, element, escape(name))?;
        return Ok(());
    }

    let Some(element) = node.kind.element() else {
        return Ok(());
    };
    let attributes = attributes(node);

    write!(writer, "{}<{}", indent, element)?;
    for (name, value) in &attributes {
        write!(writer, r#" {}="{}""#, name, escape(value))?;
    }
    if node.children.is_empty() {
        writeln!(writer, "/>")?;
        return Ok(());
    }
    writeln!(writer, ">")?;
    for &child in &node.children {
        write_node(writer, scene, child, depth + 1)?;
    }
    writeln!(writer, "{}</{}>", indent, element)?;
    Ok(())
}

fn attributes(node: &Node) -> Vec<(&'static str, String)> {
    let mut attrs = Vec::new();
    if let Some(def) = &node.def {
        attrs.push(("DEF", def.clone()));
    }
    if let Some(class) = &node.class {
        attrs.push(("class", class.clone()));
    }

    match &node.kind {
        NodeKind::Transform {
            translation,
            rotation,
            scale,
        } => {
            if let Some(t) = translation {
                attrs.push(("translation", t.to_string()));
            }
            if let Some(r) = rotation {
                attrs.push(("rotation", r.to_string()));
            }
            if let Some(s) = scale {
                attrs.push(("scale", format!("{s} {s} {s}")));
            }
        }
        NodeKind::Material {
            diffuse_color,
            transparency,
        } => {
            attrs.push(("diffuseColor", color(diffuse_color)));
            attrs.push(("transparency", transparency.to_string()));
        }
        NodeKind::Sphere { radius } => attrs.push(("radius", radius.to_string())),
        NodeKind::Cylinder { radius, height } => {
            attrs.push(("radius", radius.to_string()));
            attrs.push(("height", height.to_string()));
        }
        NodeKind::Text { string } => attrs.push(("string", mf_string(string.split('\n')))),
        NodeKind::FontStyle {
            family,
            justify,
            size,
        } => {
            attrs.push(("family", mf_string([*family])));
            attrs.push(("justify", mf_string(justify.split_whitespace())));
            attrs.push(("size", size.to_string()));
        }
        NodeKind::Viewpoint {
            position,
            description,
        } => {
            attrs.push(("position", position.to_string()));
            attrs.push(("description", description.clone()));
        }
        NodeKind::TimeSensor {
            cycle_interval,
            looping,
        } => {
            attrs.push(("cycleInterval", cycle_interval.to_string()));
            attrs.push(("loop", looping.to_string()));
        }
        NodeKind::PositionInterpolator { key, key_value } => {
            attrs.push(("key", join(key, " ")));
            attrs.push(("keyValue", join(key_value, ", ")));
        }
        NodeKind::OrientationInterpolator { key, key_value } => {
            attrs.push(("key", join(key, " ")));
            attrs.push(("keyValue", join(key_value, ", ")));
        }
        NodeKind::ScalarInterpolator { key, key_value } => {
            attrs.push(("key", join(key, " ")));
            attrs.push(("keyValue", join(key_value, " ")));
        }
        NodeKind::Group | NodeKind::Shape | NodeKind::Appearance | NodeKind::Use(_) => {}
    }
    attrs
}

fn color(c: &Color) -> String {
    join(c, " ")
}

fn join<T: Display>(values: &[T], separator: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Quotes each item as an X3D MFString value.
fn mf_string<'s>(items: impl IntoIterator<Item = &'s str>) -> String {
    items
        .into_iter()
        .map(|s| format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::atom::Atom;
    use crate::model::geom::Point;
    use crate::model::molecule::{Bond, Molecule, Reaction};
    use crate::model::types::BondType;
    use crate::scene::{DisplayMode, render_molecule, render_reaction};

    fn to_string(scene: &Scene) -> String {
        let mut out = Vec::new();
        write(&mut out, scene).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn ethene() -> Molecule {
        let mut m = Molecule::new("ethene");
        m.add_atom(Atom::new("C", Point::new(-0.5, 0.0, 0.0), 0)).unwrap();
        m.add_atom(Atom::new("C", Point::new(0.5, 0.0, 0.0), 0)).unwrap();
        m.add_bond(Bond::new(1, 2, BondType::Double).unwrap());
        m
    }

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn mf_string_quotes_each_item() {
        assert_eq!(mf_string(["MIDDLE", "MIDDLE"]), r#""MIDDLE" "MIDDLE""#);
        assert_eq!(mf_string([r#"say "hi""#]), r#""say \"hi\"""#);
    }

    #[test]
    fn static_scene_uses_immersive_profile() {
        let scene = render_molecule(&ethene(), &Config::default(), DisplayMode::Mixed);
        let xml = to_string(&scene);
        let mut lines = xml.lines();
        assert_eq!(lines.next(), Some(XML_DECLARATION));
        assert_eq!(lines.next(), Some(DOCTYPE));
        assert_eq!(lines.next(), Some(r#"<X3D profile="Immersive" version="3.3">"#));
        assert!(xml.trim_end().ends_with("</X3D>"));
        assert!(!xml.contains("<ROUTE"));
    }

    #[test]
    fn repeated_content_is_written_as_use() {
        let scene = render_molecule(&ethene(), &Config::default(), DisplayMode::Mixed);
        let xml = to_string(&scene);
        assert_eq!(xml.matches(r#"<Group DEF="C""#).count(), 1);
        assert_eq!(xml.matches(r#"<Group USE="C"/>"#).count(), 1);
        assert_eq!(xml.matches(r#"<Material DEF="BondMaterial2""#).count(), 1);
        assert_eq!(xml.matches(r#"<Material USE="BondMaterial2"/>"#).count(), 1);
        assert!(xml.contains(r#"<Transform DEF="AAM1" translation="-0.5 0 0">"#));
        assert!(xml.contains(r#"<Transform DEF="1-2" translation="0 0 0" rotation="0 0 -1 1.5707963267948966">"#));
    }

    #[test]
    fn label_fields_are_quoted_and_escaped() {
        let scene = render_molecule(&ethene(), &Config::default(), DisplayMode::Mixed);
        let xml = to_string(&scene);
        assert!(xml.contains(r#"<Text string="&quot;C&quot;">"#));
        assert!(xml.contains(
            r#"family="&quot;SANS&quot;" justify="&quot;MIDDLE&quot; &quot;MIDDLE&quot;" size="0.5""#
        ));
        assert!(xml.contains(r#"scale="1 1 1""#));
        assert!(xml.contains(r#"<Viewpoint position="0 0 10" description="ethene"/>"#));
    }

    #[test]
    fn animated_scene_lists_routes_after_nodes() {
        let mut products = ethene();
        products.translate(crate::model::geom::Vector::along_x(1.0));
        let reaction = Reaction {
            name: "shift & turn".to_string(),
            reactants: ethene(),
            products,
        };
        let scene = render_reaction(&reaction, &Config::default(), DisplayMode::Mixed).unwrap();
        let xml = to_string(&scene);

        assert!(xml.contains(r#"<X3D profile="Full" version="3.3">"#));
        assert!(xml.contains(r#"description="shift &amp; turn""#));
        assert!(xml.contains(
            r#"<TimeSensor DEF="TimeSensor" class="TimeSensor" cycleInterval="5" loop="true"/>"#
        ));
        assert!(xml.contains(
            r#"<PositionInterpolator DEF="translation-AAM1" class="AtomPI" key="0 0.125 0.875 1" keyValue="-0.5 0 0, -0.5 0 0, 0.5 0 0, 0.5 0 0"/>"#
        ));
        assert!(xml.contains(
            r#"<ROUTE fromNode="TimeSensor" fromField="fraction_changed" toNode="translation-AAM1" toField="set_fraction"/>"#
        ));
        assert!(xml.contains(
            r#"<ROUTE fromNode="translation-AAM1" fromField="value_changed" toNode="AAM1" toField="translation"/>"#
        ));

        let last_node = xml.rfind("Interpolator").unwrap();
        let first_route = xml.find("<ROUTE").unwrap();
        assert!(first_route > last_node);
    }

    #[test]
    fn empty_scene_is_still_a_document() {
        let xml = to_string(&Scene::default());
        assert!(xml.contains("<Scene>"));
        assert!(xml.contains("</Scene>"));
    }
}
