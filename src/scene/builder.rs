use super::node::{Field, Node, NodeId, NodeKind, Route, Scene};
use super::style::{DisplayMode, DisplayStyle};
use crate::config::Config;
use crate::model::atom::Atom;
use crate::model::geom::{Point, Rotation, Vector};
use crate::model::molecule::Molecule;
use crate::model::types::BondType;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// Prefix of per-atom transform names, followed by the atom key.
pub const ATOM_PREFIX: &str = "AAM";
/// Offset of an element label from its atom center.
pub const LABEL_OFFSET: Point = Point::new(0.0, -0.45, 0.0);
/// Height of the viewpoint above the molecule's middle.
pub const VIEWPOINT_DISTANCE: f64 = 10.0;

const LABEL_FONT_FAMILY: &str = "SANS";
const LABEL_JUSTIFY: &str = "MIDDLE MIDDLE";

/// Name of the transform that positions the atom with `key`.
pub fn atom_def(key: u32) -> String {
    format!("{ATOM_PREFIX}{key}")
}

/// How a bond's cylinders get their materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondMaterials {
    /// One material per bond type, defined once and reused.
    Shared,
    /// Materials owned by this bond so their transparency can be animated.
    /// `hidden` bonds start fully transparent.
    Private { hidden: bool },
}

/// Renders molecules into a [`Scene`].
///
/// The builder owns the scene under construction, including its table of
/// named nodes: the first atom of an element defines that element's group and
/// later atoms reuse it, and bond materials are shared per bond type the same
/// way. Names are only ever added, and the table leaves with the scene in
/// [`finish`](Self::finish).
pub struct SceneBuilder<'a> {
    config: &'a Config,
    style: DisplayStyle,
    scene: Scene,
    private_bonds: HashSet<(u32, u32)>,
    bond_materials: HashMap<String, Vec<String>>,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(config: &'a Config, display: DisplayMode) -> Self {
        Self {
            config,
            style: display.style(config),
            scene: Scene::default(),
            private_bonds: HashSet::new(),
            bond_materials: HashMap::new(),
        }
    }

    /// Bonds (by endpoint pair) that get private materials when rendered by
    /// [`add_molecule`](Self::add_molecule).
    pub fn with_private_bonds(mut self, keys: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.private_bonds.extend(keys);
        self
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn style(&self) -> &DisplayStyle {
        &self.style
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Adds every atom, then every bond, as top-level nodes.
    pub fn add_molecule(&mut self, molecule: &Molecule) {
        for (key, atom) in molecule.atoms() {
            let id = self.add_atom(key, atom);
            self.scene.add_root(id);
        }
        for bond in molecule.bonds() {
            let Some((start, end)) = molecule.bond_endpoints(bond) else {
                warn!("skipping bond {bond} of '{}': unknown atom", molecule.name);
                continue;
            };
            let materials = if self.private_bonds.contains(&bond.key()) {
                BondMaterials::Private { hidden: false }
            } else {
                BondMaterials::Shared
            };
            let id = self.add_bond(&bond.label(), bond.kind, start, end, materials);
            self.scene.add_root(id);
        }
        debug!(
            "rendered '{}': {} atoms, {} bonds, {} nodes",
            molecule.name,
            molecule.atom_count(),
            molecule.bond_count(),
            self.scene.len()
        );
    }

    /// Adds the camera above the middle of `molecule`.
    pub fn add_viewpoint(&mut self, molecule: &Molecule, description: &str) {
        let mid = molecule.middle();
        let id = self.scene.add(Node::new(NodeKind::Viewpoint {
            position: Point::new(mid.x, mid.y, VIEWPOINT_DISTANCE),
            description: description.to_string(),
        }));
        self.scene.add_root(id);
    }

    /// Builds the positioned node of one atom (not attached to the roots).
    pub fn add_atom(&mut self, key: u32, atom: &Atom) -> NodeId {
        let appearance = match self.scene.lookup(&atom.symbol) {
            Some(group) => self.scene.add(Node::new(NodeKind::Use(group))),
            None => self.element_group(atom),
        };
        self.scene.add(
            Node::new(NodeKind::Transform {
                translation: Some(atom.position),
                rotation: None,
                scale: None,
            })
            .def(atom_def(key))
            .child(appearance),
        )
    }

    fn element_group(&mut self, atom: &Atom) -> NodeId {
        let element = atom.element();
        let style = self.style;

        let sphere = self.shape(
            NodeKind::Material {
                diffuse_color: element.sphere_color(),
                transparency: style.atom_transparency,
            },
            "AtomSphereMaterial",
            Node::new(NodeKind::Sphere {
                radius: element.radius(),
            }),
        );
        let sphere = self.scene.add(
            Node::new(NodeKind::Transform {
                translation: None,
                rotation: None,
                scale: Some(style.atom_scale),
            })
            .class("AtomSphereTransform")
            .child(sphere),
        );

        let font = self.scene.add(
            Node::new(NodeKind::FontStyle {
                family: LABEL_FONT_FAMILY,
                justify: LABEL_JUSTIFY,
                size: self.config.atom.symbol_size,
            })
            .class("AtomLabelFontStyle"),
        );
        let label = self.shape(
            NodeKind::Material {
                diffuse_color: element.label_color(),
                transparency: style.label_transparency,
            },
            "AtomLabelMaterial",
            Node::new(NodeKind::Text {
                string: atom.symbol.clone(),
            })
            .child(font),
        );
        let label = self.scene.add(
            Node::new(NodeKind::Transform {
                translation: Some(LABEL_OFFSET),
                rotation: None,
                scale: None,
            })
            .class("AtomLabelTransform")
            .child(label),
        );

        self.scene.add(
            Node::new(NodeKind::Group)
                .def(atom.symbol.clone())
                .child(sphere)
                .child(label),
        )
    }

    fn shape(&mut self, material: NodeKind, class: &str, geometry: Node) -> NodeId {
        let material = self.scene.add(Node::new(material).class(class));
        let appearance = self
            .scene
            .add(Node::new(NodeKind::Appearance).child(material));
        let geometry = self.scene.add(geometry);
        self.scene.add(
            Node::new(NodeKind::Shape)
                .child(appearance)
                .child(geometry),
        )
    }

    /// Builds a bond transform named `def` spanning `start`→`end` (not
    /// attached to the roots).
    pub fn add_bond(
        &mut self,
        def: &str,
        kind: BondType,
        start: Point,
        end: Point,
        materials: BondMaterials,
    ) -> NodeId {
        let length = start.distance(end);
        let d = self.config.bond.distance;
        let offsets: &[f64] = match kind {
            BondType::Double | BondType::Aromatic => &[-d, d],
            BondType::Triple => &[-d, 0.0, d],
            _ => &[0.0],
        };

        let mut group = Node::new(NodeKind::Group);
        for (i, &offset) in offsets.iter().enumerate() {
            let boosted = kind == BondType::Aromatic && i == 1;
            let cylinder = self.bond_cylinder(def, kind, boosted, length, materials);
            let placed = self.scene.add(
                Node::new(NodeKind::Transform {
                    translation: Some(Point::ORIGIN.moved(Vector::along_x(offset))),
                    rotation: None,
                    scale: Some(self.style.bond_scale),
                })
                .class("BondCylinderTransform")
                .child(cylinder),
            );
            group = group.child(placed);
        }
        let group = self.scene.add(group);

        self.scene.add(
            Node::new(NodeKind::Transform {
                translation: Some(Point::midpoint(start, end)),
                rotation: Rotation::for_segment(start, end),
                scale: None,
            })
            .def(def)
            .child(group),
        )
    }

    fn bond_cylinder(
        &mut self,
        def: &str,
        kind: BondType,
        boosted: bool,
        length: f64,
        materials: BondMaterials,
    ) -> NodeId {
        let material = self.bond_material(def, kind, boosted, materials);
        let appearance = self
            .scene
            .add(Node::new(NodeKind::Appearance).child(material));
        let cylinder = self.scene.add(
            Node::new(NodeKind::Cylinder {
                radius: self.style.bond_radius,
                height: length,
            })
            .class("BondCylinder"),
        );
        self.scene.add(
            Node::new(NodeKind::Shape)
                .child(appearance)
                .child(cylinder),
        )
    }

    fn bond_material(
        &mut self,
        def: &str,
        kind: BondType,
        boosted: bool,
        materials: BondMaterials,
    ) -> NodeId {
        let suffix = if boosted { "Boosted" } else { "" };
        let (name, hidden) = match materials {
            BondMaterials::Shared => (format!("BondMaterial{}{suffix}", kind.code()), false),
            BondMaterials::Private { hidden } => (format!("BondMaterial-{def}{suffix}"), hidden),
        };
        if let Some(existing) = self.scene.lookup(&name) {
            return self.scene.add(Node::new(NodeKind::Use(existing)));
        }

        let mut transparency = if hidden {
            1.0
        } else {
            self.style.bond_transparency
        };
        if boosted {
            transparency += (1.0 - transparency) / 1.5;
        }
        if matches!(materials, BondMaterials::Private { .. }) {
            self.bond_materials
                .entry(def.to_string())
                .or_default()
                .push(name.clone());
        }
        self.scene.add(
            Node::new(NodeKind::Material {
                diffuse_color: self.config.bond.colors.for_type(kind),
                transparency,
            })
            .def(name)
            .class(format!("BondMaterial BondType{}", kind.code())),
        )
    }

    /// Names of the private materials of the bond transform `def`.
    pub fn private_materials(&self, def: &str) -> &[String] {
        self.bond_materials.get(def).map_or(&[], Vec::as_slice)
    }

    /// Appends an already built node to the top level.
    pub fn attach(&mut self, id: NodeId) {
        self.scene.add_root(id);
    }

    pub(crate) fn add_root(&mut self, node: Node) -> NodeId {
        let id = self.scene.add(node);
        self.scene.add_root(id);
        id
    }

    pub(crate) fn route(&mut self, from: &str, from_field: Field, to: &str, to_field: Field) {
        self.scene.add_route(Route {
            from_node: from.to_string(),
            from_field,
            to_node: to.to_string(),
            to_field,
        });
    }

    pub fn finish(self) -> Scene {
        self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::molecule::Bond;
    use crate::model::types::Element;

    fn molecule(atoms: &[(&str, f64, f64)], bonds: &[(u32, u32, BondType)]) -> Molecule {
        let mut m = Molecule::new("test");
        for &(symbol, x, y) in atoms {
            m.add_atom(Atom::new(symbol, Point::new(x, y, 0.0), 0)).unwrap();
        }
        for &(a, b, kind) in bonds {
            m.add_bond(Bond::new(a, b, kind).unwrap());
        }
        m
    }

    fn render(m: &Molecule, display: DisplayMode) -> Scene {
        let config = Config::default();
        let mut builder = SceneBuilder::new(&config, display);
        builder.add_molecule(m);
        builder.add_viewpoint(m, &m.name);
        builder.finish()
    }

    fn count(scene: &Scene, pred: impl Fn(&Node) -> bool) -> usize {
        scene.nodes().filter(|(_, n)| pred(n)).count()
    }

    fn class_is(node: &Node, class: &str) -> bool {
        node.class.as_deref() == Some(class)
    }

    #[test]
    fn same_element_atoms_share_one_definition() {
        let m = molecule(&[("C", 0.0, 0.0), ("C", 1.5, 0.0)], &[]);
        let scene = render(&m, DisplayMode::Mixed);

        assert_eq!(count(&scene, |n| class_is(n, "AtomSphereMaterial")), 1);
        assert_eq!(count(&scene, |n| matches!(n.kind, NodeKind::Sphere { .. })), 1);
        let group = scene.lookup("C").unwrap();
        assert_eq!(
            count(&scene, |n| n.kind == NodeKind::Use(group)),
            1,
            "second atom references the group"
        );

        let first = scene.get("AAM1").unwrap();
        let second = scene.get("AAM2").unwrap();
        assert_eq!(first.children, vec![group]);
        assert_eq!(scene.resolve(second.children[0]).def.as_deref(), Some("C"));
    }

    #[test]
    fn distinct_elements_get_their_own_style() {
        let m = molecule(&[("C", 0.0, 0.0), ("O", 1.0, 0.0), ("Xx", 2.0, 0.0)], &[]);
        let scene = render(&m, DisplayMode::Mixed);
        assert_eq!(count(&scene, |n| class_is(n, "AtomSphereMaterial")), 3);

        let other_radius = scene
            .nodes()
            .find_map(|(_, n)| match n.kind {
                NodeKind::Sphere { radius } if radius == Element::Other.radius() => Some(radius),
                _ => None,
            });
        assert!(other_radius.is_some());
    }

    #[test]
    fn atom_transform_is_positioned() {
        let m = molecule(&[("N", 0.5, -1.0)], &[]);
        let scene = render(&m, DisplayMode::Sticks);
        match &scene.get("AAM1").unwrap().kind {
            NodeKind::Transform { translation, .. } => {
                assert_eq!(*translation, Some(Point::new(0.5, -1.0, 0.0)))
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn display_mode_controls_sphere_material() {
        let m = molecule(&[("C", 0.0, 0.0)], &[]);
        let scene = render(&m, DisplayMode::Wireframe);
        let material = scene
            .nodes()
            .find(|(_, n)| class_is(n, "AtomSphereMaterial"))
            .map(|(_, n)| n.kind.clone())
            .unwrap();
        assert_eq!(
            material,
            NodeKind::Material {
                diffuse_color: [0.2, 0.2, 0.2],
                transparency: 1.0,
            }
        );
    }

    #[test]
    fn bond_is_placed_at_midpoint_and_rotated() {
        let m = molecule(&[("C", 0.0, 0.0), ("O", 2.0, 0.0)], &[(1, 2, BondType::Single)]);
        let scene = render(&m, DisplayMode::Mixed);
        let NodeKind::Transform {
            translation,
            rotation,
            ..
        } = &scene.get("1-2").unwrap().kind
        else {
            panic!("bond is not a transform");
        };
        assert_eq!(*translation, Some(Point::new(1.0, 0.0, 0.0)));
        let rotation = rotation.unwrap();
        assert!((rotation.angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let height = scene.nodes().find_map(|(_, n)| match n.kind {
            NodeKind::Cylinder { height, .. } => Some(height),
            _ => None,
        });
        assert_eq!(height, Some(2.0));
    }

    #[test]
    fn vertical_bond_has_no_rotation() {
        let m = molecule(&[("C", 0.0, 0.0), ("C", 0.0, 1.0)], &[(1, 2, BondType::Single)]);
        let scene = render(&m, DisplayMode::Mixed);
        let NodeKind::Transform { rotation, .. } = &scene.get("1-2").unwrap().kind else {
            panic!("bond is not a transform");
        };
        assert!(rotation.is_none());
    }

    #[test]
    fn multiple_bonds_use_parallel_cylinders() {
        let m = molecule(
            &[("C", 0.0, 0.0), ("C", 1.0, 0.0), ("C", 2.0, 0.0), ("C", 3.0, 0.0)],
            &[
                (1, 2, BondType::Double),
                (2, 3, BondType::Triple),
                (3, 4, BondType::Single),
            ],
        );
        let scene = render(&m, DisplayMode::Mixed);
        let cylinders_of = |def: &str| {
            let group = scene.get(def).unwrap().children[0];
            scene.node(group).children.len()
        };
        assert_eq!(cylinders_of("1-2"), 2);
        assert_eq!(cylinders_of("2-3"), 3);
        assert_eq!(cylinders_of("3-4"), 1);

        let group = scene.get("1-2").unwrap().children[0];
        let offsets: Vec<_> = scene
            .node(group)
            .children
            .iter()
            .map(|&id| match scene.node(id).kind {
                NodeKind::Transform { translation, .. } => translation.unwrap().x,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(offsets, vec![-0.1, 0.1]);
    }

    #[test]
    fn bond_materials_are_shared_per_type() {
        let m = molecule(
            &[("C", 0.0, 0.0), ("C", 1.0, 0.0), ("C", 2.0, 0.0), ("C", 3.0, 0.0)],
            &[
                (1, 2, BondType::Single),
                (2, 3, BondType::Single),
                (3, 4, BondType::Double),
            ],
        );
        let scene = render(&m, DisplayMode::Mixed);
        let defined = count(&scene, |n| matches!(n.kind, NodeKind::Material { .. }) && n.def.as_deref().is_some_and(|d| d.starts_with("BondMaterial")));
        assert_eq!(defined, 2, "one material for singles, one for doubles");
        let single = scene.lookup("BondMaterial1").unwrap();
        let double = scene.lookup("BondMaterial2").unwrap();
        assert_eq!(count(&scene, |n| n.kind == NodeKind::Use(single)), 1);
        assert_eq!(count(&scene, |n| n.kind == NodeKind::Use(double)), 1);
        assert_eq!(
            scene.node(single).class.as_deref(),
            Some("BondMaterial BondType1")
        );
    }

    #[test]
    fn aromatic_second_cylinder_is_more_transparent() {
        let config = Config::default();
        let mut builder = SceneBuilder::new(&config, DisplayMode::Sticks);
        builder.add_bond(
            "1-2",
            BondType::Aromatic,
            Point::ORIGIN,
            Point::new(1.0, 0.0, 0.0),
            BondMaterials::Shared,
        );
        let scene = builder.finish();
        let transparency = |def: &str| match scene.get(def).unwrap().kind {
            NodeKind::Material { transparency, diffuse_color } => {
                assert_eq!(diffuse_color, [1.0, 0.75, 1.0]);
                transparency
            }
            _ => f64::NAN,
        };
        assert_eq!(transparency("BondMaterial4"), 0.0);
        assert!((transparency("BondMaterial4Boosted") - 1.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn private_materials_are_named_after_the_bond() {
        let m = molecule(
            &[("C", 0.0, 0.0), ("C", 1.0, 0.0), ("C", 2.0, 0.0)],
            &[(1, 2, BondType::Double), (2, 3, BondType::Double)],
        );
        let config = Config::default();
        let mut builder = SceneBuilder::new(&config, DisplayMode::Mixed).with_private_bonds([(1, 2)]);
        builder.add_molecule(&m);
        assert_eq!(builder.private_materials("1-2"), ["BondMaterial-1-2".to_string()]);
        assert!(builder.private_materials("2-3").is_empty());

        let scene = builder.finish();
        let private = scene.lookup("BondMaterial-1-2").unwrap();
        assert_eq!(count(&scene, |n| n.kind == NodeKind::Use(private)), 1);
        assert!(scene.lookup("BondMaterial2").is_some());
    }

    #[test]
    fn hidden_private_bond_starts_transparent() {
        let config = Config::default();
        let mut builder = SceneBuilder::new(&config, DisplayMode::Mixed);
        builder.add_bond(
            "P1-2",
            BondType::Single,
            Point::ORIGIN,
            Point::new(0.0, 1.0, 0.0),
            BondMaterials::Private { hidden: true },
        );
        let scene = builder.finish();
        match scene.get("BondMaterial-P1-2").unwrap().kind {
            NodeKind::Material { transparency, .. } => assert_eq!(transparency, 1.0),
            _ => panic!("not a material"),
        }
    }

    #[test]
    fn viewpoint_sits_above_middle_with_name() {
        let m = molecule(&[("C", -1.0, 2.0), ("C", 3.0, 4.0)], &[]);
        let scene = render(&m, DisplayMode::Mixed);
        let last = *scene.roots().last().unwrap();
        assert_eq!(
            scene.node(last).kind,
            NodeKind::Viewpoint {
                position: Point::new(1.0, 3.0, VIEWPOINT_DISTANCE),
                description: "test".to_string(),
            }
        );
        assert_eq!(count(&scene, |n| matches!(n.kind, NodeKind::Viewpoint { .. })), 1);
    }

    #[test]
    fn label_uses_configured_font_size() {
        let m = molecule(&[("S", 0.0, 0.0)], &[]);
        let config = Config {
            atom: crate::config::AtomConfig {
                symbol_size: 0.8,
                ..Default::default()
            },
            ..Config::default()
        };
        let mut builder = SceneBuilder::new(&config, DisplayMode::Wireframe);
        builder.add_molecule(&m);
        let scene = builder.finish();
        let font = scene
            .nodes()
            .find(|(_, n)| class_is(n, "AtomLabelFontStyle"))
            .map(|(_, n)| n.kind.clone());
        assert_eq!(
            font,
            Some(NodeKind::FontStyle {
                family: "SANS",
                justify: "MIDDLE MIDDLE",
                size: 0.8,
            })
        );
    }
}
