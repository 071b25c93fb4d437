use crate::model::geom::{Point, Rotation};
use crate::model::types::Color;
use std::collections::HashMap;
use std::fmt;

/// Index of a node inside its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Transform {
        translation: Option<Point>,
        rotation: Option<Rotation>,
        /// Uniform scale factor.
        scale: Option<f64>,
    },
    Shape,
    Appearance,
    Material {
        diffuse_color: Color,
        transparency: f64,
    },
    Sphere {
        radius: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
    },
    Text {
        string: String,
    },
    FontStyle {
        family: &'static str,
        justify: &'static str,
        size: f64,
    },
    Viewpoint {
        position: Point,
        description: String,
    },
    TimeSensor {
        cycle_interval: f64,
        looping: bool,
    },
    PositionInterpolator {
        key: Vec<f64>,
        key_value: Vec<Point>,
    },
    OrientationInterpolator {
        key: Vec<f64>,
        key_value: Vec<Rotation>,
    },
    ScalarInterpolator {
        key: Vec<f64>,
        key_value: Vec<f64>,
    },
    /// Reference to a node defined earlier.
    Use(NodeId),
}

impl NodeKind {
    /// X3D element name. A `Use` has none of its own.
    pub fn element(&self) -> Option<&'static str> {
        Some(match self {
            NodeKind::Group => "Group",
            NodeKind::Transform { .. } => "Transform",
            NodeKind::Shape => "Shape",
            NodeKind::Appearance => "Appearance",
            NodeKind::Material { .. } => "Material",
            NodeKind::Sphere { .. } => "Sphere",
            NodeKind::Cylinder { .. } => "Cylinder",
            NodeKind::Text { .. } => "Text",
            NodeKind::FontStyle { .. } => "FontStyle",
            NodeKind::Viewpoint { .. } => "Viewpoint",
            NodeKind::TimeSensor { .. } => "TimeSensor",
            NodeKind::PositionInterpolator { .. } => "PositionInterpolator",
            NodeKind::OrientationInterpolator { .. } => "OrientationInterpolator",
            NodeKind::ScalarInterpolator { .. } => "ScalarInterpolator",
            NodeKind::Use(_) => return None,
        })
    }

    pub fn is_interpolator(&self) -> bool {
        matches!(
            self,
            NodeKind::PositionInterpolator { .. }
                | NodeKind::OrientationInterpolator { .. }
                | NodeKind::ScalarInterpolator { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Reusable name of this node.
    pub def: Option<String>,
    /// Style class, used by client-side display switching.
    pub class: Option<String>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            def: None,
            class: None,
            children: Vec::new(),
        }
    }

    pub fn def(mut self, name: impl Into<String>) -> Self {
        self.def = Some(name.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn child(mut self, id: NodeId) -> Self {
        self.children.push(id);
        self
    }
}

/// Event fields connected by a [`Route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FractionChanged,
    SetFraction,
    ValueChanged,
    Translation,
    Rotation,
    Transparency,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FractionChanged => "fraction_changed",
            Field::SetFraction => "set_fraction",
            Field::ValueChanged => "value_changed",
            Field::Translation => "translation",
            Field::Rotation => "rotation",
            Field::Transparency => "transparency",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event connection between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub from_node: String,
    pub from_field: Field,
    pub to_node: String,
    pub to_field: Field,
}

/// A generated scene: an arena of nodes, the ordered top-level nodes, a
/// lookup table of every named node, and the routes between them.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    defs: HashMap<String, NodeId>,
    routes: Vec<Route>,
}

impl Scene {
    /// Adds a node to the arena, registering its name if it has one.
    ///
    /// Names are never rebound: a second node with a taken name keeps the
    /// name as an attribute but the table still points at the first.
    pub(crate) fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(def) = &node.def {
            self.defs.entry(def.clone()).or_insert(id);
        }
        self.nodes.push(node);
        id
    }

    pub(crate) fn add_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    pub(crate) fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn lookup(&self, def: &str) -> Option<NodeId> {
        self.defs.get(def).copied()
    }

    pub fn get(&self, def: &str) -> Option<&Node> {
        self.lookup(def).map(|id| self.node(id))
    }

    pub fn defs(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.defs.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_animated(&self) -> bool {
        !self.routes.is_empty()
    }

    /// Follows `Use` references to the node that defines the content.
    pub fn resolve(&self, id: NodeId) -> &Node {
        match self.node(id).kind {
            NodeKind::Use(target) => self.resolve(target),
            _ => self.node(id),
        }
    }
}
