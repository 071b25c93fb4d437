//! Morphing a reaction's reactants into its products.
//!
//! The scene shows the reactants. A single looping [`TimeSensor`] drives every
//! interpolator through the same [`Schedule`]: hold the reactants, morph, hold
//! the products. Atoms and retained bonds move; broken bonds fade out, formed
//! bonds fade in, and bonds whose type changes cross-fade into a duplicate
//! drawn with the product type.
//!
//! [`TimeSensor`]: NodeKind::TimeSensor

use super::builder::{BondMaterials, SceneBuilder, atom_def};
use super::error::Error;
use super::node::{Field, Node, NodeKind, Scene};
use super::style::DisplayMode;
use crate::config::Config;
use crate::model::geom::{Point, Rotation};
use crate::model::molecule::{Bond, Molecule, Reaction};
use crate::model::types::BondType;
use log::{debug, warn};
use std::collections::HashSet;

/// Atoms that move less than this are left still.
pub const MIN_DISPLACEMENT: f64 = 0.01;

pub const TIME_SENSOR: &str = "TimeSensor";
pub const FADE_OUT: &str = "FadeOut";
pub const FADE_IN: &str = "FadeIn";

/// Name of the bond drawn in its product form.
pub fn product_def(bond: &Bond) -> String {
    format!("P{}", bond.label())
}

/// Position of the morphing segment within one animation cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub start: f64,
    pub end: f64,
}

impl Schedule {
    /// Centers a morph lasting `active_fraction` of the cycle.
    pub fn new(active_fraction: f64) -> Self {
        let start = (1.0 - active_fraction) / 2.0;
        Self {
            start,
            end: start + active_fraction,
        }
    }

    pub fn keys(&self) -> Vec<f64> {
        vec![0.0, self.start, self.end, 1.0]
    }

    /// Key values holding `from`, then `to`.
    pub fn values<T: Copy>(from: T, to: T) -> Vec<T> {
        vec![from, from, to, to]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondChange {
    Retained,
    Retyped(BondType),
    Broken,
}

fn classify(reactants: &Molecule, products: &Molecule) -> Vec<(Bond, BondChange)> {
    reactants
        .bonds()
        .iter()
        .map(|bond| {
            let change = match products.bond(bond.key()) {
                None => BondChange::Broken,
                Some(product) if product.kind != bond.kind => BondChange::Retyped(product.kind),
                Some(_) => BondChange::Retained,
            };
            (*bond, change)
        })
        .collect()
}

/// Renders the reactants of `reaction` animated into its products.
///
/// Every reactant atom key must also be a product atom key.
pub fn render_reaction(
    reaction: &Reaction,
    config: &Config,
    display: DisplayMode,
) -> Result<Scene, Error> {
    let reactants = &reaction.reactants;
    let products = &reaction.products;

    if let Some(key) = reactants.keys().find(|&key| products.atom(key).is_none()) {
        return Err(Error::Lookup { key });
    }
    if let Some(key) = products.keys().find(|&key| reactants.atom(key).is_none()) {
        return Err(Error::Lookup { key });
    }

    let changes = classify(reactants, products);
    let formed: Vec<Bond> = products
        .bonds()
        .iter()
        .filter(|bond| reactants.bond(bond.key()).is_none())
        .copied()
        .collect();

    let private = changes
        .iter()
        .filter(|(_, change)| *change != BondChange::Retained)
        .map(|(bond, _)| bond.key());
    let mut builder = SceneBuilder::new(config, display).with_private_bonds(private);
    builder.add_molecule(reactants);

    for (bond, change) in &changes {
        let BondChange::Retyped(kind) = *change else {
            continue;
        };
        if let Some((start, end)) = reactants.bond_endpoints(bond) {
            let id = builder.add_bond(
                &product_def(bond),
                kind,
                start,
                end,
                BondMaterials::Private { hidden: true },
            );
            builder.attach(id);
        }
    }
    for bond in &formed {
        if let Some((start, end)) = products.bond_endpoints(bond) {
            let id = builder.add_bond(
                &product_def(bond),
                bond.kind,
                start,
                end,
                BondMaterials::Private { hidden: true },
            );
            builder.attach(id);
        }
    }

    builder.add_viewpoint(reactants, &reaction.name);

    let mut animator = Animator::new(builder);

    let mut moved = HashSet::new();
    for (key, atom) in reactants.atoms() {
        let Some(target) = products.atom(key) else {
            continue;
        };
        let distance = atom.position.distance(target.position);
        if distance > MIN_DISPLACEMENT {
            debug!("atom {key} moves by {distance:.3}");
            animator.move_node(&atom_def(key), atom.position, target.position);
            moved.insert(key);
        }
    }

    for (bond, change) in &changes {
        let label = bond.label();
        let moving = moved.contains(&bond.from()) || moved.contains(&bond.to());
        match change {
            BondChange::Broken => animator.fade(FADE_OUT, &label),
            BondChange::Retained | BondChange::Retyped(_) => {
                if moving {
                    match (reactants.bond_endpoints(bond), products.bond_endpoints(bond)) {
                        (Some(from), Some(to)) => {
                            animator.move_segment(&label, from, to);
                            if matches!(change, BondChange::Retyped(_)) {
                                animator.move_segment(&product_def(bond), from, to);
                            }
                        }
                        _ => warn!("bond {label} has no endpoints to animate"),
                    }
                }
                if matches!(change, BondChange::Retyped(_)) {
                    animator.fade(FADE_OUT, &label);
                    animator.fade(FADE_IN, &product_def(bond));
                }
            }
        }
    }

    for bond in &formed {
        animator.fade(FADE_IN, &product_def(bond));
    }

    Ok(animator.finish())
}

/// Adds interpolators and routes to a scene under construction.
pub struct Animator<'a> {
    builder: SceneBuilder<'a>,
    schedule: Schedule,
    fades: HashSet<&'static str>,
}

impl<'a> Animator<'a> {
    /// Wraps `builder`, adding the shared time sensor.
    pub fn new(mut builder: SceneBuilder<'a>) -> Self {
        let animation = &builder.config().animation;
        let schedule = Schedule::new(animation.active_fraction);
        let sensor = Node::new(NodeKind::TimeSensor {
            cycle_interval: animation.cycle_interval,
            looping: true,
        })
        .def(TIME_SENSOR)
        .class(TIME_SENSOR);
        builder.add_root(sensor);
        Self {
            builder,
            schedule,
            fades: HashSet::new(),
        }
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    fn drive(&mut self, def: String, interpolator: Node, target: &str, field: Field) {
        self.builder.add_root(interpolator.def(def.as_str()));
        self.builder
            .route(TIME_SENSOR, Field::FractionChanged, &def, Field::SetFraction);
        self.builder.route(&def, Field::ValueChanged, target, field);
    }

    /// Moves the transform `target` from `from` to `to`.
    pub fn move_node(&mut self, target: &str, from: Point, to: Point) {
        let def = format!("translation-{target}");
        debug!("adding {def}");
        let interpolator = Node::new(NodeKind::PositionInterpolator {
            key: self.schedule.keys(),
            key_value: Schedule::values(from, to),
        })
        .class("AtomPI");
        self.drive(def, interpolator, target, Field::Translation);
    }

    /// Turns the transform `target` from `from` to `to`.
    pub fn turn_node(&mut self, target: &str, from: Rotation, to: Rotation) {
        let def = format!("rotation-{target}");
        debug!("adding {def}");
        let interpolator = Node::new(NodeKind::OrientationInterpolator {
            key: self.schedule.keys(),
            key_value: Schedule::values(from, to),
        });
        self.drive(def, interpolator, target, Field::Rotation);
    }

    /// Carries the bond transform `target` from one pair of endpoints to
    /// another, moving its midpoint and turning its axis.
    pub fn move_segment(&mut self, target: &str, from: (Point, Point), to: (Point, Point)) {
        self.move_node(
            target,
            Point::midpoint(from.0, from.1),
            Point::midpoint(to.0, to.1),
        );
        let turn = |(start, end): (Point, Point)| {
            Rotation::for_segment(start, end).unwrap_or(Rotation::IDENTITY)
        };
        self.turn_node(target, turn(from), turn(to));
    }

    /// Routes the shared fade `name` ([`FADE_OUT`] or [`FADE_IN`]) into the
    /// private materials of the bond transform `bond`.
    pub fn fade(&mut self, name: &'static str, bond: &str) {
        if self.fades.insert(name) {
            let (from, to) = if name == FADE_IN { (1.0, 0.0) } else { (0.0, 1.0) };
            let interpolator = Node::new(NodeKind::ScalarInterpolator {
                key: self.schedule.keys(),
                key_value: Schedule::values(from, to),
            })
            .def(name);
            self.builder.add_root(interpolator);
            self.builder
                .route(TIME_SENSOR, Field::FractionChanged, name, Field::SetFraction);
        }
        let materials = self.builder.private_materials(bond).to_vec();
        if materials.is_empty() {
            warn!("bond {bond} has no private material to fade");
        }
        for material in materials {
            self.builder
                .route(name, Field::ValueChanged, &material, Field::Transparency);
        }
    }

    pub fn finish(self) -> Scene {
        self.builder.finish()
    }
}
