//! Scene generation: molecules and reactions as X3D node trees.
//!
//! [`render`] is the entry point. Molecules become a static scene; reactions
//! show their reactants with interpolators that morph them into the products.
//! Repeated content is named once and referenced afterwards, so a scene with a
//! hundred carbons holds one carbon sphere definition.

mod animation;
mod builder;
mod error;
mod node;
mod style;

pub use animation::{
    Animator, FADE_IN, FADE_OUT, MIN_DISPLACEMENT, Schedule, TIME_SENSOR, product_def,
    render_reaction,
};
pub use builder::{ATOM_PREFIX, BondMaterials, LABEL_OFFSET, SceneBuilder, atom_def};
pub use error::Error;
pub use node::{Field, Node, NodeId, NodeKind, Route, Scene};
pub use style::{BOND_RADIUS, DisplayMode, DisplayStyle, THIN_BOND_RADIUS};

use crate::config::Config;
use crate::model::molecule::{Molecule, Structure};
use log::info;

/// Renders a single molecule as a static scene.
pub fn render_molecule(molecule: &Molecule, config: &Config, display: DisplayMode) -> Scene {
    let mut builder = SceneBuilder::new(config, display);
    builder.add_molecule(molecule);
    builder.add_viewpoint(molecule, &molecule.name);
    builder.finish()
}

/// Renders a parsed structure in the given display mode.
pub fn render(structure: &Structure, config: &Config, display: DisplayMode) -> Result<Scene, Error> {
    let scene = match structure {
        Structure::Molecule(molecule) => render_molecule(molecule, config, display),
        Structure::Reaction(reaction) => render_reaction(reaction, config, display)?,
    };
    info!(
        "rendered '{}' in {display} mode: {} nodes, {} routes",
        structure.name(),
        scene.len(),
        scene.routes().len()
    );
    Ok(scene)
}
