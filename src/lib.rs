//! A pure Rust library that turns MDL CTFiles into X3D scenes.
//! Molecules become static ball-and-stick models; reactions become looping
//! animations that morph the reactants into the products.
//!
//! # Features
//!
//! - **CTFile parsing** — Column-exact V2000 molfile and rxnfile readers with
//!   line- and column-precise error reporting
//! - **Scene generation** — X3D node trees with `DEF`/`USE` sharing of
//!   element styles and bond materials, in five display modes
//! - **Reaction animation** — Atom motion, bond re-orientation and fading of
//!   broken, formed and retyped bonds, all driven by a single time sensor
//! - **X3D output** — XML serialization with routes and style classes for
//!   client-side display switching
//!
//! # Quick Start
//!
//! Parse a structure with [`io::read_structure`], render it with [`render`]
//! and serialize the result with [`io::write_scene`]:
//!
//! ```
//! use ctfile_x3d::io::{self, Format};
//! use ctfile_x3d::{Config, DisplayMode, Structure, render};
//!
//! let molfile = r"water
//!   example
//!
//!   3  2  0  0  0  0            999 V2000
//!     0.0000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
//!     0.9600    0.0000    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
//!    -0.2400    0.9300    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
//!   1  2  1  0  0  0  0
//!   1  3  1  0  0  0  0
//! M  END
//! ";
//!
//! let config = Config::default();
//! let structure = io::read_structure(molfile.as_bytes(), Format::Mol, &config)?;
//! let Structure::Molecule(water) = &structure else {
//!     unreachable!("molfiles hold one molecule");
//! };
//! assert_eq!(water.name, "water");
//! assert_eq!(water.atom_count(), 3);
//! assert_eq!(water.bond_count(), 2);
//!
//! // Both hydrogens share one sphere definition
//! let scene = render(&structure, &config, DisplayMode::BallsSticks)?;
//! assert!(scene.get("H").is_some());
//! assert!(!scene.is_animated());
//!
//! let mut out = Vec::new();
//! io::write_scene(&mut out, &scene, Format::X3d)?;
//! let xml = String::from_utf8(out)?;
//! assert!(xml.contains(r#"<Group USE="H"/>"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — CTFile readers and the X3D writer
//! - [`scene`] — Scene graph, display modes and the reaction animator
//! - [`Config`] — Label size, transparencies, bond spacing and colors, layout
//!   and animation timing
//!
//! # Data Types
//!
//! - [`Structure`] — A parsed [`Molecule`] or [`Reaction`]
//! - [`Molecule`] — Keyed atoms and bonds with a bounding box
//! - [`Atom`] — Element symbol, position and atom-atom mapping number
//! - [`Bond`] — Canonically ordered atom pair with a [`BondType`]
//! - [`Element`] — Styled elements (sphere color, label color, radius)
//! - [`Point`], [`Vector`], [`Rotation`], [`BoundingBox`] — Geometry

mod config;
mod model;

pub mod io;
pub mod scene;

pub use model::atom::Atom;
pub use model::geom::{BoundingBox, Point, Rotation, Vector};
pub use model::molecule::{Bond, Molecule, Reaction, Structure};
pub use model::types::{BondType, Color, DuplicateAtomKeyError, Element, SelfBondError};

pub use config::{
    AnimationConfig, AtomConfig, BondColors, BondConfig, Config, ConfigError, LayoutConfig,
};

pub use scene::{DisplayMode, Scene, render};

pub use scene::Error as SceneError;
