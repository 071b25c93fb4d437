//! Core data structures for molecules, reactions and their geometry.
//!
//! - [`geom`] – Points, vectors, rotations and bounding boxes.
//! - [`atom`] – Atoms with a free-form element symbol and a mapping number.
//! - [`types`] – Rendering styles per element and CTFile bond type codes.
//! - [`molecule`] – Bonds, keyed connection tables, reactions and parse results.
//!
//! Atoms are addressed by key rather than by index: a key is the atom's
//! atom-atom mapping number when present, which is what lets reactant and
//! product atoms be paired when a reaction is animated.

pub mod atom;
pub mod geom;
pub mod molecule;
pub mod types;
