//! Reading CTFile structures and writing X3D scenes.
//!
//! [`read_structure`] dispatches on a [`Format`] to the matching
//! [`CtFileParser`]; [`write_scene`] serializes a generated
//! [`Scene`](crate::Scene). The per-format modules expose the individual
//! line parsers for callers that assemble connection tables themselves.

use crate::config::Config;
use crate::model::molecule::Structure;
use crate::scene::Scene;
use std::fmt;
use std::io::{BufRead, Write};

pub mod ctfile;
pub mod error;
pub mod x3d;

pub use ctfile::{CtFileParser, MolParser, RxnParser};
pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Mol,
    Rxn,
    X3d,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Mol => write!(f, "MOL"),
            Format::Rxn => write!(f, "RXN"),
            Format::X3d => write!(f, "X3D"),
        }
    }
}

/// Parses one structure of the given input format.
pub fn read_structure<R: BufRead>(
    reader: R,
    format: Format,
    config: &Config,
) -> Result<Structure, Error> {
    match format {
        Format::Mol => MolParser.parse(reader),
        Format::Rxn => RxnParser::new(config.layout.molecule_spacing).parse(reader),
        Format::X3d => Err(Error::UnsupportedReadFormat(format)),
    }
}

/// Serializes a scene in the given output format.
pub fn write_scene<W: Write>(writer: W, scene: &Scene, format: Format) -> Result<(), Error> {
    match format {
        Format::X3d => x3d::write(writer, scene),
        Format::Mol | Format::Rxn => Err(Error::UnsupportedWriteFormat(format)),
    }
}
