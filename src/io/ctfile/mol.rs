use super::LineReader;
use super::columns::Columns;
use crate::io::error::Error;
use crate::model::atom::Atom;
use crate::model::geom::Point;
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::BondType;
use log::debug;
use std::io::BufRead;

/// Shortest accepted counts line: the atom and bond counts.
pub const MIN_COUNTS_WIDTH: usize = 6;
/// Shortest accepted atom line: coordinates and the whole symbol field.
pub const MIN_ATOM_WIDTH: usize = 34;
/// Shortest accepted bond line: both atom indices and the bond type.
pub const MIN_BOND_WIDTH: usize = 9;

const COUNTS_FIELDS: usize = 11;

/// The molfile header block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    pub name: String,
    /// Program, user, date and dimension line.
    pub metadata: String,
    pub comment: String,
}

/// The counts line of a connection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountsLine {
    /// The eleven 3-column integer fields, blanks read as 0.
    pub fields: [u32; COUNTS_FIELDS],
    /// Version tag (`V2000`), empty for legacy files.
    pub version: String,
}

impl CountsLine {
    pub fn atom_count(&self) -> usize {
        self.fields[0] as usize
    }

    pub fn bond_count(&self) -> usize {
        self.fields[1] as usize
    }

    pub fn atom_list_count(&self) -> u32 {
        self.fields[2]
    }

    pub fn is_chiral(&self) -> bool {
        self.fields[4] == 1
    }

    pub fn stext_entries(&self) -> u32 {
        self.fields[5]
    }

    pub fn property_lines(&self) -> u32 {
        self.fields[10]
    }
}

pub fn parse_counts_line(line: &str, line_no: usize) -> Result<CountsLine, Error> {
    let cols = Columns::new(line, line_no);
    cols.require_width(MIN_COUNTS_WIDTH, "counts line")?;

    let mut fields = [0u32; COUNTS_FIELDS];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = cols.uint(i * 3..i * 3 + 3, "counts field")?;
    }
    let version = cols.text(33..line.len().max(33), "version")?.to_string();
    if version.eq_ignore_ascii_case("V3000") {
        return Err(cols.error(33..line.len(), "V3000 connection tables are not supported"));
    }

    Ok(CountsLine { fields, version })
}

pub fn parse_atom_line(line: &str, line_no: usize) -> Result<Atom, Error> {
    let cols = Columns::new(line, line_no);
    cols.require_width(MIN_ATOM_WIDTH, "atom line")?;

    let x = cols.float(0..10, "x coordinate")?;
    let y = cols.float(10..20, "y coordinate")?;
    let z = cols.float(20..30, "z coordinate")?;
    let symbol = cols.text(31..34, "atom symbol")?;
    if symbol.is_empty() {
        return Err(cols.error(31..34, "missing atom symbol"));
    }
    let aam = cols.uint(60..63, "atom-atom mapping number")?;

    Ok(Atom::new(symbol, Point::new(x, y, z), aam))
}

/// Parses a bond line.
///
/// With `keys`, the 1-based atom indices are translated through the list of
/// atom keys in file order; without it the indices are the keys.
pub fn parse_bond_line(line: &str, line_no: usize, keys: Option<&[u32]>) -> Result<Bond, Error> {
    let cols = Columns::new(line, line_no);
    cols.require_width(MIN_BOND_WIDTH, "bond line")?;

    let first = cols.uint(0..3, "first atom index")?;
    let second = cols.uint(3..6, "second atom index")?;
    let code = cols.uint(6..9, "bond type")?;
    let kind = BondType::from_code(code)
        .ok_or_else(|| cols.error(6..9, format!("unsupported bond type {code}")))?;

    let resolve = |index: u32, range: std::ops::Range<usize>| -> Result<u32, Error> {
        if index == 0 {
            return Err(cols.error(range, "atom indices start at 1"));
        }
        match keys {
            Some(keys) => keys.get(index as usize - 1).copied().ok_or_else(|| {
                cols.error(
                    range,
                    format!("atom index {index} exceeds atom count {}", keys.len()),
                )
            }),
            None => Ok(index),
        }
    };
    let from = resolve(first, 0..3)?;
    let to = resolve(second, 3..6)?;

    Bond::new(from, to, kind).map_err(|e| cols.error(0..6, e.to_string()))
}

pub fn parse_header<R: BufRead>(lines: &mut LineReader<R>) -> Result<Header, Error> {
    Ok(Header {
        name: lines.next_line("the molecule name")?.trim().to_string(),
        metadata: lines.next_line("the header metadata line")?,
        comment: lines.next_line("the header comment line")?,
    })
}

/// Reads a connection table: counts line, atom block and bond block.
///
/// The properties block that follows is left unread.
pub fn parse_ctab<R: BufRead>(lines: &mut LineReader<R>, name: &str) -> Result<Molecule, Error> {
    let counts_line = lines.next_line("the counts line")?;
    let counts = parse_counts_line(&counts_line, lines.line_no())?;

    let mut molecule = Molecule::new(name);
    let mut mapped = false;
    for i in 0..counts.atom_count() {
        let line = lines.next_line(&format!("atom {} of {}", i + 1, counts.atom_count()))?;
        let atom = parse_atom_line(&line, lines.line_no())?;
        mapped |= atom.is_mapped();
        molecule
            .add_atom(atom)
            .map_err(|e| Error::format(lines.line_no(), &line, e.to_string()))?;
    }

    let keys: Vec<u32> = molecule.keys().collect();
    let remap = mapped.then_some(keys.as_slice());
    for i in 0..counts.bond_count() {
        let line = lines.next_line(&format!("bond {} of {}", i + 1, counts.bond_count()))?;
        let bond = parse_bond_line(&line, lines.line_no(), remap)?;
        if remap.is_none() && bond.to() as usize > keys.len() {
            return Err(Error::field(
                lines.line_no(),
                0..6,
                &line,
                format!(
                    "bond {bond} references an atom beyond atom count {}",
                    keys.len()
                ),
            ));
        }
        molecule.add_bond(bond);
    }

    debug!(
        "read connection table '{}' with {} atoms and {} bonds",
        name,
        molecule.atom_count(),
        molecule.bond_count()
    );
    Ok(molecule)
}

/// Reads a molfile header and connection table and centers the molecule on
/// the origin.
pub fn parse_mol<R: BufRead>(lines: &mut LineReader<R>) -> Result<Molecule, Error> {
    let header = parse_header(lines)?;
    let mut molecule = parse_ctab(lines, &header.name)?;
    molecule.center();
    Ok(molecule)
}
