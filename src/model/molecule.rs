use super::atom::Atom;
use super::geom::{BoundingBox, Point, Vector};
use super::types::{BondType, DuplicateAtomKeyError, SelfBondError};
use log::warn;
use std::collections::HashMap;
use std::fmt;

/// A bond between two atom keys of a [`Molecule`].
///
/// Endpoints are stored in canonical order (`from < to`), so a bond read as
/// `5 2` and one read as `2 5` are the same bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    from: u32,
    to: u32,
    pub kind: BondType,
}

impl Bond {
    pub fn new(a: u32, b: u32, kind: BondType) -> Result<Self, SelfBondError> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self { from: a, to: b, kind }),
            std::cmp::Ordering::Greater => Ok(Self { from: b, to: a, kind }),
            std::cmp::Ordering::Equal => Err(SelfBondError(a)),
        }
    }

    #[inline]
    pub fn from(&self) -> u32 {
        self.from
    }

    #[inline]
    pub fn to(&self) -> u32 {
        self.to
    }

    #[inline]
    pub fn key(&self) -> (u32, u32) {
        (self.from, self.to)
    }

    /// Stable name of the bond, `"<from>-<to>"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// A connection table: keyed atoms, keyed bonds and their bounding box.
///
/// Atoms keep insertion order. An atom's key is its mapping number when it has
/// one, otherwise its 1-based position at insertion time. Bonds are keyed by
/// their canonical endpoint pair; adding a second bond over the same pair
/// replaces the first in place.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub name: String,
    atoms: Vec<(u32, Atom)>,
    atom_index: HashMap<u32, usize>,
    bonds: Vec<Bond>,
    bond_index: HashMap<(u32, u32), usize>,
    bounds: Option<BoundingBox>,
}

impl Molecule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Inserts an atom and returns the key it was stored under.
    pub fn add_atom(&mut self, atom: Atom) -> Result<u32, DuplicateAtomKeyError> {
        let key = if atom.is_mapped() {
            atom.aam
        } else {
            self.atoms.len() as u32 + 1
        };
        self.insert_atom(key, atom)?;
        Ok(key)
    }

    fn insert_atom(&mut self, key: u32, atom: Atom) -> Result<(), DuplicateAtomKeyError> {
        if self.atom_index.contains_key(&key) {
            return Err(DuplicateAtomKeyError(key));
        }
        match self.bounds.as_mut() {
            Some(bb) => bb.include(atom.position),
            None => self.bounds = Some(BoundingBox::around(atom.position)),
        }
        self.atom_index.insert(key, self.atoms.len());
        self.atoms.push((key, atom));
        Ok(())
    }

    /// Inserts a bond, returning the bond it replaced, if any.
    pub fn add_bond(&mut self, bond: Bond) -> Option<Bond> {
        match self.bond_index.get(&bond.key()) {
            Some(&idx) => {
                let previous = std::mem::replace(&mut self.bonds[idx], bond);
                warn!(
                    "bond {} in '{}' redefined ({} -> {})",
                    bond, self.name, previous.kind, bond.kind
                );
                Some(previous)
            }
            None => {
                self.bond_index.insert(bond.key(), self.bonds.len());
                self.bonds.push(bond);
                None
            }
        }
    }

    pub fn atom(&self, key: u32) -> Option<&Atom> {
        self.atom_index.get(&key).map(|&idx| &self.atoms[idx].1)
    }

    /// Atoms with their keys, in insertion order.
    pub fn atoms(&self) -> impl Iterator<Item = (u32, &Atom)> {
        self.atoms.iter().map(|(key, atom)| (*key, atom))
    }

    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.atoms.iter().map(|(key, _)| *key)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond(&self, key: (u32, u32)) -> Option<&Bond> {
        self.bond_index.get(&key).map(|&idx| &self.bonds[idx])
    }

    /// Positions of both bond endpoints, `None` if either atom is absent.
    pub fn bond_endpoints(&self, bond: &Bond) -> Option<(Point, Point)> {
        let from = self.atom(bond.from())?;
        let to = self.atom(bond.to())?;
        Some((from.position, to.position))
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Center of the bounding box; the origin for an empty molecule.
    pub fn middle(&self) -> Point {
        self.bounds.map_or(Point::ORIGIN, |bb| bb.middle())
    }

    pub fn width(&self) -> f64 {
        self.bounds.map_or(0.0, |bb| bb.width())
    }

    pub fn max_x(&self) -> f64 {
        self.bounds.map_or(0.0, |bb| bb.max.x)
    }

    /// Shifts every atom and the bounding box by `v`.
    pub fn translate(&mut self, v: Vector) {
        for (_, atom) in &mut self.atoms {
            atom.position.translate(v);
        }
        if let Some(bb) = self.bounds.as_mut() {
            bb.translate(v);
        }
    }

    /// Moves the molecule so the middle of its bounding box is the origin.
    pub fn center(&mut self) {
        self.translate(self.middle().to_origin());
    }

    /// Merges `other` into this molecule.
    ///
    /// Mapped atoms keep their keys. Unmapped atoms of `other` are re-keyed
    /// after the largest key already present, and the bonds of `other` are
    /// rewritten to follow them.
    pub fn add_all(&mut self, other: Molecule) -> Result<(), DuplicateAtomKeyError> {
        let incoming_mapped = other
            .atoms
            .iter()
            .filter(|(_, atom)| atom.is_mapped())
            .map(|(key, _)| *key);
        let mut next_key = self.keys().chain(incoming_mapped).max().unwrap_or(0) + 1;
        let mut rekeyed = HashMap::new();
        for (key, atom) in other.atoms {
            let new_key = if atom.is_mapped() {
                key
            } else {
                let k = next_key;
                next_key += 1;
                k
            };
            rekeyed.insert(key, new_key);
            self.insert_atom(new_key, atom)?;
        }
        for bond in other.bonds {
            let from = rekeyed.get(&bond.from()).copied().unwrap_or(bond.from());
            let to = rekeyed.get(&bond.to()).copied().unwrap_or(bond.to());
            match Bond::new(from, to, bond.kind) {
                Ok(b) => {
                    self.add_bond(b);
                }
                Err(e) => warn!("dropping bond {bond} while merging '{}': {e}", other.name),
            }
        }
        Ok(())
    }
}

/// Equality compares atoms and bonds (keys, order and values), not names.
impl PartialEq for Molecule {
    fn eq(&self, other: &Self) -> bool {
        self.atoms == other.atoms && self.bonds == other.bonds
    }
}

/// A reaction: all reactants laid out as one molecule, all products as another.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub name: String,
    pub reactants: Molecule,
    pub products: Molecule,
}

/// Anything a CTFile parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Structure {
    Molecule(Molecule),
    Reaction(Reaction),
}

impl Structure {
    pub fn name(&self) -> &str {
        match self {
            Structure::Molecule(m) => &m.name,
            Structure::Reaction(r) => &r.name,
        }
    }
}
