use super::geom::Point;
use super::types::Element;

/// An atom as read from a connection table.
///
/// The symbol is kept verbatim; rendering resolves it through
/// [`Element::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub position: Point,
    pub symbol: String,
    /// Atom-atom mapping number, `0` when unmapped.
    pub aam: u32,
}

impl Atom {
    pub fn new(symbol: impl Into<String>, position: Point, aam: u32) -> Self {
        Self {
            position,
            symbol: symbol.into(),
            aam,
        }
    }

    #[inline]
    pub fn element(&self) -> Element {
        Element::lookup(&self.symbol)
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.aam > 0
    }
}
