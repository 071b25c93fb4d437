use std::fmt;
use thiserror::Error;

/// RGB triple with components in `[0, 1]`.
pub type Color = [f64; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bond connects atom {0} to itself")]
pub struct SelfBondError(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duplicate atom key {0}")]
pub struct DuplicateAtomKeyError(pub u32);

/// Elements with a dedicated rendering style.
///
/// Lookup never fails: symbols outside the table resolve to
/// [`Element::Other`], so misspelled or exotic symbols still render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    C,
    N,
    O,
    F,
    Na,
    Mg,
    P,
    S,
    Cl,
    K,
    Ca,
    Mn,
    Fe,
    Cu,
    Zn,
    I,
    Other,
}

impl Element {
    pub fn lookup(symbol: &str) -> Element {
        match symbol {
            "H" => Element::H,
            "C" => Element::C,
            "N" => Element::N,
            "O" => Element::O,
            "F" => Element::F,
            "Na" => Element::Na,
            "Mg" => Element::Mg,
            "P" => Element::P,
            "S" => Element::S,
            "Cl" => Element::Cl,
            "K" => Element::K,
            "Ca" => Element::Ca,
            "Mn" => Element::Mn,
            "Fe" => Element::Fe,
            "Cu" => Element::Cu,
            "Zn" => Element::Zn,
            "I" => Element::I,
            _ => Element::Other,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::I => "I",
            Element::Other => "*",
        }
    }

    /// Empirical atomic radius in ångström, used as the sphere radius.
    pub fn radius(&self) -> f64 {
        match self {
            Element::H => 0.25,
            Element::C => 0.70,
            Element::N => 0.65,
            Element::O => 0.60,
            Element::F => 0.50,
            Element::Na => 1.80,
            Element::Mg => 1.50,
            Element::P => 1.00,
            Element::S => 1.00,
            Element::Cl => 1.00,
            Element::K => 2.20,
            Element::Ca => 1.80,
            Element::Mn => 1.40,
            Element::Fe => 1.40,
            Element::Cu => 1.35,
            Element::Zn => 1.35,
            Element::I => 1.40,
            Element::Other => 0.75,
        }
    }

    pub fn sphere_color(&self) -> Color {
        match self {
            Element::H => [0.6, 0.6, 0.6],
            Element::C => [0.2, 0.2, 0.2],
            Element::N => [0.0, 0.0, 1.0],
            Element::O => [1.0, 0.0, 0.0],
            Element::F | Element::Cl => [0.0, 0.7, 0.0],
            Element::Na | Element::K => [0.6, 0.0, 1.0],
            Element::Mg | Element::Ca => [0.0, 0.4, 0.0],
            Element::P => [1.0, 0.5, 0.0],
            Element::S => [0.8, 0.8, 0.0],
            Element::Mn | Element::Cu | Element::Zn => [1.0, 0.8, 0.4],
            Element::Fe => [0.5, 0.4, 0.0],
            Element::I => [0.3, 0.0, 0.5],
            Element::Other => [1.0, 0.6, 0.6],
        }
    }

    /// Label color: half the sphere color, black for carbon and hydrogen.
    pub fn label_color(&self) -> Color {
        match self {
            Element::H | Element::C => [0.0, 0.0, 0.0],
            other => other.sphere_color().map(|c| c / 2.0),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Bond type codes of the CTFile bond block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondType {
    Single,
    Double,
    Triple,
    Aromatic,
    SingleOrDouble,
    SingleOrAromatic,
    DoubleOrAromatic,
    Any,
}

impl BondType {
    pub fn from_code(code: u32) -> Option<BondType> {
        match code {
            1 => Some(BondType::Single),
            2 => Some(BondType::Double),
            3 => Some(BondType::Triple),
            4 => Some(BondType::Aromatic),
            5 => Some(BondType::SingleOrDouble),
            6 => Some(BondType::SingleOrAromatic),
            7 => Some(BondType::DoubleOrAromatic),
            8 => Some(BondType::Any),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            BondType::Single => 1,
            BondType::Double => 2,
            BondType::Triple => 3,
            BondType::Aromatic => 4,
            BondType::SingleOrDouble => 5,
            BondType::SingleOrAromatic => 6,
            BondType::DoubleOrAromatic => 7,
            BondType::Any => 8,
        }
    }

    /// Number of parallel cylinders drawn for this bond.
    pub fn cylinder_count(&self) -> usize {
        match self {
            BondType::Double | BondType::Aromatic => 2,
            BondType::Triple => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondType::Single => write!(f, "Single"),
            BondType::Double => write!(f, "Double"),
            BondType::Triple => write!(f, "Triple"),
            BondType::Aromatic => write!(f, "Aromatic"),
            BondType::SingleOrDouble => write!(f, "Single or Double"),
            BondType::SingleOrAromatic => write!(f, "Single or Aromatic"),
            BondType::DoubleOrAromatic => write!(f, "Double or Aromatic"),
            BondType::Any => write!(f, "Any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn element_lookup_known_symbols() {
        assert_eq!(Element::lookup("C"), Element::C);
        assert_eq!(Element::lookup("Cl"), Element::Cl);
        assert_eq!(Element::lookup("Zn"), Element::Zn);
    }

    #[test]
    fn element_lookup_falls_back_to_other() {
        assert_eq!(Element::lookup("Xx"), Element::Other);
        assert_eq!(Element::lookup("c"), Element::Other);
        assert_eq!(Element::lookup(""), Element::Other);
        assert!(approx_eq(Element::lookup("Br").radius(), 0.75, 1e-12));
    }

    #[test]
    fn element_style_table_values() {
        assert!(approx_eq(Element::C.radius(), 0.70, 1e-12));
        assert!(approx_eq(Element::K.radius(), 2.2, 1e-12));
        assert_eq!(Element::O.sphere_color(), [1.0, 0.0, 0.0]);
        assert_eq!(Element::O.label_color(), [0.5, 0.0, 0.0]);
        assert_eq!(Element::F.label_color(), [0.0, 0.35, 0.0]);
        assert_eq!(Element::C.label_color(), [0.0, 0.0, 0.0]);
        assert_eq!(Element::Other.label_color(), [0.5, 0.3, 0.3]);
    }

    #[test]
    fn element_display_uses_symbol() {
        assert_eq!(Element::Na.to_string(), "Na");
        assert_eq!(Element::Other.to_string(), "*");
    }

    #[test]
    fn bond_type_codes_roundtrip() {
        for code in 1..=8 {
            let ty = BondType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
        assert_eq!(BondType::from_code(0), None);
        assert_eq!(BondType::from_code(9), None);
    }

    #[test]
    fn bond_type_cylinder_counts() {
        assert_eq!(BondType::Single.cylinder_count(), 1);
        assert_eq!(BondType::Double.cylinder_count(), 2);
        assert_eq!(BondType::Triple.cylinder_count(), 3);
        assert_eq!(BondType::Aromatic.cylinder_count(), 2);
        assert_eq!(BondType::Any.cylinder_count(), 1);
    }
}
