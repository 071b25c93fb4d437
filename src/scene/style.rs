use crate::config::Config;
use std::fmt;

/// Rendering style selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Thin bond lines with element labels, no spheres.
    Wireframe,
    /// Bond cylinders only.
    Sticks,
    /// Half-size spheres joined by cylinders.
    BallsSticks,
    /// Full-size opaque spheres.
    SpaceFill,
    /// Translucent spheres, labels and thin bonds.
    #[default]
    Mixed,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::Wireframe,
        DisplayMode::Sticks,
        DisplayMode::BallsSticks,
        DisplayMode::SpaceFill,
        DisplayMode::Mixed,
    ];

    /// Visual parameters of this mode.
    pub fn style(self, config: &Config) -> DisplayStyle {
        match self {
            DisplayMode::Wireframe => DisplayStyle {
                atom_scale: 1.0,
                atom_transparency: 1.0,
                label_transparency: 0.0,
                bond_transparency: 0.0,
                bond_radius: THIN_BOND_RADIUS,
                bond_scale: 0.5,
            },
            DisplayMode::Sticks => DisplayStyle {
                atom_transparency: 1.0,
                ..DisplayStyle::BASE
            },
            DisplayMode::BallsSticks => DisplayStyle {
                atom_scale: 0.5,
                ..DisplayStyle::BASE
            },
            DisplayMode::SpaceFill => DisplayStyle {
                bond_transparency: 1.0,
                ..DisplayStyle::BASE
            },
            DisplayMode::Mixed => DisplayStyle {
                atom_transparency: config.atom.transparency,
                label_transparency: 0.0,
                bond_scale: 0.5,
                ..DisplayStyle::BASE
            },
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Wireframe => write!(f, "Wireframe"),
            DisplayMode::Sticks => write!(f, "Sticks"),
            DisplayMode::BallsSticks => write!(f, "Balls and sticks"),
            DisplayMode::SpaceFill => write!(f, "Space fill"),
            DisplayMode::Mixed => write!(f, "Mixed"),
        }
    }
}

pub const BOND_RADIUS: f64 = 0.05;
pub const THIN_BOND_RADIUS: f64 = 0.02;

/// One row of the display table, looked up once per scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayStyle {
    pub atom_scale: f64,
    pub atom_transparency: f64,
    pub label_transparency: f64,
    pub bond_transparency: f64,
    pub bond_radius: f64,
    /// Scale applied to each bond cylinder transform.
    pub bond_scale: f64,
}

impl DisplayStyle {
    const BASE: DisplayStyle = DisplayStyle {
        atom_scale: 1.0,
        atom_transparency: 0.0,
        label_transparency: 1.0,
        bond_transparency: 0.0,
        bond_radius: BOND_RADIUS,
        bond_scale: 1.0,
    };
}
