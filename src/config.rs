//! Rendering and layout settings.
//!
//! A [`Config`] is plain data: build it in code with struct-update syntax or
//! read it from TOML with [`Config::from_toml`]. Every key is optional in
//! TOML; missing keys take the values shipped in
//! `resources/default.config.toml`.
//!
//! ```
//! use ctfile_x3d::Config;
//!
//! let config = Config::from_toml(
//!     r#"
//!     [animation]
//!     cycle_interval = 8.0
//!     "#,
//! )?;
//! assert_eq!(config.animation.cycle_interval, 8.0);
//! assert_eq!(config.animation.active_fraction, 0.75);
//! # Ok::<(), ctfile_x3d::ConfigError>(())
//! ```

use crate::model::types::{BondType, Color};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be deserialized.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its allowed range.
    #[error("invalid configuration value for '{key}': {detail}")]
    Invalid {
        /// Dotted key of the offending value.
        key: &'static str,
        /// Why the value was rejected.
        detail: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, detail: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            detail: detail.into(),
        }
    }
}

/// Settings consumed by the parsers and the scene generator.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub atom: AtomConfig,
    #[serde(default)]
    pub bond: BondConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtomConfig {
    /// Font size of element labels.
    #[serde(default = "default_symbol_size")]
    pub symbol_size: f64,
    /// Sphere transparency in the mixed display mode.
    #[serde(default = "default_atom_transparency")]
    pub transparency: f64,
}

fn default_symbol_size() -> f64 {
    0.5
}
fn default_atom_transparency() -> f64 {
    0.3
}

impl Default for AtomConfig {
    fn default() -> Self {
        Self {
            symbol_size: default_symbol_size(),
            transparency: default_atom_transparency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BondConfig {
    /// Offset between the parallel cylinders of a multiple bond.
    #[serde(default = "default_bond_distance")]
    pub distance: f64,
    #[serde(default)]
    pub colors: BondColors,
}

fn default_bond_distance() -> f64 {
    0.1
}

impl Default for BondConfig {
    fn default() -> Self {
        Self {
            distance: default_bond_distance(),
            colors: BondColors::default(),
        }
    }
}

/// Cylinder color per bond type; query bond types use `default`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BondColors {
    #[serde(default = "default_bond_color")]
    pub default: Color,
    #[serde(default = "default_bond_color")]
    pub single: Color,
    #[serde(default = "default_bond_color")]
    pub double: Color,
    #[serde(default = "default_bond_color")]
    pub triple: Color,
    #[serde(default = "default_aromatic_color")]
    pub aromatic: Color,
}

fn default_bond_color() -> Color {
    [0.75, 0.75, 0.75]
}
fn default_aromatic_color() -> Color {
    [1.0, 0.75, 1.0]
}

impl Default for BondColors {
    fn default() -> Self {
        Self {
            default: default_bond_color(),
            single: default_bond_color(),
            double: default_bond_color(),
            triple: default_bond_color(),
            aromatic: default_aromatic_color(),
        }
    }
}

impl BondColors {
    pub fn for_type(&self, kind: BondType) -> Color {
        match kind {
            BondType::Single => self.single,
            BondType::Double => self.double,
            BondType::Triple => self.triple,
            BondType::Aromatic => self.aromatic,
            _ => self.default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Gap along x between neighbouring reaction participants.
    #[serde(default = "default_molecule_spacing")]
    pub molecule_spacing: f64,
}

fn default_molecule_spacing() -> f64 {
    2.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            molecule_spacing: default_molecule_spacing(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    /// Share of each loop spent morphing; the rest is split into equal holds
    /// before and after.
    #[serde(default = "default_active_fraction")]
    pub active_fraction: f64,
    /// Loop duration in seconds.
    #[serde(default = "default_cycle_interval")]
    pub cycle_interval: f64,
}

fn default_active_fraction() -> f64 {
    0.75
}
fn default_cycle_interval() -> f64 {
    5.0
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            active_fraction: default_active_fraction(),
            cycle_interval: default_cycle_interval(),
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is inside its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("atom.transparency", self.atom.transparency)?;
        unit_interval("animation.active_fraction", self.animation.active_fraction)?;
        positive("atom.symbol_size", self.atom.symbol_size)?;
        positive("animation.cycle_interval", self.animation.cycle_interval)?;
        non_negative("bond.distance", self.bond.distance)?;
        non_negative("layout.molecule_spacing", self.layout.molecule_spacing)?;

        let colors = &self.bond.colors;
        for (key, color) in [
            ("bond.colors.default", colors.default),
            ("bond.colors.single", colors.single),
            ("bond.colors.double", colors.double),
            ("bond.colors.triple", colors.triple),
            ("bond.colors.aromatic", colors.aromatic),
        ] {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::invalid(
                    key,
                    format!("color components must lie in [0, 1], got {color:?}"),
                ));
            }
        }
        Ok(())
    }
}

fn unit_interval(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("{value} is outside [0, 1]")))
    }
}

fn positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("{value} must be positive")))
    }
}

fn non_negative(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("{value} must not be negative")))
    }
}
