use std::fs;

use anyhow::{Context, Result};

use ctfile_x3d::Config;

use crate::cli::{AnimationOptions, StyleOptions};

/// Loads the settings file named by `--config` (defaults otherwise), applies
/// command-line overrides on top, and validates the result.
pub fn build_config(style: &StyleOptions, animation: Option<&AnimationOptions>) -> Result<Config> {
    let mut config = match &style.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
            Config::from_toml(&text)
                .with_context(|| format!("Invalid settings file: {}", path.display()))?
        }
        None => Config::default(),
    };

    apply_style(&mut config, style);
    if let Some(animation) = animation {
        apply_animation(&mut config, animation);
    }

    config.validate().context("Invalid command-line settings")?;
    Ok(config)
}

fn apply_style(config: &mut Config, style: &StyleOptions) {
    if let Some(t) = style.atom_transparency {
        config.atom.transparency = t;
    }
    if let Some(size) = style.symbol_size {
        config.atom.symbol_size = size;
    }
    if let Some(d) = style.bond_distance {
        config.bond.distance = d;
    }
}

fn apply_animation(config: &mut Config, animation: &AnimationOptions) {
    if let Some(spacing) = animation.spacing {
        config.layout.molecule_spacing = spacing;
    }
    if let Some(fraction) = animation.active_fraction {
        config.animation.active_fraction = fraction;
    }
    if let Some(interval) = animation.cycle_interval {
        config.animation.cycle_interval = interval;
    }
}
