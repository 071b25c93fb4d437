use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ctfile_x3d::DisplayMode;

#[derive(Parser)]
#[command(
    name = "ctx3d",
    about = "CTFile to X3D scene conversion",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a single molecule (MDL molfile)
    #[command(visible_alias = "m")]
    Mol(MolArgs),

    /// Animate a reaction (MDL rxnfile)
    #[command(visible_alias = "r")]
    Rxn(RxnArgs),
}

impl Command {
    pub fn io(&self) -> &IoOptions {
        match self {
            Command::Mol(args) => &args.io,
            Command::Rxn(args) => &args.io,
        }
    }
}

/// I/O options shared by all commands.
#[derive(Args)]
pub struct IoOptions {
    /// Input file (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output X3D file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Scene style options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Scene Style")]
pub struct StyleOptions {
    /// Display mode
    #[arg(long, value_name = "MODE", default_value = "mixed")]
    pub display: Display,

    /// Settings file (TOML); command-line values take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sphere transparency in mixed mode (0-1)
    #[arg(long, value_name = "T")]
    pub atom_transparency: Option<f64>,

    /// Label font size
    #[arg(long, value_name = "SIZE")]
    pub symbol_size: Option<f64>,

    /// Gap between the cylinders of multiple bonds
    #[arg(long, value_name = "D")]
    pub bond_distance: Option<f64>,
}

/// Reaction layout and timing options.
#[derive(Args)]
#[command(next_help_heading = "Reaction Animation")]
pub struct AnimationOptions {
    /// Gap between neighbouring reactants (or products)
    #[arg(long, value_name = "S")]
    pub spacing: Option<f64>,

    /// Share of each cycle spent morphing (0-1)
    #[arg(long = "animation-fraction", value_name = "F")]
    pub active_fraction: Option<f64>,

    /// Duration of one animation cycle in seconds
    #[arg(long = "cycle-interval", value_name = "SECS")]
    pub cycle_interval: Option<f64>,
}

#[derive(Args)]
pub struct MolArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub style: StyleOptions,
}

#[derive(Args)]
pub struct RxnArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub style: StyleOptions,

    #[command(flatten)]
    pub animation: AnimationOptions,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum Display {
    /// Thin bonds and element labels
    #[value(alias = "wire")]
    Wireframe,
    /// Bond cylinders only
    Sticks,
    /// Half-size spheres joined by cylinders
    #[value(name = "balls-sticks", alias = "bs")]
    BallsSticks,
    /// Full-size spheres, no bonds
    #[value(name = "space-fill", alias = "cpk")]
    SpaceFill,
    /// Translucent spheres with labels and thin bonds
    #[default]
    Mixed,
}

impl From<Display> for DisplayMode {
    fn from(display: Display) -> Self {
        match display {
            Display::Wireframe => DisplayMode::Wireframe,
            Display::Sticks => DisplayMode::Sticks,
            Display::BallsSticks => DisplayMode::BallsSticks,
            Display::SpaceFill => DisplayMode::SpaceFill,
            Display::Mixed => DisplayMode::Mixed,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
