use anyhow::{Context, Result, bail};
use log::warn;

use ctfile_x3d::io::{self, Format};
use ctfile_x3d::{Config, DisplayMode, Scene, Structure, render};

use crate::cli::{IoOptions, MolArgs, RxnArgs};
use crate::config::build_config;
use crate::display::{Context as DisplayContext, Progress, print_scene_info, print_structure_info};
use crate::io::{
    create_output, describe, infer_input_format, open_input, stdin_is_tty, stdout_is_tty,
};

const TOTAL_STEPS: u8 = 3;

pub fn run_mol(args: MolArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_config(&args.style, None)?;
    convert(
        &args.io,
        Format::Mol,
        &config,
        args.style.display.into(),
        ctx,
    )
}

pub fn run_rxn(args: RxnArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_config(&args.style, Some(&args.animation))?;
    convert(
        &args.io,
        Format::Rxn,
        &config,
        args.style.display.into(),
        ctx,
    )
}

fn convert(
    options: &IoOptions,
    format: Format,
    config: &Config,
    display: DisplayMode,
    ctx: DisplayContext,
) -> Result<()> {
    check_streams(options, format)?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading structure");
    let structure = read_structure(options, format, config)?;
    progress.complete_step("Reading structure", &read_details(options, format, &structure));

    if ctx.interactive {
        print_structure_info(&structure);
    }

    progress.step("Building scene");
    let scene = render(&structure, config, display).context("Failed to build scene")?;
    progress.complete_step("Building scene", &scene_details(&scene, display, config));

    if ctx.interactive {
        print_scene_info(&scene);
    }

    progress.step("Writing X3D");
    let mut writer = create_output(options.output.as_deref())?;
    io::write_scene(&mut writer, &scene, Format::X3d).context("Failed to write X3D scene")?;
    progress.complete_step(
        "Writing X3D",
        &[format!(
            "Write X3D → {}",
            describe(options.output.as_deref(), "stdout")
        )],
    );

    progress.finish();

    Ok(())
}

fn check_streams(options: &IoOptions, format: Format) -> Result<()> {
    let command = match format {
        Format::Rxn => "rxn",
        _ => "mol",
    };

    match &options.input {
        None if stdin_is_tty() => bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: ctx3d {command} -i <INPUT> or pipe data via stdin."
        ),
        Some(path) => {
            if let Some(inferred) = infer_input_format(path).filter(|f| *f != format) {
                warn!(
                    "'{}' looks like a {} file but is read as {}",
                    path.display(),
                    inferred,
                    format
                );
            }
        }
        None => {}
    }

    if options.output.is_none() && stdout_is_tty() {
        bail!(
            "No output file specified and stdout is a terminal.\n\nUsage: ctx3d {command} -o <OUTPUT> or pipe output."
        );
    }
    Ok(())
}

fn read_structure(options: &IoOptions, format: Format, config: &Config) -> Result<Structure> {
    let input = open_input(options.input.as_deref())?;
    io::read_structure(input, format, config)
        .with_context(|| format!("Failed to read {} input", format))
}

fn read_details(options: &IoOptions, format: Format, structure: &Structure) -> Vec<String> {
    let mut details = vec![format!(
        "Parse {} ← {}",
        format,
        describe(options.input.as_deref(), "stdin")
    )];
    match structure {
        Structure::Molecule(molecule) => details.push(format!(
            "{} atoms, {} bonds, centered",
            molecule.atom_count(),
            molecule.bond_count()
        )),
        Structure::Reaction(reaction) => {
            details.push(format!(
                "Reactants: {} atoms, {} bonds",
                reaction.reactants.atom_count(),
                reaction.reactants.bond_count()
            ));
            details.push(format!(
                "Products: {} atoms, {} bonds",
                reaction.products.atom_count(),
                reaction.products.bond_count()
            ));
        }
    }
    details
}

fn scene_details(scene: &Scene, display: DisplayMode, config: &Config) -> Vec<String> {
    let mut details = vec![format!("{} display", display)];
    if scene.is_animated() {
        details.push(format!(
            "{} routes, {:.1}s cycle, {:.0}% morphing",
            scene.routes().len(),
            config.animation.cycle_interval,
            config.animation.active_fraction * 100.0
        ));
    }
    details
}
