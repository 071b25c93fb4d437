mod convert;

use convert::{run_mol, run_rxn};

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Mol(args) => run_mol(args, ctx),
        Command::Rxn(args) => run_rxn(args, ctx),
    }
}
