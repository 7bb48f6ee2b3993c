//! pipedoc CLI: compile markdown pipeline documents into config trees.
//!
//! Reads a markdown document (or a notebook) and prints the hierarchical
//! configuration it describes as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
