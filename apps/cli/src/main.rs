//! spacedown CLI — wiki HTML export to Markdown tree converter.
//!
//! Normalizes exported wiki pages, reconstructs the intended directory
//! hierarchy from each space's table of contents, and rewrites intra-wiki
//! links for the target engine.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::run(cli)
}
