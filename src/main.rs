//! copycontent - flatten a project tree into a single text file
//!
//! copycontent provides:
//! - Directory traversal with prefix/exact ignore patterns
//! - Concatenation of every remaining file with per-file headers
//! - A dry-run listing and a starter ignore file
//! - An optional run report (size, token estimate, digest)

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod flows;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    crate::core::logging::init(cli.verbose, cli.quiet, !cli.no_color);
    cli::run(cli)
}
