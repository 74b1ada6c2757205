//! jagcache-extract binary entry point.
//!
//! Thin wrapper around the jagcache-extract library that parses the
//! command line, initializes logging and dispatches the subcommand.

use anyhow::Result;
use clap::Parser;
use jagcache_extract::{Cli, logging, run};
use std::io;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    logging::init(cli.log_level, cli.format)?;

    let mut stdout = io::stdout().lock();
    let outcome = run(&cli, &mut stdout)?;
    Ok(outcome.into())
}
