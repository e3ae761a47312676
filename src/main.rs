use anyhow::{Context, Result};
use clap::Parser;

use sasi_gridder::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    sasi_gridder::run(&cli).context("gridding run failed")
}
