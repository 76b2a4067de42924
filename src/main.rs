// src/main.rs
use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use sfextract::cli::{self, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let output = cli::run(&args)?;
    print!("{}", output);
    Ok(())
}
