//! fit2gpx - convert the track of a FIT activity to GPX.
//!
//! Invoked as `fit2gpx <input.fit> <output.gpx>`. The output file is only
//! written once the whole input has been decoded.

#![deny(clippy::unwrap_used)]

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

const USAGE: &str = "Usage: fit2gpx <input.fit> <output.gpx>";

#[derive(Debug, Parser)]
#[command(name = "fit2gpx")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// FIT document to read.
    input: PathBuf,
    /// GPX document to write.
    output: PathBuf,
}

fn main() -> ExitCode {
    let Ok(cli) = Cli::try_parse() else {
        println!("{USAGE}");
        return ExitCode::FAILURE;
    };

    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let points = fit2gpx::avec::decode_file(&cli.input)
        .with_context(|| format!("Failed to decode {}", cli.input.display()))?;

    let document = fit2gpx::gpx::to_vec(&points).context("Failed to render track")?;

    fs::write(&cli.output, document)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}
