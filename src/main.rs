//! # convotable CLI
//!
//! Reads a chat export, merges speaker runs, and prints the table.
//! The table goes to stdout (or `--output`); notices and warnings go to stderr.

use std::fs::File;
use std::io::{self, BufWriter};
use std::process;

use clap::Parser as ClapParser;

use convotable::ConvoError;
use convotable::cli::{Args, init_logging};
use convotable::pipeline::read_file;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.log_preset());

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ConvoError> {
    let config = args.pipeline_config();
    tracing::info!(
        "Reading {} ({} source, {} output)",
        args.input.display(),
        config.source,
        config.format
    );

    let conversion = read_file(&args.input, &config)?;

    let report = conversion.report();
    if !report.skipped.is_empty() {
        tracing::info!("Skipped {} line(s) with bad timestamps", report.skipped.len());
    }

    if conversion.is_empty() {
        eprintln!("No conversations found in '{}'.", args.input.display());
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            conversion.write_to(BufWriter::new(file))?;
            tracing::info!("Wrote {} entries to {}", report.entries, path.display());
        }
        None => {
            let stdout = io::stdout();
            conversion.write_to(stdout.lock())?;
        }
    }

    Ok(())
}
