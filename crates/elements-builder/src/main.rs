mod logging;

use std::path::PathBuf;

// External Crate Imports
use clap::Parser;

/// Writes a JSON table of all 118 chemical elements, for use with `chemcalc --elements`
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Where to write the element table
    #[arg(short, long, value_name = "PATH", default_value = "elements.json")]
    output: PathBuf,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    logging::setup_logging(args.verbose, args.quiet);

    let written = elements_builder::write_json(&args.output)?;
    println!(
        "JSON file '{}' created successfully with {written} elements.",
        args.output.display()
    );
    Ok(())
}
