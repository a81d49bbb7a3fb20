//! Calculates the molar masses of chemical formulas, interactively or in batches

mod logging;

use std::{path::PathBuf, process::ExitCode};

// External Crate Imports
use chemform::{
    ChemformError, DEFAULT_HYDRATE_SEPARATOR, DEFAULT_MAX_DEPTH, ElementCount, ElementTable, ParseOptions,
    Result, elements::errors::MassError,
};
use clap::Parser;
use miette::{Diagnostic, GraphicalReportHandler, IntoDiagnostic, Report};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rustyline::{DefaultEditor, error::ReadlineError};
use tracing::{debug, info, warn};

const PROMPT: &str = "Enter a Chemical Formula (e.g., CO2): ";

/// Calculates the molar masses of chemical formulas like H2O, Al2(SO4)3, or CuSO4·5H2O
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Formulas to evaluate, an interactive prompt is started if none are given
    formulas: Vec<String>,

    /// A JSON element table to use instead of the built-in one
    #[arg(short, long, value_name = "PATH")]
    elements: Option<PathBuf>,

    /// The character separating a compound from its water of crystallisation
    #[arg(short, long, value_name = "CHAR", default_value_t = DEFAULT_HYDRATE_SEPARATOR)]
    separator: char,

    /// How deeply parenthetical groups may be nested
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Also show how much each element contributes to the molar mass
    #[arg(short, long)]
    breakdown: bool,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> miette::Result<ExitCode> {
    let args = Args::parse();
    logging::setup_logging(args.verbose, args.quiet);
    debug!(?args, "parsed command-line arguments");

    let table = match &args.elements {
        Some(path) => ElementTable::load(path).map_err(report)?,
        None => ElementTable::default(),
    };
    let options = ParseOptions::default()
        .with_hydrate_separator(args.separator)
        .map_err(report)?
        .with_max_depth(args.max_depth);
    info!(elements = table.len(), separator = %args.separator, max_depth = args.max_depth, "ready");

    if args.formulas.is_empty() {
        interactive(&table, &options, args.breakdown)?;
        Ok(ExitCode::SUCCESS)
    } else {
        let failures = batch(&table, &options, &args.formulas, args.breakdown);
        if failures == 0 {
            Ok(ExitCode::SUCCESS)
        } else {
            warn!(failures, total = args.formulas.len(), "some formulas could not be evaluated");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn interactive(table: &ElementTable, options: &ParseOptions, breakdown: bool) -> miette::Result<()> {
    let mut rl = DefaultEditor::new().into_diagnostic()?;
    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e).into_diagnostic(),
        };
        let formula = line.trim();
        if formula.is_empty() {
            continue;
        }
        rl.add_history_entry(formula).into_diagnostic()?;

        match molecule_info(table, options, formula, breakdown) {
            Ok(info) => print!("{info}"),
            Err(error) => eprint!("{}", render_error(*error)),
        }
    }
}

// NOTE: Results are collected before printing so that output follows the order the formulas were given in
fn batch(table: &ElementTable, options: &ParseOptions, formulas: &[String], breakdown: bool) -> usize {
    let results: Vec<_> = formulas
        .par_iter()
        .map(|formula| molecule_info(table, options, formula.trim(), breakdown))
        .collect();

    let mut failures = 0;
    for result in results {
        match result {
            Ok(info) => print!("{info}"),
            Err(error) => {
                failures += 1;
                eprint!("{}", render_error(*error));
            }
        }
    }
    failures
}

fn molecule_info(
    table: &ElementTable,
    options: &ParseOptions,
    formula: &str,
    breakdown: bool,
) -> Result<String> {
    let composition = ElementCount::with_options(table, formula, options)?;
    let mass = composition.mass(table).map_err(boxed)?;

    let mut lines = vec![format!(
        "The molar mass of {formula} is {} g/mol",
        decimal_round_workaround(mass, 3)
    )];
    if breakdown {
        for (symbol, count) in composition.iter() {
            let contribution = table
                .atomic_mass(symbol)
                .map_err(boxed)?
                .checked_mul(count)
                .ok_or_else(|| {
                    boxed(MassError::Overflow {
                        symbol: symbol.to_owned(),
                        count,
                    })
                })?;
            let percent = Decimal::from(contribution)
                .checked_div(mass.into())
                .unwrap_or_default()
                * Decimal::ONE_HUNDRED;
            let contribution = decimal_round_workaround(contribution, 3);
            let percent = decimal_round_workaround(percent, 2);
            lines.push(format!(
                "  {symbol:<2} {count:>4} {contribution:>10} g/mol {percent:>6}%"
            ));
        }
    }

    Ok(lines.join("\n") + "\n")
}

fn render_error(diagnostic: impl Into<Box<dyn Diagnostic + 'static>>) -> String {
    let diagnostic = diagnostic.into();
    let mut buf = String::new();
    if GraphicalReportHandler::new()
        .render_report(&mut buf, diagnostic.as_ref())
        .is_err()
    {
        buf = format!("{diagnostic}\n");
    }
    buf
}

fn report(error: Box<ChemformError>) -> Report {
    Report::new(*error)
}

fn boxed(error: impl Into<ChemformError>) -> Box<ChemformError> {
    Box::new(error.into())
}

// FIXME: Really this should be fixed in `rust_decimal`...
fn decimal_round_workaround(value: impl Into<Decimal>, decimal_points: u32) -> String {
    let value = value.into().round_dp(decimal_points);
    format!("{value:.precision$}", precision = decimal_points as usize)
}
