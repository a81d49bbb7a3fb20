//! Parsing of chemical formulas and calculation of their molar masses

pub mod composition;
pub mod elements;
pub mod errors;
mod hydrate;
mod options;
pub mod parsers;
#[cfg(test)]
mod testing_tools;

use std::{collections::BTreeMap, num::NonZeroU32};

// External Crate Imports
use ahash::HashMap;
use rust_decimal::Decimal;
use tracing::debug;

// FIXME: Work on what's publicly exported / part of the API! Maybe create a prelude?
pub use elements::element_table::{DEFAULT_JSON, ElementRecord};
pub use errors::{ChemformError, Result};
pub use options::{DEFAULT_HYDRATE_SEPARATOR, DEFAULT_MAX_DEPTH};
pub use parsers::errors::{FormulaError, FormulaErrorKind};

// NOTE: Everything in this crate borrows the `ElementTable` immutably. Once it's been loaded, nothing is allowed to
// change it, so a single table can be shared freely between threads
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ElementTable {
    elements: HashMap<String, Element>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Element {
    symbol: String,
    name: String,
    atomic_number: u32,
    atomic_mass: Mass,
    group: String,
    source: String,
}

// NOTE: A `BTreeMap` keeps the symbols sorted, which gives the canonical formula ordering for free
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ElementCount(BTreeMap<String, u64>);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Count(NonZeroU32);

/// A molar mass in g/mol
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Mass(Decimal);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ParseOptions {
    hydrate_separator: char,
    max_depth: usize,
}

// Public API ==========================================================================================================

/// Calculates the molar mass of `formula` using the default [`ParseOptions`]
///
/// # Errors
///
/// Returns a [`FormulaError`] if the formula is malformed or mentions an element missing from `table`, and a
/// [`MassError`](elements::errors::MassError) if its mass is too large to represent
pub fn molar_mass(table: &ElementTable, formula: impl AsRef<str>) -> Result<Mass> {
    molar_mass_with(table, formula, &ParseOptions::default())
}

/// Calculates the molar mass of `formula`, parsing it according to `options`
///
/// # Errors
///
/// Returns a [`FormulaError`] if the formula is malformed or mentions an element missing from `table`, and a
/// [`MassError`](elements::errors::MassError) if its mass is too large to represent
pub fn molar_mass_with(
    table: &ElementTable,
    formula: impl AsRef<str>,
    options: &ParseOptions,
) -> Result<Mass> {
    let formula = formula.as_ref();
    let composition = ElementCount::with_options(table, formula, options)?;
    let mass = composition
        .mass(table)
        .map_err(|e| Box::new(ChemformError::from(e)))?;
    debug!(formula, %composition, %mass, "calculated molar mass");
    Ok(mass)
}

// Module Tests ========================================================================================================
