use std::fmt::{self, Display, Formatter};

// External Crate Imports
use nom::Finish;
use tracing::trace;

// Local Crate Imports
use crate::{
    ChemformError, Count, ElementCount, ElementTable, Mass, ParseOptions, Result,
    elements::errors::MassError,
    hydrate::hydrate,
    parsers::{
        errors::{FormulaErrorKind, FormulaParseError},
        primitives::normalize_subscripts,
    },
};

// Public API ==========================================================================================================

impl ElementCount {
    /// Parses `formula` into the number of atoms of each element, using the default [`ParseOptions`]
    ///
    /// # Errors
    ///
    /// Returns a [`FormulaError`](crate::FormulaError) describing the first problem found in `formula`
    pub fn new(table: &ElementTable, formula: impl AsRef<str>) -> Result<Self> {
        Self::with_options(table, formula, &ParseOptions::default())
    }

    /// Parses `formula` into the number of atoms of each element, according to `options`
    ///
    /// # Errors
    ///
    /// Returns a [`FormulaError`](crate::FormulaError) describing the first problem found in `formula`
    pub fn with_options(
        table: &ElementTable,
        formula: impl AsRef<str>,
        options: &ParseOptions,
    ) -> Result<Self> {
        let formula = normalize_subscripts(formula.as_ref());

        let parsed = if formula.trim().is_empty() {
            FormulaParseError::fail(&formula, formula.len(), FormulaErrorKind::EmptyFormula)
        } else {
            hydrate(table, options, &formula)
        };

        match parsed.finish() {
            Ok((_, composition)) => {
                trace!(formula = %formula, %composition, "parsed chemical formula");
                Ok(composition)
            }
            Err(e) => Err(Box::new(ChemformError::from(e.into_final_error(&formula)))),
        }
    }

    /// Sums the atomic mass of every atom, looking each element up in `table`
    ///
    /// # Errors
    ///
    /// Returns a [`MassError`] if any element is missing from `table`, or if the total mass is too large to represent
    pub fn mass(&self, table: &ElementTable) -> Result<Mass, MassError> {
        self.iter()
            .try_fold(Mass::default(), |total, (symbol, count)| -> Result<Mass, MassError> {
                let atomic_mass = table.atomic_mass(symbol)?;
                atomic_mass
                    .checked_mul(count)
                    .and_then(|mass| total.checked_add(mass))
                    .ok_or_else(|| MassError::Overflow {
                        symbol: symbol.to_owned(),
                        count,
                    })
            })
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<u64> {
        self.0.get(symbol).copied()
    }

    /// Iterates over each element and its count, sorted by symbol
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(symbol, &count)| (symbol.as_str(), count))
    }

    /// The number of distinct elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Composition Arithmetic ==============================================================================================

impl ElementCount {
    pub(crate) fn single(symbol: &str) -> Self {
        Self([(symbol.to_owned(), 1)].into())
    }

    pub(crate) fn checked_add(mut self, other: &Self) -> Option<Self> {
        for (symbol, &count) in &other.0 {
            let total = self.0.entry(symbol.clone()).or_default();
            *total = total.checked_add(count)?;
        }
        Some(self)
    }

    pub(crate) fn checked_mul(mut self, multiplier: Count) -> Option<Self> {
        let multiplier = u64::from(multiplier);
        for count in self.0.values_mut() {
            *count = count.checked_mul(multiplier)?;
        }
        Some(self)
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for ElementCount {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut counts = Self::default();
        for (symbol, count) in iter {
            *counts.0.entry(symbol.into()).or_default() += count;
        }
        counts.0.retain(|_, &mut count| count > 0);
        counts
    }
}

// Display Trait Implementations =======================================================================================

// NOTE: Writes the canonical formula, with elements sorted by symbol and any counts of 1 left implicit
impl Display for ElementCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (symbol, count) in self.iter() {
            if count == 1 {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}{count}")?;
            }
        }
        Ok(())
    }
}

// Module Tests ========================================================================================================
