// Standard Library Imports
use std::{fs, path::Path};

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Local Crate Imports
use super::errors::{LookupError, TableError};
use crate::{ChemformError, Element, ElementTable, Mass, Result};

/// The table of 118 elements built by `elements-builder`
pub const DEFAULT_JSON: &str = include_str!("../../data/elements.json");

// Public API ==========================================================================================================

impl ElementTable {
    /// Parses and validates an element table from a JSON array of [`ElementRecord`]s
    ///
    /// # Errors
    ///
    /// Fails if `text` isn't valid JSON, or if any record has a malformed or duplicate symbol, or a non-positive
    /// atomic mass
    pub fn from_json(text: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref();
        let records: Vec<ElementRecord> =
            serde_json::from_str(text).map_err(|e| table_error(TableError::json(text, &e)))?;
        Self::from_records(records)
    }

    /// Reads an element table from a JSON file on disk
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read, or if its contents are rejected by [`ElementTable::from_json`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| table_error(TableError::io(path, e)))?;
        let table = Self::from_json(text)?;
        debug!(path = %path.display(), elements = table.len(), "loaded element table");
        Ok(table)
    }

    /// Builds a validated element table from already-deserialized records
    ///
    /// # Errors
    ///
    /// Fails if any record has a malformed or duplicate symbol, or a non-positive atomic mass
    pub fn from_records(records: impl IntoIterator<Item = ElementRecord>) -> Result<Self> {
        let mut elements = HashMap::new();
        for record in records {
            let element = Element::try_from(record).map_err(table_error)?;
            if let Some(duplicate) = elements.insert(element.symbol.clone(), element) {
                return Err(table_error(TableError::DuplicateSymbol(duplicate.symbol)));
            }
        }
        Ok(Self { elements })
    }

    /// Builds a bare table mapping symbols to atomic masses, for calculations with custom or synthetic data
    ///
    /// The remaining metadata is filled with placeholders: each symbol doubles as its own name, and atomic numbers
    /// follow the order the masses were given in.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`ElementTable::from_records`]
    pub fn from_masses<S: Into<String>>(
        masses: impl IntoIterator<Item = (S, Decimal)>,
    ) -> Result<Self> {
        let records = masses.into_iter().zip(1..).map(|((symbol, atomic_mass), atomic_number)| {
            let symbol = symbol.into();
            ElementRecord {
                name: symbol.clone(),
                symbol,
                atomic_number,
                atomic_mass,
                group: String::new(),
                source: String::new(),
            }
        });
        Self::from_records(records)
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Element> {
        self.elements.get(symbol)
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.elements.contains_key(symbol)
    }

    /// Looks up the atomic mass of the element with `symbol`
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] if there is no element with that (case-sensitive) symbol
    pub fn atomic_mass(&self, symbol: &str) -> Result<Mass, LookupError> {
        self.get(symbol)
            .map(Element::atomic_mass)
            .ok_or_else(|| LookupError::element(symbol))
    }

    #[must_use]
    pub fn by_atomic_number(&self, atomic_number: u32) -> Option<&Element> {
        self.elements
            .values()
            .find(|e| e.atomic_number == atomic_number)
    }

    /// Iterates over every element in the table, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        // SAFETY: The embedded table is checked by the `build_default_element_table` test below
        Self::from_json(DEFAULT_JSON).unwrap()
    }
}

impl Element {
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn atomic_number(&self) -> u32 {
        self.atomic_number
    }

    #[must_use]
    pub const fn atomic_mass(&self) -> Mass {
        self.atomic_mass
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

// JSON File Schema ====================================================================================================

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct ElementRecord {
    pub name: String,
    pub symbol: String,
    pub atomic_number: u32,
    // NOTE: Masses are written as plain JSON numbers, but read losslessly from their shortest decimal representation
    #[serde(with = "rust_decimal::serde::float")]
    pub atomic_mass: Decimal,
    pub group: String,
    pub source: String,
}

impl From<&Element> for ElementRecord {
    fn from(element: &Element) -> Self {
        Self {
            name: element.name.clone(),
            symbol: element.symbol.clone(),
            atomic_number: element.atomic_number,
            atomic_mass: element.atomic_mass.value(),
            group: element.group.clone(),
            source: element.source.clone(),
        }
    }
}

// Conversion From Parsed JSON to Internal Representation ==============================================================

impl TryFrom<ElementRecord> for Element {
    type Error = TableError;

    fn try_from(
        ElementRecord {
            name,
            symbol,
            atomic_number,
            atomic_mass,
            group,
            source,
        }: ElementRecord,
    ) -> Result<Self, Self::Error> {
        if !is_element_symbol(&symbol) {
            return Err(TableError::InvalidSymbol(symbol));
        }

        if atomic_mass <= Decimal::ZERO {
            return Err(TableError::NonPositiveMass {
                symbol,
                mass: atomic_mass,
            });
        }

        Ok(Self {
            symbol,
            name,
            atomic_number,
            atomic_mass: Mass::new(atomic_mass),
            group,
            source,
        })
    }
}

// Element Symbol Validation ===========================================================================================

fn is_element_symbol(symbol: &str) -> bool {
    let chrs: Vec<_> = symbol.chars().collect();
    match chrs[..] {
        [f] => f.is_ascii_uppercase(),
        [f, l] => f.is_ascii_uppercase() && l.is_ascii_lowercase(),
        _ => false,
    }
}

fn table_error(error: TableError) -> Box<ChemformError> {
    Box::new(error.into())
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rust_decimal_macros::dec;

    use super::*;

    fn table_error_message(result: Result<ElementTable>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn build_default_element_table() {
        let db = ElementTable::from_json(DEFAULT_JSON).unwrap();
        // Basic property checking
        assert_eq!(db.len(), 118);
        assert_eq!(db.atomic_mass("Pb"), Ok(Mass(dec!(207.2))));
        assert_eq!(db.atomic_mass("S"), Ok(Mass(dec!(32.065))));
        assert_eq!(db.by_atomic_number(19).map(Element::name), Some("Potassium"));
        assert_eq!(db.by_atomic_number(118).map(Element::symbol), Some("Og"));
        assert_eq!(db.by_atomic_number(119), None);
        // Every atomic number from 1 to 118 is present exactly once
        let mut atomic_numbers: Vec<_> = db.iter().map(Element::atomic_number).collect();
        atomic_numbers.sort_unstable();
        assert_eq!(atomic_numbers, (1..=118).collect::<Vec<_>>());
    }

    #[test]
    fn element_metadata() {
        let db = ElementTable::default();
        let copper = db.get("Cu").unwrap();
        assert_eq!(copper.symbol(), "Cu");
        assert_eq!(copper.name(), "Copper");
        assert_eq!(copper.atomic_number(), 29);
        assert_eq!(copper.atomic_mass(), Mass(dec!(63.55)));
        assert_eq!(copper.group(), "Transition Metal");
        assert!(copper.source().contains("pubchem"));
        // Some masses come from the Royal Society of Chemistry instead
        assert!(db.get("Pb").unwrap().source().contains("rsc"));
    }

    #[test]
    fn case_sensitive_lookups() {
        let db = ElementTable::default();
        assert!(db.contains("Co"));
        assert!(!db.contains("CO"));
        assert!(!db.contains("co"));
        assert_eq!(
            db.atomic_mass("Xx"),
            Err(LookupError::Element("Xx".to_owned()))
        );
    }

    #[test]
    fn from_masses() {
        let db = ElementTable::from_masses([("H", dec!(1.008)), ("O", dec!(15.999))]).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.atomic_mass("O"), Ok(Mass(dec!(15.999))));
        assert_eq!(db.get("O").map(Element::atomic_number), Some(2));
        assert_eq!(db.get("O").map(Element::name), Some("O"));
    }

    #[test]
    fn records_round_trip() {
        let db = ElementTable::default();
        let records: Vec<_> = db.iter().map(ElementRecord::from).collect();
        assert_eq!(ElementTable::from_records(records).unwrap(), db);
    }

    #[test]
    fn element_symbol_validation() {
        // Valid Element Symbols
        assert!(is_element_symbol("H"));
        assert!(is_element_symbol("He"));
        // Invalid Element Symbols
        assert!(!is_element_symbol(""));
        assert!(!is_element_symbol("h"));
        assert!(!is_element_symbol("HE"));
        assert!(!is_element_symbol("Hel"));
        assert!(!is_element_symbol("1H"));
        assert!(!is_element_symbol("Hé"));
    }

    #[test]
    fn invalid_tables() {
        let lowercase = ElementTable::from_masses([("h", dec!(1.008))]);
        insta::assert_snapshot!(table_error_message(lowercase), @r#"expected a single uppercase ASCII letter optionally followed by a lowercase ASCII letter, got "h""#);

        let duplicate = ElementTable::from_masses([("H", dec!(1.008)), ("H", dec!(1.007))]);
        insta::assert_snapshot!(table_error_message(duplicate), @r#"the element "H" is defined more than once"#);

        let weightless = ElementTable::from_masses([("H", dec!(0))]);
        insta::assert_snapshot!(table_error_message(weightless), @r#"the atomic mass of "H" must be greater than zero, but it was 0"#);

        let negative = ElementTable::from_masses([("H", dec!(-1.008))]);
        assert!(negative.is_err());
    }

    #[test]
    fn invalid_json() {
        let missing_mass = indoc! {r#"
            [
                {
                    "name": "Hydrogen",
                    "symbol": "H",
                    "atomic_number": 1,
                    "group": "Nonmetal",
                    "source": "https://pubchem.ncbi.nlm.nih.gov/ptable/atomic-mass/"
                }
            ]
        "#};
        let error = ElementTable::from_json(missing_mass).unwrap_err();
        assert_eq!(error.to_string(), "the element table is not valid JSON");
        assert!(matches!(*error, ChemformError::Table { error: TableError::Json { .. } }));

        let not_an_array = ElementTable::from_json(r#"{"H": 1.008}"#);
        assert!(not_an_array.is_err());
    }

    #[test]
    fn json_masses_are_exact() {
        let json = indoc! {r#"
            [
                {
                    "name": "Phosphorus",
                    "symbol": "P",
                    "atomic_number": 15,
                    "atomic_mass": 30.97376200,
                    "group": "Nonmetal",
                    "source": "https://pubchem.ncbi.nlm.nih.gov/ptable/atomic-mass/"
                }
            ]
        "#};
        let db = ElementTable::from_json(json).unwrap();
        assert_eq!(db.atomic_mass("P"), Ok(Mass(dec!(30.973762))));
    }

    #[test]
    fn load_missing_file() {
        let error = ElementTable::load("this/file/does/not/exist.json").unwrap_err();
        assert!(matches!(*error, ChemformError::Table { error: TableError::Io { .. } }));
    }
}
