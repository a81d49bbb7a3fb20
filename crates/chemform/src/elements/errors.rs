use std::{io, path::PathBuf};

use miette::{Diagnostic, SourceSpan};
use rust_decimal::Decimal;
use thiserror::Error;

// NOTE: Public so that callers evaluating their own `ElementCount`s can inspect errors. I should consider marking it
// as #[non_exhaustive] so that it doesn't end up becoming SemVer nightmare...
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum LookupError {
    #[diagnostic(help(
        "double-check for typos (symbols are case-sensitive), or add a new entry to the element table"
    ))]
    #[error("the element {0:?} could not be found in the supplied element table")]
    Element(String),
}

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum MassError {
    #[diagnostic(transparent)]
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[diagnostic(help(
        "molar masses are limited to about 7.9e28 g/mol, check the element table for masses that are far too large"
    ))]
    #[error("the molar mass is too large to represent after adding {count} atoms of {symbol:?}")]
    Overflow { symbol: String, count: u64 },
}

impl LookupError {
    pub(crate) fn element(symbol: &str) -> Self {
        Self::Element(symbol.to_owned())
    }
}

#[derive(Debug, Diagnostic, Error)]
pub enum TableError {
    #[error("failed to read the element table at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[diagnostic(help(
        "element tables are JSON arrays of objects with name, symbol, atomic_number, atomic_mass, group, and \
        source fields"
    ))]
    #[error("the element table is not valid JSON")]
    Json {
        #[source_code]
        text: String,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error(
        "expected a single uppercase ASCII letter optionally followed by a lowercase ASCII letter, got {0:?}"
    )]
    InvalidSymbol(String),

    #[diagnostic(help("each element symbol may only appear once in the element table"))]
    #[error("the element {0:?} is defined more than once")]
    DuplicateSymbol(String),

    #[error("the atomic mass of {symbol:?} must be greater than zero, but it was {mass}")]
    NonPositiveMass { symbol: String, mass: Decimal },
}

impl TableError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();

        Self::Io { path, source }
    }

    pub(crate) fn json(text: &str, error: &serde_json::Error) -> Self {
        let offset = Self::line_column_offset(text, error.line(), error.column());
        let text = text.to_owned();
        let span = SourceSpan::from(offset..offset);
        let message = error.to_string();

        Self::Json {
            text,
            span,
            message,
        }
    }

    // NOTE: `serde_json` reports 1-based lines and columns, where a column of 0 means "before the first character"
    fn line_column_offset(text: &str, line: usize, column: usize) -> usize {
        let line_start: usize = text
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        (line_start + column.saturating_sub(1)).min(text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_offsets() {
        let text = "[\n  {\"symbol\": H}\n]";
        // Line 1, column 1 is the very first character
        assert_eq!(TableError::line_column_offset(text, 1, 1), 0);
        // Line 2, column 14 is the unquoted `H`
        assert_eq!(TableError::line_column_offset(text, 2, 14), 15);
        assert_eq!(&text[15..16], "H");
        // Offsets past the end of the input are clamped
        assert_eq!(TableError::line_column_offset(text, 9, 9), text.len());
    }

    #[test]
    fn mass_error_messages() {
        let error = MassError::from(LookupError::element("Xx"));
        assert_eq!(
            error.to_string(),
            r#"the element "Xx" could not be found in the supplied element table"#
        );
        let error = MassError::Overflow {
            symbol: "H".to_owned(),
            count: 42,
        };
        insta::assert_snapshot!(error, @r#"the molar mass is too large to represent after adding 42 atoms of "H""#);
    }

    #[test]
    fn lookup_error_message() {
        let error = LookupError::element("Xx");
        assert_eq!(
            error.to_string(),
            r#"the element "Xx" could not be found in the supplied element table"#
        );
    }
}
