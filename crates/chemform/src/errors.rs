use miette::Diagnostic;
use thiserror::Error;

use crate::{
    elements::errors::{LookupError, MassError, TableError},
    parsers::errors::FormulaError,
};

pub type Result<T, E = Box<ChemformError>> = std::result::Result<T, E>;

// FIXME: Maybe just rename this to be `Error`?
#[derive(Debug, Diagnostic, Error)]
pub enum ChemformError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Formula {
        #[from]
        error: FormulaError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup {
        #[from]
        error: LookupError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Mass {
        #[from]
        error: MassError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Table {
        #[from]
        error: TableError,
    },

    #[diagnostic(help(
        "pick a character that can't otherwise appear in a formula, like '·', '*', or '.'"
    ))]
    #[error("{0:?} can't be used as a hydrate separator")]
    InvalidSeparator(char),
}

impl ChemformError {
    /// The classified [`FormulaError`], if this error came from parsing a formula
    #[must_use]
    pub const fn formula_error(&self) -> Option<&FormulaError> {
        if let Self::Formula { error } = self {
            Some(error)
        } else {
            None
        }
    }
}
