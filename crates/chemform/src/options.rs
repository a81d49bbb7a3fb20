use crate::{ChemformError, ParseOptions, Result};

/// The middle dot used in formulas like `CuSO4·5H2O`
pub const DEFAULT_HYDRATE_SEPARATOR: char = '·';

/// The deepest parentheses are allowed to nest before a formula is rejected
pub const DEFAULT_MAX_DEPTH: usize = 32;

impl ParseOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hydrate_separator: DEFAULT_HYDRATE_SEPARATOR,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the character separating a compound from its water of crystallisation
    ///
    /// # Errors
    ///
    /// Returns [`ChemformError::InvalidSeparator`] if `separator` could be mistaken for part of a formula: ASCII
    /// letters and digits, parentheses, and whitespace are all rejected
    pub fn with_hydrate_separator(self, separator: char) -> Result<Self> {
        if separator.is_ascii_alphanumeric() || matches!(separator, '(' | ')') || separator.is_whitespace() {
            return Err(Box::new(ChemformError::InvalidSeparator(separator)));
        }

        Ok(Self {
            hydrate_separator: separator,
            ..self
        })
    }

    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    #[must_use]
    pub const fn hydrate_separator(&self) -> char {
        self.hydrate_separator
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
