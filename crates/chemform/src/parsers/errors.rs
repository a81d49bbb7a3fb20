use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};
use nom::{IResult, error::ErrorKind, error::ParseError};
use thiserror::Error;

use crate::elements::errors::LookupError;

pub type ParseResult<'s, O> = IResult<&'s str, O, FormulaParseError<'s>>;

// NOTE: Public so that callers can inspect errors, though I should consider marking these as #[non_exhaustive] so that they
// don't end up becoming SemVer nightmares...
#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum FormulaErrorKind {
    #[diagnostic(help(
        "formulas may only contain element symbols, counts, parentheses, and a single hydrate separator"
    ))]
    #[error("the character {0:?} is not allowed in a chemical formula")]
    InvalidCharacter(char),

    #[diagnostic(transparent)]
    #[error(transparent)]
    UnknownSymbol(LookupError),

    #[diagnostic(transparent)]
    #[error(transparent)]
    UnbalancedParentheses(Unbalanced),

    #[diagnostic(help("try something like H2O or Al2(SO4)3"))]
    #[error("expected a chemical formula, but the input was empty")]
    EmptyFormula,

    #[diagnostic(help("put at least one element inside the parentheses, or remove them entirely"))]
    #[error("parenthetical groups cannot be empty")]
    EmptyGroup,

    #[diagnostic(transparent)]
    #[error(transparent)]
    InvalidMultiplicity(MultiplicityIssue),

    #[diagnostic(help("flatten some of the inner groups, or raise the nesting limit"))]
    #[error("parentheses can't be nested more than {0} levels deep")]
    TooDeeplyNested(usize),

    #[diagnostic(transparent)]
    #[error(transparent)]
    MalformedHydrate(HydrateIssue),

    #[diagnostic(help(
        "this is an internal error that you shouldn't ever see! If you have gotten this error, \
        then please report it as a bug!"
    ))]
    #[error("internal `nom` error: {0:?}")]
    NomError(ErrorKind),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum Unbalanced {
    #[diagnostic(help("add a ')' to close this group"))]
    #[error("unbalanced parentheses: this '(' is never closed")]
    MissingClose,

    #[diagnostic(help("you've probably forgotten to open a group with '(' earlier in the formula"))]
    #[error("unbalanced parentheses: this ')' has no matching '('")]
    MissingOpen,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum MultiplicityIssue {
    #[diagnostic(help("a 0 value doesn't make sense here, remove the element or group instead"))]
    #[error("counts must be greater than zero")]
    Zero,

    #[diagnostic(help(
        "if you've mistakenly included a leading zero, like NH02, try just NH2 instead"
    ))]
    #[error("counts cannot start with 0")]
    LeadingZero,

    #[error("count is too large, the largest supported count is {}", u32::MAX)]
    TooLarge,

    #[diagnostic(help(
        "counts must directly follow the element or group they multiply, like H2O rather than 2HO"
    ))]
    #[error("found a count that doesn't follow an element or group")]
    Misplaced,

    #[error("the total number of atoms for an element is too large to count")]
    Overflow,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum HydrateIssue {
    #[diagnostic(help("formulas may only contain a single hydrate separator, like CuSO4·5H2O"))]
    #[error("malformed hydrate: found more than one hydrate separator")]
    ExtraSeparator,

    #[diagnostic(help("write the anhydrous compound before the separator, like CuSO4·5H2O"))]
    #[error("malformed hydrate: missing the compound before the hydrate separator")]
    MissingCompound,

    #[diagnostic(help("write the water of crystallisation after the separator, like CuSO4·5H2O"))]
    #[error("malformed hydrate: missing the formula after the hydrate separator")]
    MissingHydrate,
}

impl FormulaErrorKind {
    fn label(&self) -> Option<&'static str> {
        Some(match self {
            Self::InvalidCharacter(_) => "invalid character",
            Self::UnknownSymbol(_) => "element not found",
            Self::UnbalancedParentheses(Unbalanced::MissingClose) => "unclosed group",
            Self::UnbalancedParentheses(Unbalanced::MissingOpen) => "unopened group",
            Self::EmptyFormula => "no formula here",
            Self::EmptyGroup => "empty group",
            Self::InvalidMultiplicity(MultiplicityIssue::Zero) => "expected non-zero",
            Self::InvalidMultiplicity(MultiplicityIssue::LeadingZero) => "leading zero",
            Self::InvalidMultiplicity(MultiplicityIssue::TooLarge) => "count too large",
            Self::InvalidMultiplicity(MultiplicityIssue::Misplaced) => "misplaced count",
            Self::InvalidMultiplicity(MultiplicityIssue::Overflow) => "too many atoms",
            Self::TooDeeplyNested(_) => "nested too deeply",
            Self::MalformedHydrate(HydrateIssue::ExtraSeparator) => "extra separator",
            Self::MalformedHydrate(HydrateIssue::MissingCompound) => "nothing before this separator",
            Self::MalformedHydrate(HydrateIssue::MissingHydrate) => "nothing after this separator",
            Self::NomError(_) => "the region that triggered this bug!",
        })
    }
}

// Intermediate Parse Errors ===========================================================================================

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FormulaParseError<'s> {
    input: &'s str,
    length: usize,
    kind: FormulaErrorKind,
}

impl<'s> FormulaParseError<'s> {
    pub(crate) fn new(input: &'s str, length: usize, kind: FormulaErrorKind) -> Self {
        Self {
            input,
            length,
            kind,
        }
    }

    /// Aborts parsing entirely, there is no backtracking past a classified error
    pub(crate) fn fail<O>(
        input: &'s str,
        length: usize,
        kind: FormulaErrorKind,
    ) -> ParseResult<'s, O> {
        Err(nom::Err::Failure(Self::new(input, length, kind)))
    }

    pub(crate) const fn kind(&self) -> &FormulaErrorKind {
        &self.kind
    }

    pub(crate) fn into_final_error(self, full_input: &str) -> FormulaError {
        let span = self.span_from_input(full_input);
        // NOTE: The additional space is added so that Diagnostic labels can point to the end of an input
        let source_code = format!("{full_input} ");
        FormulaError {
            source_code,
            span,
            kind: self.kind,
        }
    }

    // NOTE: Every `input` handed out by the parsers is a sub-slice of the `full_input`, so their offset can be recovered
    // by comparing pointers
    fn span_from_input(&self, full_input: &str) -> SourceSpan {
        let base_addr = full_input.as_ptr() as usize;
        let substr_addr = self.input.as_ptr() as usize;
        let start = substr_addr.saturating_sub(base_addr).min(full_input.len());
        let length = self.length.min(full_input.len() - start);
        SourceSpan::from(start..start + length)
    }
}

impl<'s> ParseError<&'s str> for FormulaParseError<'s> {
    fn from_error_kind(input: &'s str, kind: ErrorKind) -> Self {
        Self::new(input, 0, FormulaErrorKind::NomError(kind))
    }

    fn append(_input: &str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

// Final Formula Errors ================================================================================================

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("{kind}")]
pub struct FormulaError {
    source_code: String,
    span: SourceSpan,
    kind: FormulaErrorKind,
}

impl FormulaError {
    #[must_use]
    pub const fn kind(&self) -> &FormulaErrorKind {
        &self.kind
    }

    /// The byte span of the offending part of the (subscript-normalised) formula
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }

    /// The formula that failed to parse, with any Unicode subscripts replaced by ASCII digits
    #[must_use]
    pub fn formula(&self) -> &str {
        self.source_code
            .strip_suffix(' ')
            .unwrap_or(&self.source_code)
    }

    /// The offending part of the formula
    #[must_use]
    pub fn offending(&self) -> &str {
        let start = self.span.offset();
        self.source_code
            .get(start..start + self.span.len())
            .unwrap_or_default()
    }
}

impl Diagnostic for FormulaError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = self.kind.label()?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(label.to_owned()),
            self.span,
        ))))
    }
}
