// External Crate Imports
use nom::combinator::opt;

// Local Crate Imports
use crate::{
    ElementCount, ElementTable, ParseOptions,
    parsers::{
        errors::{FormulaErrorKind, FormulaParseError, HydrateIssue, MultiplicityIssue, ParseResult},
        formula::FormulaParser,
        primitives::count,
    },
};

/// Hydrate = Formula , [ Separator , [ Count ] , Formula ] ;
///
/// The water of crystallisation (or whatever else follows the separator) is scaled by its leading count and merged
/// into the compound, so `CuSO4·5H2O` is counted the same as `CuSO4H10O5`
pub(crate) fn hydrate<'s>(
    table: &ElementTable,
    options: &ParseOptions,
    formula: &'s str,
) -> ParseResult<'s, ElementCount> {
    let parser = FormulaParser::new(table, options);
    let separator = options.hydrate_separator;

    let Some((compound, hydrate)) = formula.split_once(separator) else {
        return parser.formula(formula);
    };
    let separator_slice = &formula[compound.len()..];
    let malformed = |input, length, issue| {
        FormulaParseError::fail(input, length, FormulaErrorKind::MalformedHydrate(issue))
    };

    if compound.is_empty() {
        return malformed(separator_slice, separator.len_utf8(), HydrateIssue::MissingCompound);
    }
    if let Some(extra) = hydrate.find(separator) {
        return malformed(&hydrate[extra..], separator.len_utf8(), HydrateIssue::ExtraSeparator);
    }

    let (_, anhydrous) = parser.formula(compound)?;
    let (body, multiplier) = opt(count)(hydrate)?;
    if body.is_empty() {
        return malformed(separator_slice, separator_slice.len(), HydrateIssue::MissingHydrate);
    }
    let (rest, water) = parser.formula(body)?;

    let overflow = |input: &'s str| {
        let kind = FormulaErrorKind::InvalidMultiplicity(MultiplicityIssue::Overflow);
        FormulaParseError::fail(input, input.len(), kind)
    };
    let Some(water) = water.checked_mul(multiplier.unwrap_or_default()) else {
        return overflow(hydrate);
    };
    match anhydrous.checked_add(&water) {
        Some(composition) => Ok((rest, composition)),
        None => overflow(formula),
    }
}
