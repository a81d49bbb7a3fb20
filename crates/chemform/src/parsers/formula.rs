// External Crate Imports
use nom::{branch::alt, character::complete::char, combinator::opt};

// Local Crate Imports
use super::{
    errors::{FormulaErrorKind, FormulaParseError, MultiplicityIssue, ParseResult, Unbalanced},
    primitives::{count, element_symbol, stray_letters},
};
use crate::{ElementCount, ElementTable, ParseOptions, elements::errors::LookupError};

// NOTE: `group` is recursive, and an opaque `impl FnMut` type can't contain itself, so the element table and depth
// limit are carried around in a struct instead of being captured by parser builders
pub(crate) struct FormulaParser<'a> {
    table: &'a ElementTable,
    max_depth: usize,
}

// Public API ==========================================================================================================

impl<'a> FormulaParser<'a> {
    pub(crate) const fn new(table: &'a ElementTable, options: &ParseOptions) -> Self {
        Self {
            table,
            max_depth: options.max_depth,
        }
    }

    /// Formula = Term , { Term } ;
    ///
    /// Consumes all of `i`, failing on anything that isn't part of a formula
    pub(crate) fn formula<'s>(&self, i: &'s str) -> ParseResult<'s, ElementCount> {
        let (rest, composition) = self.terms(i, 0)?;
        if !rest.is_empty() {
            return Err(unexpected(rest));
        }
        if composition.is_empty() {
            return FormulaParseError::fail(i, i.len(), FormulaErrorKind::EmptyFormula);
        }
        Ok((rest, composition))
    }
}

// Private Sub-Parsers =================================================================================================

impl FormulaParser<'_> {
    /// { Term }
    fn terms<'s>(&self, i: &'s str, depth: usize) -> ParseResult<'s, ElementCount> {
        let mut composition = ElementCount::default();
        let mut input = i;
        loop {
            match self.term(input, depth) {
                Ok((rest, term)) => {
                    composition = composition.checked_add(&term).ok_or_else(|| {
                        overflow(input, input.len() - rest.len())
                    })?;
                    input = rest;
                }
                Err(nom::Err::Error(_)) => return Ok((input, composition)),
                Err(e) => return Err(e),
            }
        }
    }

    /// Term = ( Element | Group ) , [ Count ] ;
    fn term<'s>(&self, i: &'s str, depth: usize) -> ParseResult<'s, ElementCount> {
        let (rest, composition) = alt((
            |i: &'s str| self.element(i),
            |i: &'s str| self.group(i, depth),
            unknown_letters,
        ))(i)?;
        let (rest, multiplier) = opt(count)(rest)?;

        match multiplier {
            Some(multiplier) => {
                let composition = composition
                    .checked_mul(multiplier)
                    .ok_or_else(|| overflow(i, i.len() - rest.len()))?;
                Ok((rest, composition))
            }
            None => Ok((rest, composition)),
        }
    }

    /// Element = uppercase , [ lowercase ] ;
    fn element<'s>(&self, i: &'s str) -> ParseResult<'s, ElementCount> {
        let (rest, symbol) = element_symbol(i)?;
        if self.table.contains(symbol) {
            Ok((rest, ElementCount::single(symbol)))
        } else {
            let lookup_error = LookupError::element(symbol);
            FormulaParseError::fail(i, symbol.len(), FormulaErrorKind::UnknownSymbol(lookup_error))
        }
    }

    /// Group = "(" , Term , { Term } , ")" ;
    fn group<'s>(&self, i: &'s str, depth: usize) -> ParseResult<'s, ElementCount> {
        let (inner, _) = char('(')(i)?;
        if depth >= self.max_depth {
            return FormulaParseError::fail(
                i,
                1,
                FormulaErrorKind::TooDeeplyNested(self.max_depth),
            );
        }

        let (rest, composition) = self.terms(inner, depth + 1)?;
        match char::<_, FormulaParseError>(')')(rest) {
            Ok((rest, _)) if composition.is_empty() => {
                FormulaParseError::fail(i, i.len() - rest.len(), FormulaErrorKind::EmptyGroup)
            }
            Ok((rest, _)) => Ok((rest, composition)),
            Err(_) if rest.is_empty() => FormulaParseError::fail(
                i,
                1,
                FormulaErrorKind::UnbalancedParentheses(Unbalanced::MissingClose),
            ),
            Err(_) => Err(unexpected(rest)),
        }
    }
}

// NOTE: Lowercase letters can never start an element symbol, so they're reported as unknown symbols rather than
// being left for the caller to trip over
fn unknown_letters(i: &str) -> ParseResult<ElementCount> {
    let (_, letters) = stray_letters(i)?;
    let lookup_error = LookupError::element(letters);
    FormulaParseError::fail(i, letters.len(), FormulaErrorKind::UnknownSymbol(lookup_error))
}

// Error Classification ================================================================================================

/// Classifies whatever stopped a run of terms
fn unexpected(i: &str) -> nom::Err<FormulaParseError<'_>> {
    let (kind, length) = match i.chars().next() {
        Some(')') => (FormulaErrorKind::UnbalancedParentheses(Unbalanced::MissingOpen), 1),
        Some(c) if c.is_ascii_digit() => {
            let digits = i.bytes().take_while(u8::is_ascii_digit).count();
            (FormulaErrorKind::InvalidMultiplicity(MultiplicityIssue::Misplaced), digits)
        }
        Some(c) => (FormulaErrorKind::InvalidCharacter(c), c.len_utf8()),
        None => (FormulaErrorKind::EmptyFormula, 0),
    };
    nom::Err::Failure(FormulaParseError::new(i, length, kind))
}

fn overflow(i: &str, length: usize) -> nom::Err<FormulaParseError<'_>> {
    let kind = FormulaErrorKind::InvalidMultiplicity(MultiplicityIssue::Overflow);
    nom::Err::Failure(FormulaParseError::new(i, length, kind))
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use insta::assert_debug_snapshot;
    use once_cell::sync::Lazy;

    use super::*;

    static DB: Lazy<ElementTable> = Lazy::new(ElementTable::default);

    fn parse(formula: &str) -> Result<ElementCount, (FormulaErrorKind, usize, usize)> {
        parse_with(formula, &ParseOptions::default())
    }

    fn parse_with(
        formula: &str,
        options: &ParseOptions,
    ) -> Result<ElementCount, (FormulaErrorKind, usize, usize)> {
        let parser = FormulaParser::new(&DB, options);
        match parser.formula(formula) {
            Ok((_, composition)) => Ok(composition),
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
                let error = e.into_final_error(formula);
                let span = error.span();
                Err((error.kind().clone(), span.offset(), span.len()))
            }
            Err(nom::Err::Incomplete(_)) => unreachable!(),
        }
    }

    fn unknown(symbol: &str) -> FormulaErrorKind {
        FormulaErrorKind::UnknownSymbol(LookupError::element(symbol))
    }

    #[test]
    fn simple_formulas() {
        macro_rules! assert_counts {
            ($formula:literal, [$(($symbol:literal, $count:literal)),+ $(,)?]) => {
                let expected: ElementCount = [$(($symbol, $count)),+].into_iter().collect();
                assert_eq!(parse($formula), Ok(expected));
            };
        }
        assert_counts!("H", [("H", 1)]);
        assert_counts!("H2", [("H", 2)]);
        assert_counts!("H2O", [("H", 2), ("O", 1)]);
        assert_counts!("NaCl", [("Na", 1), ("Cl", 1)]);
        assert_counts!("C6H12O6", [("C", 6), ("H", 12), ("O", 6)]);
        // Two-letter symbols are always preferred
        assert_counts!("Co", [("Co", 1)]);
        assert_counts!("CO", [("C", 1), ("O", 1)]);
        // Repeated elements are summed, not overwritten
        assert_counts!("CH3COOH", [("C", 2), ("H", 4), ("O", 2)]);
        assert_counts!("HOH", [("H", 2), ("O", 1)]);
    }

    #[test]
    fn nested_groups() {
        assert_debug_snapshot!(parse("Al2(SO4)3").unwrap(), @r#"
        ElementCount(
            {
                "Al": 2,
                "O": 12,
                "S": 3,
            },
        )
        "#);
        assert_debug_snapshot!(parse("K4(Fe(CN)6)").unwrap(), @r#"
        ElementCount(
            {
                "C": 6,
                "Fe": 1,
                "K": 4,
                "N": 6,
            },
        )
        "#);
        assert_debug_snapshot!(parse("((CH3)3C)2O").unwrap(), @r#"
        ElementCount(
            {
                "C": 8,
                "H": 18,
                "O": 1,
            },
        )
        "#);
        // Groups without a trailing count are counted once
        assert_eq!(parse("(OH)"), parse("OH"));
        assert_eq!(parse("Ca(OH)2"), parse("CaO2H2"));
    }

    #[test]
    fn unknown_symbols() {
        assert_eq!(parse("Xx2"), Err((unknown("Xx"), 0, 2)));
        assert_eq!(parse("H2Xx"), Err((unknown("Xx"), 2, 2)));
        // Symbols are case-sensitive
        assert_eq!(parse("h2o"), Err((unknown("h"), 0, 1)));
        assert_eq!(parse("HCL"), Err((unknown("L"), 2, 1)));
        assert_eq!(parse("NaCl(abc)"), Err((unknown("abc"), 5, 3)));
        // The longest match wins, even when the shorter symbol exists
        assert_eq!(parse("Hx"), Err((unknown("Hx"), 0, 2)));
        assert_eq!(parse("Cq"), Err((unknown("Cq"), 0, 2)));
    }

    #[test]
    fn unbalanced_parentheses() {
        let missing_close = FormulaErrorKind::UnbalancedParentheses(Unbalanced::MissingClose);
        let missing_open = FormulaErrorKind::UnbalancedParentheses(Unbalanced::MissingOpen);
        assert_eq!(parse("("), Err((missing_close.clone(), 0, 1)));
        assert_eq!(parse(")"), Err((missing_open.clone(), 0, 1)));
        assert_eq!(parse("Al2(SO4"), Err((missing_close.clone(), 3, 1)));
        assert_eq!(parse("Al2SO4)3"), Err((missing_open.clone(), 6, 1)));
        assert_eq!(parse("((OH)2"), Err((missing_close, 0, 1)));
        assert_eq!(parse("(OH))"), Err((missing_open, 4, 1)));
    }

    #[test]
    fn empty_formulas_and_groups() {
        assert_eq!(parse(""), Err((FormulaErrorKind::EmptyFormula, 0, 0)));
        assert_eq!(parse("()"), Err((FormulaErrorKind::EmptyGroup, 0, 2)));
        assert_eq!(parse("H2()3"), Err((FormulaErrorKind::EmptyGroup, 2, 2)));
        assert_eq!(parse("((H)())"), Err((FormulaErrorKind::EmptyGroup, 4, 2)));
    }

    #[test]
    fn invalid_multiplicities() {
        let issue = |issue| FormulaErrorKind::InvalidMultiplicity(issue);
        assert_eq!(parse("H0"), Err((issue(MultiplicityIssue::Zero), 1, 1)));
        assert_eq!(parse("(OH)0"), Err((issue(MultiplicityIssue::Zero), 4, 1)));
        assert_eq!(parse("NH02"), Err((issue(MultiplicityIssue::LeadingZero), 2, 2)));
        assert_eq!(parse("H99999999999"), Err((issue(MultiplicityIssue::TooLarge), 1, 11)));
        assert_eq!(parse("2H2O"), Err((issue(MultiplicityIssue::Misplaced), 0, 1)));
        assert_eq!(parse("(12H)"), Err((issue(MultiplicityIssue::Misplaced), 1, 2)));
        assert_eq!(
            parse("((H4294967295)4294967295)4294967295"),
            Err((issue(MultiplicityIssue::Overflow), 0, 35))
        );
    }

    #[test]
    fn invalid_characters() {
        assert_eq!(parse("H2O!"), Err((FormulaErrorKind::InvalidCharacter('!'), 3, 1)));
        assert_eq!(parse("H2 O"), Err((FormulaErrorKind::InvalidCharacter(' '), 2, 1)));
        assert_eq!(parse("[2H]2O"), Err((FormulaErrorKind::InvalidCharacter('['), 0, 1)));
        assert_eq!(parse("(H2O+"), Err((FormulaErrorKind::InvalidCharacter('+'), 4, 1)));
        // Multi-byte characters are spanned in full
        assert_eq!(parse("H2O·"), Err((FormulaErrorKind::InvalidCharacter('·'), 3, 2)));
    }

    #[test]
    fn nesting_limits() {
        let shallow = ParseOptions::default().with_max_depth(2);
        assert!(parse_with("((H))", &shallow).is_ok());
        assert_eq!(
            parse_with("(((H)))", &shallow),
            Err((FormulaErrorKind::TooDeeplyNested(2), 2, 1))
        );
        let flat = ParseOptions::default().with_max_depth(0);
        assert!(parse_with("H2O", &flat).is_ok());
        assert_eq!(
            parse_with("(OH)2", &flat),
            Err((FormulaErrorKind::TooDeeplyNested(0), 0, 1))
        );
        // Pathological nesting fails cleanly instead of overflowing the stack
        let deep = format!("{}H{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(
            parse(&deep),
            Err((FormulaErrorKind::TooDeeplyNested(crate::DEFAULT_MAX_DEPTH), 32, 1))
        );
    }

    #[test]
    fn first_error_wins() {
        // Both an unknown symbol and an invalid character, but the symbol comes first
        assert_eq!(parse("Xx!"), Err((unknown("Xx"), 0, 2)));
        assert_eq!(parse("!Xx"), Err((FormulaErrorKind::InvalidCharacter('!'), 0, 1)));
        // Errors deep inside groups abort the whole parse
        assert_eq!(parse("Ca((OH)0)2"), Err((FormulaErrorKind::InvalidMultiplicity(MultiplicityIssue::Zero), 7, 1)));
    }
}
