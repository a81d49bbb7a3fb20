use std::borrow::Cow;

use nom::{
    character::complete::{digit1, satisfy},
    combinator::{opt, recognize},
    multi::many1,
    sequence::pair,
};

use crate::Count;

use super::errors::{FormulaErrorKind, FormulaParseError, MultiplicityIssue, ParseResult};

/// uppercase
///   = "A" | "B" | "C" | "D" | "E" | "F" | "G"
///   | "H" | "I" | "J" | "K" | "L" | "M" | "N"
///   | "O" | "P" | "Q" | "R" | "S" | "T" | "U"
///   | "V" | "W" | "X" | "Y" | "Z"
///   ;
pub fn uppercase(i: &str) -> ParseResult<char> {
    satisfy(|c| c.is_ascii_uppercase())(i)
}

/// lowercase
///   = "a" | "b" | "c" | "d" | "e" | "f" | "g"
///   | "h" | "i" | "j" | "k" | "l" | "m" | "n"
///   | "o" | "p" | "q" | "r" | "s" | "t" | "u"
///   | "v" | "w" | "x" | "y" | "z"
///   ;
pub fn lowercase(i: &str) -> ParseResult<char> {
    satisfy(|c| c.is_ascii_lowercase())(i)
}

/// Element Symbol = uppercase , [ lowercase ] ;
pub fn element_symbol(i: &str) -> ParseResult<&str> {
    recognize(pair(uppercase, opt(lowercase)))(i)
}

/// Stray Letters = lowercase , { lowercase } ;
pub fn stray_letters(i: &str) -> ParseResult<&str> {
    recognize(many1(lowercase))(i)
}

/// Count = digit - "0" , { digit } ;
pub fn count(i: &str) -> ParseResult<Count> {
    let (rest, digits) = digit1(i)?;
    let invalid = |issue| {
        FormulaParseError::fail(
            i,
            digits.len(),
            FormulaErrorKind::InvalidMultiplicity(issue),
        )
    };

    if digits.bytes().all(|d| d == b'0') {
        return invalid(MultiplicityIssue::Zero);
    }
    if digits.starts_with('0') {
        return invalid(MultiplicityIssue::LeadingZero);
    }

    match digits.parse().ok().and_then(Count::new) {
        Some(count) => Ok((rest, count)),
        None => invalid(MultiplicityIssue::TooLarge),
    }
}

/// Replaces Unicode subscript digits (like the ones in H₂O) with their ASCII equivalents
#[must_use]
pub fn normalize_subscripts(formula: &str) -> Cow<'_, str> {
    if !formula.chars().any(is_subscript) {
        return Cow::Borrowed(formula);
    }

    let normalized = formula
        .chars()
        .map(|c| {
            if is_subscript(c) {
                // SAFETY: Subscripts are the contiguous block U+2080 to U+2089, so this offset is always 0-9
                char::from(b'0' + (u32::from(c) - u32::from('₀')) as u8)
            } else {
                c
            }
        })
        .collect();
    Cow::Owned(normalized)
}

const fn is_subscript(c: char) -> bool {
    matches!(c, '₀'..='₉')
}
