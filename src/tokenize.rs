//! Tokenization of declaration and reference text into part shapes.
//!
//! The grammar-driven front ends of the toolchain produce part sequences
//! themselves; this scanner is the lightweight path shared with editor
//! tooling (line tokenizers, completion). Both sides follow the same
//! convention: every word and every whitespace run becomes its own
//! literal part.
//!
//! An unterminated quote is tokenized as a [`QuotedString`] argument so
//! that a line being typed (`I select "Lon`) still surfaces candidates.
//!
//! [`QuotedString`]: ArgumentKind::QuotedString

use lazy_regex::regex;
use regex::Regex;

use crate::{
    error::TokenizeError,
    part::{ArgumentKind, MatchingPart},
};

/// One raw token recognized by the scanner.
enum RawToken<'t> {
    Whitespace(&'t str),
    Quoted(&'t str),
    Number(&'t str),
    Parameter(&'t str),
    Word(&'t str),
}

/// Scans `text` into raw tokens, leftmost-first.
fn scan(text: &str) -> impl Iterator<Item = RawToken<'_>> {
    let scanner: &Regex = regex!(
        r#"(?P<ws>\s+)|(?P<quoted>"[^"]*"?)|(?P<param>\{(?P<name>\w+)\})|(?P<number>-?\d+(?:\.\d+)?)|(?P<word>[^\s"{]+|\{)"#
    );

    scanner.captures_iter(text).map(|caps| {
        if let Some(m) = caps.name("ws") {
            RawToken::Whitespace(m.as_str())
        } else if let Some(m) = caps.name("quoted") {
            RawToken::Quoted(m.as_str())
        } else if let Some(m) = caps.name("param") {
            let name = caps.name("name").map_or(m.as_str(), |n| n.as_str());
            RawToken::Parameter(name)
        } else if let Some(m) = caps.name("number") {
            RawToken::Number(m.as_str())
        } else {
            let m = caps.name("word").unwrap_or_else(|| unreachable!());
            RawToken::Word(m.as_str())
        }
    })
}

/// Tokenizes step declaration text (`I have {number} cucumbers`) into a
/// definition-side part sequence.
///
/// Only `{name}` parameters become placeholders; every other token,
/// quoted or numeric included, is literal text the step has to spell
/// out.
///
/// # Errors
///
/// If a `{name}` parameter names a kind unknown to the toolchain.
pub fn declaration_parts(
    text: &str,
) -> Result<Vec<MatchingPart>, TokenizeError> {
    scan(text)
        .map(|token| match token {
            RawToken::Parameter(name) => {
                ArgumentKind::from_parameter_name(name)
                    .map(MatchingPart::placeholder)
                    .ok_or_else(|| TokenizeError::UnknownParameter {
                        name: name.to_owned(),
                    })
            }
            RawToken::Whitespace(text)
            | RawToken::Quoted(text)
            | RawToken::Number(text)
            | RawToken::Word(text) => Ok(MatchingPart::literal(text)),
        })
        .collect()
}

/// Tokenizes a written step reference (`I have 5 cucumbers`) into a
/// query-side part sequence.
///
/// Quoted strings and numbers are recognized as absorbed arguments; a
/// literal `{name}` in a written step stays literal text.
#[must_use]
pub fn reference_parts(text: &str) -> Vec<MatchingPart> {
    scan(text)
        .map(|token| match token {
            RawToken::Quoted(text) => {
                MatchingPart::argument(ArgumentKind::QuotedString, text)
            }
            RawToken::Number(text) => {
                MatchingPart::argument(ArgumentKind::Number, text)
            }
            RawToken::Whitespace(text) | RawToken::Word(text) => {
                MatchingPart::literal(text)
            }
            RawToken::Parameter(name) => {
                MatchingPart::literal(format!("{{{name}}}"))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_and_whitespace_are_separate_literals() {
        let parts = reference_parts("I have matched");

        assert_eq!(
            parts,
            vec![
                MatchingPart::literal("I"),
                MatchingPart::literal(" "),
                MatchingPart::literal("have"),
                MatchingPart::literal(" "),
                MatchingPart::literal("matched"),
            ],
        );
    }

    #[test]
    fn declaration_recognizes_parameters() {
        let parts = declaration_parts("I have {number} cucumbers").unwrap();

        assert_eq!(
            parts,
            vec![
                MatchingPart::literal("I"),
                MatchingPart::literal(" "),
                MatchingPart::literal("have"),
                MatchingPart::literal(" "),
                MatchingPart::placeholder(ArgumentKind::Number),
                MatchingPart::literal(" "),
                MatchingPart::literal("cucumbers"),
            ],
        );
    }

    #[test]
    fn declaration_rejects_unknown_parameters() {
        assert_eq!(
            declaration_parts("I attach {table}"),
            Err(TokenizeError::UnknownParameter { name: "table".into() }),
        );
    }

    #[test]
    fn declaration_keeps_numbers_and_quotes_literal() {
        let parts = declaration_parts("I press \"OK\" 2 times").unwrap();

        assert_eq!(
            parts,
            vec![
                MatchingPart::literal("I"),
                MatchingPart::literal(" "),
                MatchingPart::literal("press"),
                MatchingPart::literal(" "),
                MatchingPart::literal("\"OK\""),
                MatchingPart::literal(" "),
                MatchingPart::literal("2"),
                MatchingPart::literal(" "),
                MatchingPart::literal("times"),
            ],
        );
    }

    #[test]
    fn reference_absorbs_quoted_and_numeric_arguments() {
        let parts = reference_parts("I move \"knight\" 2 squares");

        assert_eq!(
            parts,
            vec![
                MatchingPart::literal("I"),
                MatchingPart::literal(" "),
                MatchingPart::literal("move"),
                MatchingPart::literal(" "),
                MatchingPart::argument(
                    ArgumentKind::QuotedString,
                    "\"knight\"",
                ),
                MatchingPart::literal(" "),
                MatchingPart::argument(ArgumentKind::Number, "2"),
                MatchingPart::literal(" "),
                MatchingPart::literal("squares"),
            ],
        );
    }

    #[test]
    fn reference_tolerates_an_unterminated_quote() {
        let parts = reference_parts("I select \"Lon");

        assert_eq!(
            parts.last(),
            Some(&MatchingPart::argument(
                ArgumentKind::QuotedString,
                "\"Lon",
            )),
        );
    }

    #[test]
    fn negative_and_decimal_numbers_are_single_arguments() {
        let parts = reference_parts("-3.5");

        assert_eq!(
            parts,
            vec![MatchingPart::argument(ArgumentKind::Number, "-3.5")],
        );
    }

    #[test]
    fn stray_braces_stay_literal() {
        let parts = reference_parts("a {not closed");

        assert_eq!(
            parts,
            vec![
                MatchingPart::literal("a"),
                MatchingPart::literal(" "),
                MatchingPart::literal("{"),
                MatchingPart::literal("not"),
                MatchingPart::literal(" "),
                MatchingPart::literal("closed"),
            ],
        );
    }

    #[test]
    fn empty_text_produces_no_parts() {
        assert_eq!(reference_parts(""), Vec::new());
    }
}
