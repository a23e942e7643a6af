// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Matching-part model shared by step definitions and step references.
//!
//! A part sequence is the *shape* of a step: every word and every run of
//! inter-word whitespace is its own [`Literal`] part, and every typed
//! argument slot is a [`Placeholder`] part. Keeping words and whitespace
//! separate is what allows a half-typed word to surface candidates.
//!
//! [`Literal`]: MatchingPart::Literal
//! [`Placeholder`]: MatchingPart::Placeholder

use std::fmt;

use derive_more::with_trait::Display;

/// Kind tag of a [`MatchingPart::Placeholder`] argument slot.
///
/// The matching core reasons only about the kind of a slot, never about
/// the value filling it.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ArgumentKind {
    /// Bare, unquoted text.
    #[display("text")]
    Text,

    /// A double-quoted string.
    #[display("string")]
    QuotedString,

    /// An integer or decimal number.
    #[display("number")]
    Number,
}

impl ArgumentKind {
    /// Looks up the [`ArgumentKind`] declared by a `{name}` parameter in
    /// a step declaration, if `name` is known to the toolchain.
    #[must_use]
    pub fn from_parameter_name(name: &str) -> Option<Self> {
        match name {
            "text" | "word" => Some(Self::Text),
            "string" => Some(Self::QuotedString),
            "number" | "int" | "float" => Some(Self::Number),
            _ => None,
        }
    }
}

/// One token of a step definition's or step reference's shape.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MatchingPart {
    /// A contiguous run of literal characters.
    Literal(String),

    /// A typed slot filled by a step argument.
    Placeholder {
        /// Kind of argument the slot accepts.
        kind: ArgumentKind,

        /// Text the slot absorbed. Present on reference (query) parts
        /// only; a definition-side placeholder carries no text.
        value: Option<String>,
    },
}

impl MatchingPart {
    /// Creates a [`MatchingPart::Literal`] part.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Creates a definition-side [`MatchingPart::Placeholder`] part.
    #[must_use]
    pub const fn placeholder(kind: ArgumentKind) -> Self {
        Self::Placeholder { kind, value: None }
    }

    /// Creates a reference-side [`MatchingPart::Placeholder`] part that
    /// absorbed `value`.
    pub fn argument(kind: ArgumentKind, value: impl Into<String>) -> Self {
        Self::Placeholder { kind, value: Some(value.into()) }
    }

    /// Indicates whether two parts are structurally equivalent: two
    /// literals with the same text, or two placeholders of the same
    /// kind. Absorbed values never participate, and a literal is never
    /// equivalent to a placeholder.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(l), Self::Literal(r)) => l == r,
            (
                Self::Placeholder { kind: l, .. },
                Self::Placeholder { kind: r, .. },
            ) => l == r,
            _ => false,
        }
    }

    /// Textual length of this part: a literal's text length, or the
    /// length of the text a placeholder absorbed.
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            Self::Literal(text) => text.len(),
            Self::Placeholder { value, .. } => {
                value.as_ref().map_or(0, String::len)
            }
        }
    }

    /// Compares this stored part against a `query` part.
    ///
    /// - Two placeholders of the same kind always match exactly; the
    ///   reported length is the query's absorbed-text length, since a
    ///   slot is as specific as the value it absorbed.
    /// - Two literals match exactly on equal text, partially when one is
    ///   a prefix of the other (reporting the shorter length), and not
    ///   at all otherwise.
    /// - A literal never matches a placeholder.
    ///
    /// A zero [`MatchQuality::length`] means no match; the caller prunes
    /// that branch.
    #[must_use]
    pub fn approximate_match(&self, query: &Self) -> MatchQuality {
        match (self, query) {
            (
                Self::Placeholder { kind: stored, .. },
                Self::Placeholder { kind: queried, .. },
            ) if stored == queried => {
                MatchQuality { length: query.text_len(), is_exact: true }
            }
            (Self::Literal(stored), Self::Literal(typed)) => {
                if stored == typed {
                    MatchQuality { length: stored.len(), is_exact: true }
                } else if stored.starts_with(typed.as_str())
                    || typed.starts_with(stored.as_str())
                {
                    MatchQuality {
                        length: stored.len().min(typed.len()),
                        is_exact: false,
                    }
                } else {
                    MatchQuality::NONE
                }
            }
            _ => MatchQuality::NONE,
        }
    }
}

impl fmt::Display for MatchingPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Placeholder { value: Some(value), .. } => {
                f.write_str(value)
            }
            Self::Placeholder { kind, value: None } => {
                write!(f, "{{{kind}}}")
            }
        }
    }
}

/// Outcome of comparing a stored [`MatchingPart`] against a query part.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchQuality {
    /// Number of characters the comparison covered. Zero means the
    /// stored part cannot match the query at all.
    pub length: usize,

    /// Whether the comparison was exact rather than a prefix overlap.
    pub is_exact: bool,
}

impl MatchQuality {
    /// Quality of a failed comparison.
    pub const NONE: Self = Self { length: 0, is_exact: false };

    /// Indicates whether the comparison matched at all.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.length > 0
    }
}
