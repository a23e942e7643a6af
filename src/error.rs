//! Error types raised at the matching core's boundary.
//!
//! The tree itself never errors: an unmatched query is an empty result
//! list and a definition with no matchable shape is silently skipped.
//! Errors only arise where a caller demands a single binding
//! ([`StepRegistry::resolve()`]) or feeds malformed declaration text to
//! the tokenizer.
//!
//! [`StepRegistry::resolve()`]: crate::registry::StepRegistry::resolve

use std::fmt;

use derive_more::with_trait::{Display, Error};
use itertools::Itertools as _;

/// Error of binding a written step to exactly one definition.
#[derive(Clone, Debug, Error)]
pub enum ResolveError {
    /// No definition exactly matches the written step.
    NoMatch {
        /// The written step text that couldn't be bound.
        #[error(not(source))]
        step_text: String,
    },

    /// More than one definition exactly matches the written step.
    ///
    /// The index intentionally admits structurally identical
    /// definitions; it is the linker's job to turn this into a compiler
    /// diagnostic.
    Ambiguous {
        /// The written step text with multiple exact matches.
        #[error(not(source))]
        step_text: String,

        /// Declaration texts of every exactly matching definition, in
        /// registration order.
        candidates: Vec<String>,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch { step_text } => {
                write!(f, "no step definition matches `{step_text}`")
            }
            Self::Ambiguous { step_text, candidates } => {
                write!(
                    f,
                    "step `{step_text}` is ambiguous, matching: {}",
                    candidates.iter().map(|c| format!("`{c}`")).join(", "),
                )
            }
        }
    }
}

/// Alias for a [`Result`] with a [`ResolveError`].
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Error of tokenizing step declaration text.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum TokenizeError {
    /// Declaration references a parameter kind unknown to the toolchain.
    #[display("unknown parameter `{{{name}}}` in step declaration")]
    UnknownParameter {
        /// The unrecognized parameter name.
        #[error(not(source))]
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_display_names_the_step() {
        let err = ResolveError::NoMatch {
            step_text: "I have matched".into(),
        };

        assert_eq!(
            err.to_string(),
            "no step definition matches `I have matched`",
        );
    }

    #[test]
    fn ambiguous_display_lists_candidates_in_order() {
        let err = ResolveError::Ambiguous {
            step_text: "I have 5 cucumbers".into(),
            candidates: vec![
                "I have {number} cucumbers".into(),
                "I have {number} cucumbers".into(),
            ],
        };

        assert_eq!(
            err.to_string(),
            "step `I have 5 cucumbers` is ambiguous, matching: \
             `I have {number} cucumbers`, `I have {number} cucumbers`",
        );
    }

    #[test]
    fn unknown_parameter_display_names_the_parameter() {
        let err = TokenizeError::UnknownParameter { name: "table".into() };

        assert_eq!(
            err.to_string(),
            "unknown parameter `{table}` in step declaration",
        );
    }

    #[test]
    fn errors_implement_std_error() {
        let _: &dyn std::error::Error = &ResolveError::NoMatch {
            step_text: String::new(),
        };
        let _: &dyn std::error::Error =
            &TokenizeError::UnknownParameter { name: String::new() };
    }
}
