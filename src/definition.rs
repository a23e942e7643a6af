//! Step-definition capability surface.
//!
//! The matching core has zero knowledge of how definitions are produced
//! (scanned attributes, declarative files, generated bindings); it only
//! reads the capability set below. [`DeclaredStep`] is the ready-made
//! implementation used by the declarative front ends and by tests.

use std::sync::Arc;

use derive_more::with_trait::Display;

use crate::{error::TokenizeError, part::MatchingPart, tokenize};

/// Keyword a step definition is declared for.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum StepKeyword {
    /// A [Given] step, establishing context.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[display("Given")]
    Given,

    /// A [When] step, describing an action.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[display("When")]
    When,

    /// A [Then] step, asserting an outcome.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[display("Then")]
    Then,
}

/// Location of a step definition's declaration.
///
/// Serves as the identity of a [`DeclaredStep`] across recompilations of
/// its file.
#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{path}:{line}")]
pub struct Location {
    /// Path of the file declaring the step.
    pub path: String,

    /// Line of the declaration inside the file.
    pub line: u32,
}

impl Location {
    /// Creates a new [`Location`].
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self { path: path.into(), line }
    }
}

/// Capability set required of a step definition by the matching core.
pub trait StepDefinition {
    /// Keyword this definition is declared for.
    fn keyword(&self) -> StepKeyword;

    /// Original declaration text, used for diagnostics and suggestions.
    fn declaration_text(&self) -> &str;

    /// Shape of this definition as an ordered part sequence.
    ///
    /// An empty sequence cannot be indexed: there is nothing to branch
    /// on, so such a definition is skipped rather than stored.
    fn match_parts(&self) -> &[MatchingPart];

    /// Identity predicate: whether `other` is a recompiled version of
    /// this very definition.
    ///
    /// This is not structural equality of the parts. Two distinct
    /// definitions may share a shape, while a recompiled definition
    /// keeps its identity even when its text changed.
    fn is_same_definition(&self, other: &Self) -> bool;
}

impl<D: StepDefinition> StepDefinition for Arc<D> {
    fn keyword(&self) -> StepKeyword {
        (**self).keyword()
    }

    fn declaration_text(&self) -> &str {
        (**self).declaration_text()
    }

    fn match_parts(&self) -> &[MatchingPart] {
        (**self).match_parts()
    }

    fn is_same_definition(&self, other: &Self) -> bool {
        (**self).is_same_definition(other)
    }
}

/// A step definition declared in source text.
///
/// The standard [`StepDefinition`] implementation: its shape is parsed
/// from the declaration text and its identity is the declaring
/// [`Location`].
#[derive(Clone, Debug)]
pub struct DeclaredStep {
    keyword: StepKeyword,
    text: String,
    parts: Vec<MatchingPart>,
    location: Location,
}

impl DeclaredStep {
    /// Parses `text` as a step declaration.
    ///
    /// # Errors
    ///
    /// If the declaration references a parameter kind unknown to the
    /// toolchain.
    pub fn new(
        keyword: StepKeyword,
        text: impl Into<String>,
        location: Location,
    ) -> Result<Self, TokenizeError> {
        let text = text.into();
        let parts = tokenize::declaration_parts(&text)?;
        Ok(Self { keyword, text, parts, location })
    }

    /// Returns the declaring [`Location`] of this step.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl StepDefinition for DeclaredStep {
    fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    fn declaration_text(&self) -> &str {
        &self.text
    }

    fn match_parts(&self) -> &[MatchingPart] {
        &self.parts
    }

    fn is_same_definition(&self, other: &Self) -> bool {
        self.location == other.location
    }
}
