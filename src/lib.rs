// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step-definition matching engine for Gherkin-like test-automation
//! languages.
//!
//! Every declared step definition is indexed by its token shape (literal
//! words, literal whitespace runs and typed argument slots) in a
//! [`MatchingTree`]: a trie walked once per lookup, in O(depth) rather
//! than O(definitions). The same walk serves two very different callers:
//!
//! - the **linker/execution engine**, which needs a written step to bind
//!   to precisely one definition (`exact_only`), and
//! - **editor tooling**, which needs every definition that's a plausible
//!   continuation of a half-typed line, ranked by how specifically it
//!   matches.
//!
//! Definitions are supplied by the surrounding toolchain through the
//! [`StepDefinition`] trait and can be hot-replaced when their file is
//! recompiled, without rebuilding the index. The [`StepRegistry`] is the
//! shared, lock-guarded surface handed to tooling threads.
//!
//! ```rust
//! use stepmatch::{
//!     DeclaredStep, Location, StepDefinition as _, StepKeyword,
//!     StepRegistry, tokenize,
//! };
//!
//! let registry = StepRegistry::new();
//! registry.add_or_update(
//!     DeclaredStep::new(
//!         StepKeyword::Given,
//!         "I have {number} cucumbers",
//!         Location::new("steps/basket.steps", 3),
//!     )
//!     .unwrap(),
//! );
//!
//! let bound = registry
//!     .resolve(
//!         StepKeyword::Given,
//!         &tokenize::reference_parts("I have 5 cucumbers"),
//!     )
//!     .unwrap();
//! assert_eq!(bound.declaration_text(), "I have {number} cucumbers");
//!
//! let suggested = registry
//!     .suggest(StepKeyword::Given, &tokenize::reference_parts("I hav"));
//! assert_eq!(suggested.results.len(), 1);
//! ```

pub mod definition;
pub mod error;
pub mod part;
pub mod registry;
pub mod tokenize;
pub mod tree;

pub use self::{
    definition::{DeclaredStep, Location, StepDefinition, StepKeyword},
    error::{ResolveError, ResolveResult, TokenizeError},
    part::{ArgumentKind, MatchQuality, MatchingPart},
    registry::StepRegistry,
    tree::{MatchResult, Matches, MatchingTree, EXACT_CONFIDENCE},
};
