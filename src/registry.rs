// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shared registry surface for the compile/link pipeline.
//!
//! The [`MatchingTree`] performs no locking of its own: `right` and the
//! `exact`/arena splices are multi-step updates, so a reader must never
//! observe a tree mid-insertion. This wrapper serializes writes against
//! reads and routes definitions into one tree per declared keyword,
//! mirroring how written steps are looked up.
//!
//! Every operation is a synchronous in-memory walk; nothing here
//! suspends, blocks on I/O, or is cancellable.

use std::sync::{PoisonError, RwLock};

use itertools::Itertools as _;

use crate::{
    definition::{StepDefinition, StepKeyword},
    error::{ResolveError, ResolveResult},
    part::MatchingPart,
    tree::{Matches, MatchingTree},
};

/// Thread-safe step-definition index keyed by [`StepKeyword`].
#[derive(Debug)]
pub struct StepRegistry<D> {
    given: RwLock<MatchingTree<D>>,
    when: RwLock<MatchingTree<D>>,
    then: RwLock<MatchingTree<D>>,
}

// Implemented manually to omit redundant `D: Default` trait bound,
// imposed by `#[derive(Default)]`.
impl<D> Default for StepRegistry<D> {
    fn default() -> Self {
        Self {
            given: RwLock::new(MatchingTree::default()),
            when: RwLock::new(MatchingTree::default()),
            then: RwLock::new(MatchingTree::default()),
        }
    }
}

impl<D: StepDefinition> StepRegistry<D> {
    /// Creates a new empty [`StepRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self, keyword: StepKeyword) -> &RwLock<MatchingTree<D>> {
        match keyword {
            StepKeyword::Given => &self.given,
            StepKeyword::When => &self.when,
            StepKeyword::Then => &self.then,
        }
    }

    /// Indexes `definition` under its declared keyword, replacing the
    /// definition it recompiles, if any.
    pub fn add_or_update(&self, definition: D) {
        self.tree(definition.keyword())
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add_or_update(definition);
    }

    /// Binds a written step to exactly one definition, for execution.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoMatch`], if no definition exactly matches the
    ///   full query.
    /// - [`ResolveError::Ambiguous`], if several do; the linker decides
    ///   whether that's a diagnostic or a first-wins pick.
    pub fn resolve(
        &self,
        keyword: StepKeyword,
        query: &[MatchingPart],
    ) -> ResolveResult<D>
    where
        D: Clone,
    {
        let matches = self
            .tree(keyword)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find(query, true);

        let mut results = matches.results;
        match results.len() {
            0 => Err(ResolveError::NoMatch {
                step_text: query.iter().join(""),
            }),
            // Instead of `.unwrap()` to avoid documenting `# Panics`.
            1 => Ok(results
                .pop()
                .unwrap_or_else(|| unreachable!())
                .definition),
            _ => Err(ResolveError::Ambiguous {
                step_text: query.iter().join(""),
                candidates: results
                    .iter()
                    .map(|r| r.definition.declaration_text().to_owned())
                    .collect(),
            }),
        }
    }

    /// Full ranked candidate list for tooling ("did you mean",
    /// completion), partial candidates included.
    #[must_use]
    pub fn suggest(
        &self,
        keyword: StepKeyword,
        query: &[MatchingPart],
    ) -> Matches<D>
    where
        D: Clone,
    {
        self.tree(keyword)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find(query, false)
    }

    /// Total number of indexed definitions across all keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        [&self.given, &self.when, &self.then]
            .into_iter()
            .map(|tree| {
                tree.read().unwrap_or_else(PoisonError::into_inner).len()
            })
            .sum()
    }

    /// Indicates whether no definition is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
