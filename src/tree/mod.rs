// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The matching tree: a trie over part sequences, owning the single
//! global order of every indexed definition.
//!
//! A definition's part sequence is inserted once, when the definition
//! becomes known or is recompiled. A query's part sequence is walked
//! down the trie once per lookup; the walk emits a ranked result list
//! plus a count of how many leading query parts were consumed.
//!
//! The tree performs no internal locking. It is owned by one
//! compilation pipeline at a time; see [`StepRegistry`] for the
//! single-writer wrapper handed to tooling threads.
//!
//! [`StepRegistry`]: crate::registry::StepRegistry

pub(crate) mod arena;
pub(crate) mod node;

use linked_hash_map::LinkedHashMap;

use crate::{definition::StepDefinition, part::MatchingPart};

use self::{
    arena::DefinitionArena,
    node::{Inserted, MatchingTreeNode, PartKey},
};

/// Sentinel confidence carried by exact matches. Always outranks a
/// partial confidence, which is a matched literal length.
pub const EXACT_CONFIDENCE: i64 = i64::MAX;

/// Single ranked candidate produced by [`MatchingTree::find()`].
#[derive(Clone, Debug)]
pub struct MatchResult<D> {
    /// Whether the full query shape is structurally identical to the
    /// definition's full shape.
    pub is_exact: bool,

    /// Ranking score: [`EXACT_CONFIDENCE`] for an exact match, otherwise
    /// the matched literal length at the deepest comparison point.
    pub confidence: i64,

    /// The candidate definition.
    pub definition: D,
}

/// Ranked outcome of a [`MatchingTree::find()`] lookup.
#[derive(Clone, Debug)]
pub struct Matches<D> {
    /// Candidates, exact matches first, partial candidates in global
    /// definition order among equally specific ones.
    pub results: Vec<MatchResult<D>>,

    /// Number of leading query parts consumed by the deepest search
    /// path that contributed results. Tells tooling where, textually,
    /// the match gave up.
    pub parts_matched: usize,
}

// Implemented manually to omit redundant `D: Default` trait bound,
// imposed by `#[derive(Default)]`.
impl<D> Default for Matches<D> {
    fn default() -> Self {
        Self { results: Vec::new(), parts_matched: 0 }
    }
}

impl<D> Matches<D> {
    /// Single best candidate by `(is_exact, confidence)` descending,
    /// first-registered winning ties.
    #[must_use]
    pub fn best(&self) -> Option<&MatchResult<D>> {
        self.results.iter().reduce(|best, candidate| {
            if (candidate.is_exact, candidate.confidence)
                > (best.is_exact, best.confidence)
            {
                candidate
            } else {
                best
            }
        })
    }

    /// Exact candidates only.
    pub fn exact(&self) -> impl Iterator<Item = &MatchResult<D>> {
        self.results.iter().filter(|r| r.is_exact)
    }
}

/// Index of step definitions by their part sequence.
///
/// Holds the single global ordered sequence of all indexed definitions
/// and the root of the trie; the root itself represents no part, so a
/// lookup starts at its children.
#[derive(Clone, Debug)]
pub struct MatchingTree<D> {
    /// Global definition order shared by every node's window.
    arena: DefinitionArena<D>,

    /// Top-level trie nodes, keyed by structural equivalence of their
    /// part.
    children: LinkedHashMap<PartKey, MatchingTreeNode>,
}

// Implemented manually to omit redundant `D: Default` trait bound,
// imposed by `#[derive(Default)]`.
impl<D> Default for MatchingTree<D> {
    fn default() -> Self {
        Self { arena: DefinitionArena::new(), children: LinkedHashMap::new() }
    }
}

impl<D: StepDefinition> MatchingTree<D> {
    /// Creates a new empty [`MatchingTree`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes `definition`, or swaps the payload of the definition it
    /// recompiles ([`StepDefinition::is_same_definition()`]) without
    /// growing the index.
    ///
    /// A definition with an empty part sequence can never be looked up,
    /// so it's skipped silently rather than stored.
    pub fn add_or_update(&mut self, definition: D) {
        let parts = definition.match_parts().to_vec();
        let Some(first) = parts.first() else {
            tracing::debug!(
                step = definition.declaration_text(),
                "skipping step definition with no matchable shape",
            );
            return;
        };

        let step = definition.declaration_text().to_owned();
        let tail = self.arena.tail();
        let child = self
            .children
            .entry(PartKey::of(first))
            .or_insert_with(|| MatchingTreeNode::new(first.clone()));
        let inserted =
            child.insert(definition, &parts, 0, tail, &mut self.arena);
        match inserted {
            Inserted::Replaced(id) => tracing::debug!(
                step = step.as_str(),
                slot = %id,
                "recompiled step definition in place",
            ),
            Inserted::Appended { id, .. } => tracing::debug!(
                step = step.as_str(),
                slot = %id,
                "indexed step definition",
            ),
        }
    }

    /// Ranked lookup of `query` against every indexed definition.
    ///
    /// With `exact_only` only definitions whose full shape matches the
    /// full query are returned; otherwise every plausible continuation
    /// is ranked in as a partial candidate. An empty query, an empty
    /// tree, or a query matching nothing all yield an empty outcome.
    #[must_use]
    pub fn find(&self, query: &[MatchingPart], exact_only: bool) -> Matches<D>
    where
        D: Clone,
    {
        let mut matches = Matches::default();
        if query.is_empty() {
            return matches;
        }

        for child in self.children.values() {
            _ = child.search(
                query,
                0,
                exact_only,
                &self.arena,
                &mut matches.results,
                &mut matches.parts_matched,
            );
        }
        tracing::trace!(
            results = matches.results.len(),
            parts_matched = matches.parts_matched,
            exact_only,
            "matched step query",
        );
        matches
    }

    /// Number of indexed definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Indicates whether no definition is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every indexed definition in global order.
    pub fn definitions(&self) -> impl Iterator<Item = &D> {
        self.arena.iter().map(|(_, definition)| definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        part::ArgumentKind,
        tokenize,
    };

    /// Minimal definition with an owner-assigned identity.
    #[derive(Clone, Debug)]
    struct TestStep {
        id: u32,
        text: String,
        parts: Vec<MatchingPart>,
    }

    impl TestStep {
        fn literal(id: u32, text: &str) -> Self {
            Self {
                id,
                text: text.to_owned(),
                parts: tokenize::reference_parts(text),
            }
        }

        fn with_parts(id: u32, text: &str, parts: Vec<MatchingPart>) -> Self {
            Self { id, text: text.to_owned(), parts }
        }
    }

    impl StepDefinition for TestStep {
        fn keyword(&self) -> crate::definition::StepKeyword {
            crate::definition::StepKeyword::Given
        }

        fn declaration_text(&self) -> &str {
            &self.text
        }

        fn match_parts(&self) -> &[MatchingPart] {
            &self.parts
        }

        fn is_same_definition(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    fn texts<'m>(matches: &'m Matches<TestStep>) -> Vec<&'m str> {
        matches.results.iter().map(|r| r.definition.text.as_str()).collect()
    }

    #[test]
    fn exact_match_wins() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));
        tree.add_or_update(TestStep::literal(2, "I have not matched"));

        let query = tokenize::reference_parts("I have not matched");
        let matches = tree.find(&query, false);

        assert_eq!(texts(&matches), vec!["I have not matched"]);
        assert!(matches.results[0].is_exact);
        assert_eq!(matches.results[0].confidence, EXACT_CONFIDENCE);
        assert_eq!(matches.parts_matched, 7);
    }

    #[test]
    fn shared_prefix_ranks_both_candidates() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));
        tree.add_or_update(TestStep::literal(2, "I have not matched"));

        let query = tokenize::reference_parts("I have");
        let matches = tree.find(&query, false);

        assert_eq!(
            texts(&matches),
            vec!["I have matched", "I have not matched"],
        );
        for result in &matches.results {
            assert!(!result.is_exact);
            assert_eq!(result.confidence, 4);
        }
        assert_eq!(matches.parts_matched, 3);
    }

    #[test]
    fn half_typed_word_still_surfaces_candidates() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));

        let query = tokenize::reference_parts("I hav");
        let matches = tree.find(&query, false);

        assert_eq!(texts(&matches), vec!["I have matched"]);
        assert!(!matches.results[0].is_exact);
        assert_eq!(matches.results[0].confidence, 3);
        assert_eq!(matches.parts_matched, 3);
    }

    #[test]
    fn deeper_match_shadows_shallower_breadth() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));
        tree.add_or_update(TestStep::literal(2, "I have nothing"));

        let query = tokenize::reference_parts("I have matched");
        let matches = tree.find(&query, false);

        // The sibling partially matching at a shallower depth must not
        // ride along under the exact branch.
        assert_eq!(texts(&matches), vec!["I have matched"]);
        assert!(matches.results[0].is_exact);
    }

    #[test]
    fn exact_match_precedes_its_continuations() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));
        tree.add_or_update(TestStep::literal(2, "I have matched twice"));

        let query = tokenize::reference_parts("I have matched");
        let matches = tree.find(&query, false);

        assert_eq!(
            texts(&matches),
            vec!["I have matched", "I have matched twice"],
        );
        assert!(matches.results[0].is_exact);
        assert!(!matches.results[1].is_exact);
        assert_eq!(matches.results[1].confidence, 7);
        assert_eq!(
            matches.best().map(|r| r.definition.text.as_str()),
            Some("I have matched"),
        );
    }

    #[test]
    fn replace_in_place_is_idempotent() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));
        tree.add_or_update(TestStep::literal(2, "I have not matched"));
        // Recompiled definition: same identity, same shape, new payload.
        tree.add_or_update(TestStep::with_parts(
            1,
            "I have matched (recompiled)",
            tokenize::reference_parts("I have matched"),
        ));

        assert_eq!(tree.len(), 2);

        let query = tokenize::reference_parts("I have");
        let matches = tree.find(&query, false);
        assert_eq!(
            texts(&matches),
            vec!["I have matched (recompiled)", "I have not matched"],
        );
    }

    #[test]
    fn no_overlap_prunes_to_an_empty_outcome() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));

        let query = tokenize::reference_parts("you");
        let matches = tree.find(&query, false);

        assert!(matches.results.is_empty());
        assert_eq!(matches.parts_matched, 0);
        assert!(matches.best().is_none());
    }

    #[test]
    fn exact_only_suppresses_partial_candidates() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));
        tree.add_or_update(TestStep::literal(2, "I have not matched"));

        let query = tokenize::reference_parts("I have");
        let matches = tree.find(&query, true);
        assert!(matches.results.is_empty());

        let query = tokenize::reference_parts("I have matched");
        let matches = tree.find(&query, true);
        assert_eq!(texts(&matches), vec!["I have matched"]);
        assert!(matches.results[0].is_exact);
    }

    #[test]
    fn placeholder_absorbs_a_written_argument() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::with_parts(
            1,
            "I have {number} cucumbers",
            vec![
                MatchingPart::literal("I"),
                MatchingPart::literal(" "),
                MatchingPart::literal("have"),
                MatchingPart::literal(" "),
                MatchingPart::placeholder(ArgumentKind::Number),
                MatchingPart::literal(" "),
                MatchingPart::literal("cucumbers"),
            ],
        ));

        let query = tokenize::reference_parts("I have 5 cucumbers");
        let matches = tree.find(&query, false);

        assert_eq!(texts(&matches), vec!["I have {number} cucumbers"]);
        assert!(matches.results[0].is_exact);
        assert_eq!(matches.parts_matched, 7);
    }

    #[test]
    fn windows_stay_contiguous_across_interleaved_insertions() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "a p q"));
        tree.add_or_update(TestStep::literal(2, "a r"));
        tree.add_or_update(TestStep::literal(3, "a p s"));

        // The `a p` subtree spans definitions 1 and 3 even though 2 was
        // indexed between them.
        let matches = tree.find(&tokenize::reference_parts("a p"), false);
        assert_eq!(texts(&matches), vec!["a p q", "a p s"]);

        let matches = tree.find(&tokenize::reference_parts("a"), false);
        assert_eq!(texts(&matches), vec!["a p q", "a p s", "a r"]);
    }

    #[test]
    fn structurally_identical_definitions_are_all_reported() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "I have matched"));
        tree.add_or_update(TestStep::literal(2, "I have matched"));

        let query = tokenize::reference_parts("I have matched");
        let matches = tree.find(&query, false);

        assert_eq!(matches.exact().count(), 2);
        assert_eq!(
            matches
                .exact()
                .map(|r| r.definition.id)
                .collect::<Vec<_>>(),
            vec![1, 2],
        );
    }

    #[test]
    fn empty_shapes_and_empty_queries_are_noops() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::with_parts(1, "", Vec::new()));
        assert!(tree.is_empty());

        tree.add_or_update(TestStep::literal(2, "I have matched"));
        let matches = tree.find(&[], false);
        assert!(matches.results.is_empty());
        assert_eq!(matches.parts_matched, 0);
    }

    #[test]
    fn definitions_iterate_in_global_order() {
        let mut tree = MatchingTree::new();
        tree.add_or_update(TestStep::literal(1, "a p q"));
        tree.add_or_update(TestStep::literal(2, "a r"));
        tree.add_or_update(TestStep::literal(3, "a p s"));

        assert_eq!(
            tree.definitions().map(|d| d.id).collect::<Vec<_>>(),
            vec![1, 3, 2],
        );
    }
}
