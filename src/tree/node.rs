// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Trie node: recursive insertion and recursive ranked search.

use linked_hash_map::LinkedHashMap;

use crate::{
    definition::StepDefinition,
    part::{ArgumentKind, MatchingPart},
};

use super::{
    arena::{DefinitionArena, DefinitionId},
    MatchResult, EXACT_CONFIDENCE,
};

/// Normalized signature of a [`MatchingPart`]: the key of structural
/// equivalence between children. Literals compare by text, placeholders
/// by kind, and the two never compare equal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum PartKey {
    Literal(String),
    Placeholder(ArgumentKind),
}

impl PartKey {
    /// Extracts the signature of `part`.
    pub(crate) fn of(part: &MatchingPart) -> Self {
        match part {
            MatchingPart::Literal(text) => Self::Literal(text.clone()),
            MatchingPart::Placeholder { kind, .. } => {
                Self::Placeholder(*kind)
            }
        }
    }
}

/// Outcome of a recursive insertion, reported back up the path.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Inserted {
    /// An existing definition's payload was swapped in place. No window
    /// moves: the slot already lies inside every window on its path.
    Replaced(DefinitionId),

    /// A new slot was spliced into the arena right after `anchor`.
    Appended {
        id: DefinitionId,
        anchor: Option<DefinitionId>,
    },
}

/// One node of the matching trie: a distinct part value at a given
/// depth.
///
/// Children are stored in an insertion-ordered map keyed by [`PartKey`],
/// so the structurally equivalent child is found without scanning while
/// search still visits children in the order they appeared. Swapping
/// this container for a plain vector with a linear scan is a local
/// change; nothing outside the node observes the strategy.
#[derive(Clone, Debug)]
pub(crate) struct MatchingTreeNode {
    /// Part this node represents.
    part: MatchingPart,

    /// Child nodes, keyed by structural equivalence of their part.
    children: LinkedHashMap<PartKey, MatchingTreeNode>,

    /// Leftmost arena position reachable through this subtree. Set on
    /// the first insertion routed through the node, never moved.
    left: Option<DefinitionId>,

    /// Rightmost arena position reachable through this subtree.
    right: Option<DefinitionId>,

    /// Definitions whose part sequence terminates exactly at this node,
    /// in registration order.
    exact: Vec<DefinitionId>,
}

impl MatchingTreeNode {
    /// Creates a node representing `part`, not yet spanning any
    /// definition.
    pub(crate) fn new(part: MatchingPart) -> Self {
        Self {
            part,
            children: LinkedHashMap::new(),
            left: None,
            right: None,
            exact: Vec::new(),
        }
    }

    /// Routes `definition` through this node, which already represents
    /// `parts[depth]`.
    ///
    /// `anchor` is the rightmost pre-existing arena position on the path
    /// above; the deepest pre-existing node's `right` wins and becomes
    /// the splice point when the terminal depth appends a new slot.
    /// Splicing there keeps every `[left, right]` window on the path
    /// equal to its subtree, so a window is updated only when the splice
    /// point was its own right edge.
    pub(crate) fn insert<D: StepDefinition>(
        &mut self,
        definition: D,
        parts: &[MatchingPart],
        depth: usize,
        anchor: Option<DefinitionId>,
        arena: &mut DefinitionArena<D>,
    ) -> Inserted {
        let anchor = self.right.or(anchor);

        let inserted = if depth + 1 < parts.len() {
            let next = &parts[depth + 1];
            let child = self
                .children
                .entry(PartKey::of(next))
                .or_insert_with(|| Self::new(next.clone()));
            child.insert(definition, parts, depth + 1, anchor, arena)
        } else if let Some(existing) = self.find_same(&definition, arena) {
            _ = arena.replace(existing, definition);
            Inserted::Replaced(existing)
        } else {
            let id = arena.insert_after(anchor, definition);
            self.exact.push(id);
            Inserted::Appended { id, anchor }
        };

        if let Inserted::Appended { id, anchor: spliced_after } = inserted {
            if self.left.is_none() {
                self.left = Some(id);
            }
            if self.right.is_none() || self.right == spliced_after {
                self.right = Some(id);
            }
        }
        inserted
    }

    /// Looks for a definition in this node's window that `definition`
    /// recompiles, scanning from the most recently indexed end.
    fn find_same<D: StepDefinition>(
        &self,
        definition: &D,
        arena: &DefinitionArena<D>,
    ) -> Option<DefinitionId> {
        let (Some(left), Some(right)) = (self.left, self.right) else {
            return None;
        };
        arena
            .range_rev(right, left)
            .find(|(_, existing)| existing.is_same_definition(definition))
            .map(|(id, _)| id)
    }

    /// Ranked search below this node, which is compared against
    /// `query[depth]`.
    ///
    /// Returns whether this node or any descendant contributed a
    /// result; a contributing descendant shadows this node's own
    /// breadth, so only the most specific candidates survive.
    pub(crate) fn search<D: Clone>(
        &self,
        query: &[MatchingPart],
        depth: usize,
        exact_only: bool,
        arena: &DefinitionArena<D>,
        results: &mut Vec<MatchResult<D>>,
        parts_matched: &mut usize,
    ) -> bool {
        let quality = self.part.approximate_match(&query[depth]);
        if !quality.is_match() {
            return false;
        }

        let mut emitted_exact = false;
        let mut matched_deeper = false;

        if depth + 1 == query.len() {
            // Query exhausted at this node.
            if quality.is_exact && !self.exact.is_empty() {
                // Exact hits outrank and precede everything gathered so
                // far.
                _ = results.splice(
                    0..0,
                    self.exact.iter().map(|&id| MatchResult {
                        is_exact: true,
                        confidence: EXACT_CONFIDENCE,
                        definition: arena.get(id).clone(),
                    }),
                );
                emitted_exact = true;
            }
            *parts_matched = (*parts_matched).max(depth + 1);
        } else {
            for child in self.children.values() {
                matched_deeper |= child.search(
                    query,
                    depth + 1,
                    exact_only,
                    arena,
                    results,
                    parts_matched,
                );
            }
        }

        let mut appended = false;
        if !matched_deeper && !exact_only {
            if let (Some(left), Some(right)) = (self.left, self.right) {
                for (id, definition) in arena.range(left, right) {
                    if emitted_exact && self.exact.contains(&id) {
                        continue;
                    }
                    results.push(MatchResult {
                        is_exact: false,
                        confidence: quality.length as i64,
                        definition: definition.clone(),
                    });
                    appended = true;
                }
            }
            if appended {
                *parts_matched = (*parts_matched).max(depth + 1);
            }
        }

        emitted_exact || matched_deeper || appended
    }
}
