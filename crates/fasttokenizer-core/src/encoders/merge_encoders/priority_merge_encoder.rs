//! # Priority-merge [`MergeEncoder`].
//!
//! Uses a binary min-heap over a doubly-linked list for O(n log n) BPE merging,
//! replacing the O(n^2) linear-scan approach in [`super::LinearScanMergeEncoder`].

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::{
    encoders::{merge_encoders::MergeEncoder, symbols::Symbol},
    types::{Rank, TokenType},
    vocab::RankerTable,
};

const NONE: usize = usize::MAX;

struct Node<T: TokenType> {
    symbol: Symbol<T>,
    prev: usize,
    next: usize,
}

/// Heap entry representing a potential merge.
///
/// Ordered by (rank, `left_idx`) so the lowest-rank, leftmost pair is popped first.
/// `left_tok` and `right_tok` are stored for O(1) stale-entry detection.
struct MergeEntry<T: TokenType> {
    rank: Rank,
    left_idx: usize,
    left_tok: T,
    right_tok: T,
    token: T,
}

impl<T: TokenType> PartialEq for MergeEntry<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.rank == other.rank && self.left_idx == other.left_idx
    }
}

impl<T: TokenType> Eq for MergeEntry<T> {}

impl<T: TokenType> Ord for MergeEntry<T> {
    fn cmp(
        &self,
        other: &Self,
    ) -> core::cmp::Ordering {
        self.rank
            .cmp(&other.rank)
            .then(self.left_idx.cmp(&other.left_idx))
    }
}

impl<T: TokenType> PartialOrd for MergeEntry<T> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A [`MergeEncoder`] using a binary min-heap with a doubly-linked list.
///
/// Stale heap entries are skipped when popped, rather than removed when
/// their symbols change.
pub struct PriorityMergeEncoder<T: TokenType> {
    nodes: Vec<Node<T>>,
    heap: BinaryHeap<Reverse<MergeEntry<T>>>,
}

impl<T: TokenType> Default for PriorityMergeEncoder<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            heap: BinaryHeap::new(),
        }
    }
}

impl<T: TokenType> core::fmt::Debug for PriorityMergeEncoder<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("PriorityMergeEncoder").finish()
    }
}

impl<T: TokenType> Clone for PriorityMergeEncoder<T> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<T: TokenType> PriorityMergeEncoder<T> {
    /// Enqueue the pair starting at node `left_idx`, if it is ranked.
    fn push_candidate(
        &mut self,
        table: &RankerTable<T>,
        left_idx: usize,
    ) {
        let right_idx = self.nodes[left_idx].next;
        if right_idx == NONE {
            return;
        }

        let left = self.nodes[left_idx].symbol;
        let right = self.nodes[right_idx].symbol;
        if !(left.mergeable && right.mergeable) {
            return;
        }

        if let Some(merge) = table.lookup_merge(&(left.token, right.token)) {
            self.heap.push(Reverse(MergeEntry {
                rank: merge.rank,
                left_idx,
                left_tok: left.token,
                right_tok: right.token,
                token: merge.token,
            }));
        }
    }
}

impl<T: TokenType> MergeEncoder<T> for PriorityMergeEncoder<T> {
    fn merge_symbols(
        &mut self,
        table: &RankerTable<T>,
        symbols: &mut Vec<Symbol<T>>,
    ) {
        let n = symbols.len();
        if n < 2 {
            return;
        }

        // Build doubly-linked list of symbols.
        self.nodes.clear();
        self.nodes.reserve(n);
        for (i, &symbol) in symbols.iter().enumerate() {
            self.nodes.push(Node {
                symbol,
                prev: if i == 0 { NONE } else { i - 1 },
                next: if i + 1 < n { i + 1 } else { NONE },
            });
        }

        // Seed the heap with all initially-mergeable adjacent pairs.
        self.heap.clear();
        for i in 0..(n - 1) {
            self.push_candidate(table, i);
        }

        // Process merges in priority order (lowest rank first).
        while let Some(Reverse(entry)) = self.heap.pop() {
            let li = entry.left_idx;

            // Validate: left node still active with expected right neighbor.
            let ri = self.nodes[li].next;
            if ri == NONE {
                continue;
            }

            // Bidirectional adjacency + token freshness.
            if self.nodes[ri].prev != li
                || self.nodes[li].symbol.token != entry.left_tok
                || self.nodes[ri].symbol.token != entry.right_tok
            {
                continue;
            }

            // Merge: left absorbs right.
            let right_len = self.nodes[ri].symbol.len;
            let right_next = self.nodes[ri].next;

            let left = &mut self.nodes[li];
            left.symbol.token = entry.token;
            left.symbol.len += right_len;
            left.next = right_next;
            let left_prev = left.prev;

            if right_next != NONE {
                self.nodes[right_next].prev = li;
            }
            self.nodes[ri].prev = NONE;
            self.nodes[ri].next = NONE;

            // Enqueue new neighbor pairs.
            if left_prev != NONE {
                self.push_candidate(table, left_prev);
            }
            self.push_candidate(table, li);
        }

        // Collect final symbols by walking the linked list; the head is never absorbed.
        symbols.clear();
        let mut idx = 0;
        while idx != NONE {
            symbols.push(self.nodes[idx].symbol);
            idx = self.nodes[idx].next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::{merge_encoders::MergeStrategy, testing::common_merge_encoder_tests};

    #[test]
    fn test_encoder_u16() {
        common_merge_encoder_tests::<u16>(MergeStrategy::PriorityMerge);
    }

    #[test]
    fn test_encoder_u32() {
        common_merge_encoder_tests::<u32>(MergeStrategy::PriorityMerge);
    }

    #[test]
    fn test_reuse() {
        let table = crate::encoders::testing::build_test_table::<u32>();
        let mut encoder = PriorityMergeEncoder::<u32>::default();

        for _ in 0..2 {
            let mut symbols: Vec<Symbol<u32>> = b"hello"
                .iter()
                .enumerate()
                .map(|(start, &b)| Symbol {
                    start,
                    len: 1,
                    token: b as u32,
                    mergeable: true,
                })
                .collect();
            encoder.merge_symbols(&table, &mut symbols);
            assert_eq!(
                symbols,
                vec![Symbol {
                    start: 0,
                    len: 5,
                    token: 259,
                    mergeable: true,
                }]
            );
        }
    }
}
