//! # Linear-scan [`MergeEncoder`].
//!
//! The reference merge loop: scan every adjacent pair for the lowest rank,
//! merge it, and repeat. O(n^2), but simple enough to check the others against.

use crate::{
    encoders::{merge_encoders::MergeEncoder, symbols::Symbol},
    types::TokenType,
    vocab::{MergeRank, RankerTable},
};

/// A [`MergeEncoder`] which rescans a cached pair-rank buffer for each merge.
pub struct LinearScanMergeEncoder<T: TokenType> {
    pair_ranks: Vec<Option<MergeRank<T>>>,
}

impl<T: TokenType> Default for LinearScanMergeEncoder<T> {
    fn default() -> Self {
        Self {
            pair_ranks: Vec::new(),
        }
    }
}

impl<T: TokenType> core::fmt::Debug for LinearScanMergeEncoder<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("LinearScanMergeEncoder").finish()
    }
}

impl<T: TokenType> Clone for LinearScanMergeEncoder<T> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

fn pair_rank<T: TokenType>(
    table: &RankerTable<T>,
    left: &Symbol<T>,
    right: &Symbol<T>,
) -> Option<MergeRank<T>> {
    if left.mergeable && right.mergeable {
        table.lookup_merge(&(left.token, right.token))
    } else {
        None
    }
}

impl<T: TokenType> MergeEncoder<T> for LinearScanMergeEncoder<T> {
    fn merge_symbols(
        &mut self,
        table: &RankerTable<T>,
        symbols: &mut Vec<Symbol<T>>,
    ) {
        if symbols.len() < 2 {
            return;
        }

        // pair_ranks[i] is the merge of (symbols[i], symbols[i + 1]).
        self.pair_ranks.clear();
        self.pair_ranks.extend(
            symbols
                .windows(2)
                .map(|w| pair_rank(table, &w[0], &w[1])),
        );

        loop {
            // Strict `<` keeps the leftmost of equal ranks.
            let mut best: Option<(usize, MergeRank<T>)> = None;
            for (i, merge) in self.pair_ranks.iter().enumerate() {
                if let Some(merge) = merge
                    && best.is_none_or(|(_, b)| merge.rank < b.rank)
                {
                    best = Some((i, *merge));
                }
            }

            let Some((i, merge)) = best else {
                break;
            };

            let right = symbols.remove(i + 1);
            symbols[i].token = merge.token;
            symbols[i].len += right.len;

            self.pair_ranks.remove(i);
            if i < self.pair_ranks.len() {
                self.pair_ranks[i] = pair_rank(table, &symbols[i], &symbols[i + 1]);
            }
            if i > 0 {
                self.pair_ranks[i - 1] = pair_rank(table, &symbols[i - 1], &symbols[i]);
            }
        }
    }
}
