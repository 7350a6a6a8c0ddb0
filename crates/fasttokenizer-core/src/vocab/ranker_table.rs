//! # Ranker Table ``{ (T, T) -> (Rank, T) }``

use core::fmt::Debug;

use crate::{
    compat::strings::string_from_utf8_lossy,
    errors::{FTError, FTResult},
    types::{Pair, Rank, TokenType},
    vocab::{ByteTokenArray, PairMergeMap, SpanTokenMap, TokenSpanMap},
};

/// The outcome of merging a ranked pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRank<T: TokenType> {
    /// Merge priority; lower ranks merge first.
    pub rank: Rank,

    /// The token produced by the merge.
    pub token: T,
}

fn malformed<S: Into<String>>(msg: S) -> FTError {
    FTError::MalformedVocabulary(msg.into())
}

/// Build the inverse ``{ T -> Vec<u8> }`` map of a span map.
///
/// Fails if a span is empty, or if two spans share a token.
pub fn try_token_spans<T: TokenType>(span_map: &SpanTokenMap<T>) -> FTResult<TokenSpanMap<T>> {
    let mut token_spans = TokenSpanMap::default();
    for (span, &token) in span_map {
        if span.is_empty() {
            return Err(malformed(format!("token {token} has an empty span")));
        }
        if let Some(prev) = token_spans.insert(token, span.clone()) {
            return Err(malformed(format!(
                "token {token} is shared by {:?} and {:?}",
                string_from_utf8_lossy(&prev),
                string_from_utf8_lossy(span),
            )));
        }
    }
    Ok(token_spans)
}

/// Validate that a [`PairMergeMap`] is grounded in a [`TokenSpanMap`].
///
/// - for every ``(a, b) -> t`` entry:
///   - the parents ``a`` and ``b`` are known tokens;
///   - the target ``t`` is a known token;
///   - the span of ``t`` is the span of ``a`` followed by the span of ``b``.
pub fn try_validate_pair_merges<T: TokenType>(
    token_spans: &TokenSpanMap<T>,
    pair_merges: &PairMergeMap<T>,
) -> FTResult<()> {
    for (&pair, merge) in pair_merges {
        let t = merge.token;
        let (a, b) = pair;

        let Some(left) = token_spans.get(&a) else {
            return Err(malformed(format!(
                "merge {pair:?} -> {t}: parent {a} is not defined"
            )));
        };
        let Some(right) = token_spans.get(&b) else {
            return Err(malformed(format!(
                "merge {pair:?} -> {t}: parent {b} is not defined"
            )));
        };
        let Some(target) = token_spans.get(&t) else {
            return Err(malformed(format!(
                "merge {pair:?} -> {t}: target is not defined"
            )));
        };

        if target.len() != left.len() + right.len()
            || !target.starts_with(left)
            || !target.ends_with(right)
        {
            return Err(malformed(format!(
                "merge {pair:?} -> {t}: {:?} + {:?} != {:?}",
                string_from_utf8_lossy(left),
                string_from_utf8_lossy(right),
                string_from_utf8_lossy(target),
            )));
        }
    }

    Ok(())
}

/// Immutable pair-rank table driving the merge loop.
///
/// - ``{ Vec<u8> -> T }`` and ``{ T -> Vec<u8> }`` token dictionaries.
/// - ``{ (T, T) -> (Rank, T) }`` ranked merges.
/// - An optional unknown token, used as the fallback for uncovered bytes.
///
/// Tables are never mutated once built; share them with `Arc`.
#[derive(Clone, PartialEq)]
pub struct RankerTable<T: TokenType> {
    span_map: SpanTokenMap<T>,
    token_spans: TokenSpanMap<T>,
    byte_tokens: ByteTokenArray<T>,
    pair_merges: PairMergeMap<T>,
    unknown_token: Option<T>,
}

impl<T: TokenType> Debug for RankerTable<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("RankerTable")
            .field("len", &self.len())
            .field("num_merges", &self.num_merges())
            .field("max_token", &self.max_token())
            .field("unknown_token", &self.unknown_token)
            .finish()
    }
}

impl<T: TokenType> RankerTable<T> {
    /// Build a table from a span vocabulary and an ordered merge list.
    ///
    /// The rank of each merge rule is its position in `merges`.
    ///
    /// ## Arguments
    /// * `span_map` - The ``{ Vec<u8> -> T }`` vocabulary.
    /// * `merges` - ``(left, right)`` span pairs, highest priority first.
    ///
    /// ## Returns
    /// The table, or [`FTError::MalformedVocabulary`] when a merge names
    /// unknown spans, a merge repeats, or two spans share a token.
    pub fn new<I>(
        span_map: SpanTokenMap<T>,
        merges: I,
    ) -> FTResult<Self>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let lookup = |span: &[u8], idx: usize| {
            span_map.get(span).copied().ok_or_else(|| {
                malformed(format!(
                    "merge #{idx}: {:?} is not a known token",
                    string_from_utf8_lossy(span)
                ))
            })
        };

        let mut pair_merges = PairMergeMap::default();
        for (idx, (left, right)) in merges.into_iter().enumerate() {
            let rank = Rank::try_from(idx)
                .map_err(|_| malformed(format!("merge #{idx}: rank overflow")))?;

            let pair = (lookup(&left, idx)?, lookup(&right, idx)?);

            let mut merged = left;
            merged.extend_from_slice(&right);
            let token = lookup(&merged, idx)?;

            if let Some(prev) = pair_merges.insert(pair, MergeRank { rank, token }) {
                return Err(malformed(format!(
                    "merge #{idx}: pair {pair:?} already ranked at #{}",
                    prev.rank
                )));
            }
        }

        Self::from_pair_merges(span_map, pair_merges)
    }

    /// Build a table from a span vocabulary and pre-resolved pair merges.
    ///
    /// Distinct pairs may share a rank; the merge loop then prefers the
    /// leftmost pair.
    ///
    /// ## Arguments
    /// * `span_map` - The ``{ Vec<u8> -> T }`` vocabulary.
    /// * `pair_merges` - The ``{ (T, T) -> (Rank, T) }`` merges.
    pub fn from_pair_merges(
        mut span_map: SpanTokenMap<T>,
        mut pair_merges: PairMergeMap<T>,
    ) -> FTResult<Self> {
        let mut token_spans = try_token_spans(&span_map)?;
        try_validate_pair_merges(&token_spans, &pair_merges)?;

        let mut byte_tokens: ByteTokenArray<T> = [None; 256];
        for (span, &token) in &span_map {
            if let [b] = span.as_slice() {
                byte_tokens[*b as usize] = Some(token);
            }
        }

        span_map.shrink_to_fit();
        token_spans.shrink_to_fit();
        pair_merges.shrink_to_fit();

        let table = Self {
            span_map,
            token_spans,
            byte_tokens,
            pair_merges,
            unknown_token: None,
        };

        log::debug!(
            "built ranker table: {} tokens, {} merges, {} byte tokens",
            table.len(),
            table.num_merges(),
            table.byte_tokens.iter().flatten().count(),
        );

        Ok(table)
    }

    /// Build a table from a ranked span vocabulary.
    ///
    /// Every token whose span splits into two known tokens gets a merge
    /// for each such split; the merge rank is the token value. This is the
    /// layout of ``tiktoken`` vocabularies, where token ids are ranks.
    ///
    /// ## Arguments
    /// * `span_map` - The ranked ``{ Vec<u8> -> T }`` vocabulary.
    pub fn from_span_map(span_map: SpanTokenMap<T>) -> FTResult<Self> {
        let mut pair_merges = PairMergeMap::default();

        for (span, &token) in &span_map {
            if span.len() < 2 {
                continue;
            }
            let rank = token
                .to_u32()
                .ok_or_else(|| malformed(format!("token {token} does not fit a rank")))?;

            for p in 1..span.len() {
                if let Some(&a) = span_map.get(&span[..p])
                    && let Some(&b) = span_map.get(&span[p..])
                {
                    pair_merges.insert((a, b), MergeRank { rank, token });
                }
            }
        }

        Self::from_pair_merges(span_map, pair_merges)
    }

    /// Set the unknown token.
    ///
    /// Bytes which no token covers are encoded as this token
    /// (under [`crate::encoders::UnknownSymbolPolicy::Fallback`]).
    ///
    /// ## Arguments
    /// * `token` - A token already present in the vocabulary.
    pub fn with_unknown_token(
        mut self,
        token: T,
    ) -> FTResult<Self> {
        if !self.token_spans.contains_key(&token) {
            return Err(malformed(format!(
                "unknown token {token} is not in the vocabulary"
            )));
        }
        self.unknown_token = Some(token);
        Ok(self)
    }

    /// The configured unknown token, if any.
    pub fn unknown_token(&self) -> Option<T> {
        self.unknown_token
    }

    /// The number of tokens in the vocabulary.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.token_spans.len()
    }

    /// The number of ranked pairs.
    pub fn num_merges(&self) -> usize {
        self.pair_merges.len()
    }

    /// The largest token in the vocabulary.
    pub fn max_token(&self) -> Option<T> {
        self.token_spans.keys().copied().max()
    }

    /// Get the ``{ Vec<u8> -> T }`` vocabulary.
    pub fn span_map(&self) -> &SpanTokenMap<T> {
        &self.span_map
    }

    /// Get the ``{ T -> Vec<u8> }`` dictionary.
    pub fn token_spans(&self) -> &TokenSpanMap<T> {
        &self.token_spans
    }

    /// Get the ``{ (T, T) -> (Rank, T) }`` merges.
    pub fn pair_merges(&self) -> &PairMergeMap<T> {
        &self.pair_merges
    }

    /// Get the single-byte token for a byte, if any.
    #[inline(always)]
    pub fn lookup_byte(
        &self,
        byte: u8,
    ) -> Option<T> {
        self.byte_tokens[byte as usize]
    }

    /// Get the token for a span, if any.
    pub fn lookup_token(
        &self,
        span: &[u8],
    ) -> Option<T> {
        match span {
            [b] => self.lookup_byte(*b),
            _ => self.span_map.get(span).copied(),
        }
    }

    /// Get the span for a token, if any.
    pub fn lookup_span(
        &self,
        token: T,
    ) -> Option<&[u8]> {
        self.token_spans.get(&token).map(Vec::as_slice)
    }

    /// Get the rank and merged token of a pair, if the pair is ranked.
    #[inline(always)]
    pub fn lookup_merge(
        &self,
        pair: &Pair<T>,
    ) -> Option<MergeRank<T>> {
        self.pair_merges.get(pair).copied()
    }

    /// Get the rank of a pair, if any.
    pub fn rank_of(
        &self,
        pair: &Pair<T>,
    ) -> Option<Rank> {
        self.lookup_merge(pair).map(|m| m.rank)
    }

    /// Get the merged token of a pair, if any.
    pub fn token_id_of(
        &self,
        pair: &Pair<T>,
    ) -> Option<T> {
        self.lookup_merge(pair).map(|m| m.token)
    }

    /// The merges, ordered by ``(rank, pair)``.
    pub fn sorted_merges(&self) -> Vec<(Pair<T>, MergeRank<T>)> {
        let mut merges: Vec<_> = self.pair_merges.iter().map(|(&p, &m)| (p, m)).collect();
        merges.sort_by_key(|&(pair, m)| (m.rank, pair));
        merges
    }
}
