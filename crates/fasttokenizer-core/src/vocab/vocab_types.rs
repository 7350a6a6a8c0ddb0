//! # Vocabulary Types

use crate::types::{FTHashMap, Pair};
use crate::vocab::MergeRank;

/// `{ Pair<T> -> MergeRank<T> }` map.
///
/// ## Style Hints
/// Instance names should prefer `pair_merges`, or `pair_merge_map`.
pub type PairMergeMap<T> = FTHashMap<Pair<T>, MergeRank<T>>;

/// `{ Vec<u8> -> T }` map.
///
/// ## Style Hints
/// Instance names should prefer `span_map`, or `span_token_map`.
pub type SpanTokenMap<T> = FTHashMap<Vec<u8>, T>;

/// `{ T -> Vec<u8> }` map.
///
/// ## Style Hints
/// Instance names should prefer `token_spans`, or `token_span_map`.
pub type TokenSpanMap<T> = FTHashMap<T, Vec<u8>>;

/// `[Option<T>; 256]` array.
///
/// Bytes with no single-byte token map to `None`.
///
/// ## Style Hints
/// Instance names should prefer `byte_tokens`, or `byte_token_array`.
pub type ByteTokenArray<T> = [Option<T>; 256];

/// An ordered list of ``(left, right)`` byte-span merge rules.
///
/// The rank of a rule is its position in the list.
pub type MergeRuleList = Vec<(Vec<u8>, Vec<u8>)>;
