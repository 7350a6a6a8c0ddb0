//! # Vocabulary
//!
//! This module provides the [`RankerTable`] and related io mechanisms.
//!
//! ## Ranker Table
//!
//! A [`RankerTable`] is built once from:
//! * a ``{ Vec<u8> -> T }`` span vocabulary, and
//! * an ordered list of ``(left, right)`` merge rules.
//!
//! and is then shared, read-only, by every encoder built on it.
//!
//! ## Loading
//!
//! See [`io`] for the json + merges and base64 ("tiktoken") file formats.
pub mod byte_level;
pub mod io;
pub mod ranker_table;
pub mod vocab_types;

#[doc(inline)]
pub use ranker_table::{MergeRank, RankerTable};
#[doc(inline)]
pub use vocab_types::{ByteTokenArray, MergeRuleList, PairMergeMap, SpanTokenMap, TokenSpanMap};
