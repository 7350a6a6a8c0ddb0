//! # Text Spanning
//!
//! Optional pre-tokenization: split the input into spans so that merges
//! never cross span boundaries.

mod text_spanner;

#[doc(inline)]
pub use text_spanner::*;
