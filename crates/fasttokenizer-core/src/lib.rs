//! # `fasttokenizer` Rank-Driven BPE Tokenizer Core
//!
//! This is the engine behind the `libfasttokenizer` shared library.
//!
//! A [`RankerTable`] maps adjacent token pairs to a merge rank and a merged
//! token; a [`TokenEncoder`] applies the lowest-rank merges to a byte string
//! until no rankable pair remains.
//!
//! See:
//! * [`vocab`] to build and load [`RankerTable`]s.
//! * [`encoders`] to encode bytes into tokens.
//! * [`decoders`] to decode tokens back into bytes.
//! * [`global`] for the process-wide ranker singleton.
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
//!
//! ## Building and Using a Table
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fasttokenizer_core::{
//!     EncoderOptions,
//!     RankerTable,
//!     TokenEncoder,
//!     vocab::SpanTokenMap,
//! };
//!
//! let mut span_map: SpanTokenMap<u32> = (0..=255u8).map(|b| (vec![b], b as u32)).collect();
//! span_map.insert(b"ab".to_vec(), 256);
//!
//! let table = RankerTable::new(span_map, [(b"a".to_vec(), b"b".to_vec())]).unwrap();
//! let encoder = EncoderOptions::default().build(Arc::new(table)).unwrap();
//!
//! assert_eq!(encoder.try_encode(b"abc").unwrap(), vec![256, b'c' as u32]);
//! ```
#![warn(missing_docs, unused)]

#[cfg(feature = "rayon")]
pub mod rayon;

pub mod compat;
pub mod decoders;
pub mod encoders;
pub mod errors;
pub mod global;
pub mod spanning;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use decoders::{DictionaryDecoder, TokenDecoder};
#[doc(inline)]
pub use encoders::{EncoderOptions, RankerEncoder, TokenEncoder};
#[doc(inline)]
pub use errors::{FTError, FTResult};
#[doc(inline)]
pub use types::{Pair, TokenType};
#[doc(inline)]
pub use vocab::{MergeRank, RankerTable};
