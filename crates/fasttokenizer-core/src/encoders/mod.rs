//! # Token Encoders
//!
//! A [`RankerEncoder`] splits its input into spans, splits each span into
//! base [`symbols`], and runs a [`merge_encoders::MergeEncoder`] over them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fasttokenizer_core::{
//!     EncoderOptions,
//!     FTResult,
//!     RankerTable,
//!     TokenEncoder,
//!     encoders::Granularity,
//! };
//!
//! fn example(
//!     table: Arc<RankerTable<u32>>,
//!     batch: &[&[u8]],
//! ) -> FTResult<Vec<Vec<u32>>> {
//!     let encoder = EncoderOptions::default()
//!         .with_granularity(Granularity::Codepoint)
//!         .build(table)?;
//!     encoder.try_encode_batch(batch)
//! }
//! ```

mod encoder_options;
pub mod merge_encoders;
mod ranker_encoder;
pub mod symbols;
#[cfg(test)]
pub(crate) mod testing;
mod token_encoder;

#[doc(inline)]
pub use encoder_options::*;
#[doc(inline)]
pub use merge_encoders::MergeStrategy;
#[doc(inline)]
pub use ranker_encoder::*;
#[doc(inline)]
pub use symbols::{Granularity, UnknownSymbolPolicy};
#[doc(inline)]
pub use token_encoder::*;
