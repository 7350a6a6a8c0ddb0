//! # Token Decoders
//!
//! Decoding is the inverse of encoding: ``T -> Vec<u8>`` through the
//! table's token dictionary.

mod dictionary_decoder;
mod token_decoder;

#[doc(inline)]
pub use dictionary_decoder::*;
#[doc(inline)]
pub use token_decoder::*;
