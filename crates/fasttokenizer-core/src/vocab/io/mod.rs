//! # Vocabulary IO
//!
//! Two on-disk layouts are supported:
//! * ``tiktoken`` base64 vocabularies, where token ids are merge ranks;
//!   see [`load_base64_table_path`].
//! * a json ``{ text -> id }`` vocabulary plus a ``merges.txt`` rule list;
//!   see [`load_json_merges_table_path`].
//!
//! ## Loading A Table
//!
//! ```rust,no_run
//! use fasttokenizer_core::{
//!     FTResult,
//!     RankerTable,
//!     vocab::io::{TokenTextEncoding, load_json_merges_table_path},
//! };
//!
//! fn example() -> FTResult<RankerTable<u32>> {
//!     load_json_merges_table_path(
//!         "vocab.json",
//!         "merges.txt",
//!         TokenTextEncoding::ByteLevel,
//!         Some("<unk>"),
//!     )
//! }
//! ```

mod base64_vocab;
mod json_merges_vocab;

#[doc(inline)]
pub use base64_vocab::*;
#[doc(inline)]
pub use json_merges_vocab::*;
