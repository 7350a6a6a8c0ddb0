//! # Base Symbols
//!
//! Encoding starts by splitting each span into base symbols: one per byte,
//! or one per UTF-8 codepoint. Symbols are ``(start, len)`` views into the
//! input buffer, tagged with their current token.

use core::ops::Range;

use crate::{
    errors::{FTError, FTResult},
    types::TokenType,
    vocab::RankerTable,
};

/// The unit of the initial symbol split.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum Granularity {
    /// One symbol per byte.
    #[default]
    Byte,

    /// One symbol per valid UTF-8 codepoint.
    ///
    /// Invalid UTF-8 bytes, and codepoints with no token, fall back to
    /// one symbol per byte.
    Codepoint,
}

/// What to do with a byte no token covers.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum UnknownSymbolPolicy {
    /// Emit the table's unknown token, one per uncovered byte.
    ///
    /// Fails with [`FTError::UnknownSymbol`] when the table has no unknown token.
    #[default]
    Fallback,

    /// Fail with [`FTError::UnknownSymbol`].
    Fail,
}

/// A symbol in the merge loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol<T: TokenType> {
    /// Byte offset of the symbol in the input.
    pub start: usize,

    /// Byte length of the symbol.
    pub len: usize,

    /// The current token for the symbol.
    pub token: T,

    /// Whether the symbol may take part in merges.
    ///
    /// Unknown-token symbols are never merged.
    pub mergeable: bool,
}

impl<T: TokenType> Symbol<T> {
    /// The byte range of the symbol in the input.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Split `text[range]` into base symbols, appending to `symbols`.
///
/// ## Arguments
/// * `table` - The ranker table.
/// * `text` - The full input buffer; symbol offsets are relative to it.
/// * `range` - The span of `text` to split.
/// * `granularity` - The base symbol unit.
/// * `policy` - The uncovered-byte policy.
/// * `symbols` - The target buffer.
///
/// ## Returns
/// The number of unknown-token symbols appended.
pub fn append_base_symbols<T: TokenType>(
    table: &RankerTable<T>,
    text: &[u8],
    range: Range<usize>,
    granularity: Granularity,
    policy: UnknownSymbolPolicy,
    symbols: &mut Vec<Symbol<T>>,
) -> FTResult<usize> {
    let mut unknown = 0;
    let mut push_bytes = |start: usize, len: usize, symbols: &mut Vec<Symbol<T>>| {
        for offset in start..start + len {
            let byte = text[offset];
            let symbol = match table.lookup_byte(byte) {
                Some(token) => Symbol {
                    start: offset,
                    len: 1,
                    token,
                    mergeable: true,
                },
                None => {
                    let token = match (policy, table.unknown_token()) {
                        (UnknownSymbolPolicy::Fallback, Some(token)) => token,
                        _ => return Err(FTError::UnknownSymbol { offset, byte }),
                    };
                    unknown += 1;
                    Symbol {
                        start: offset,
                        len: 1,
                        token,
                        mergeable: false,
                    }
                }
            };
            symbols.push(symbol);
        }
        Ok(())
    };

    match granularity {
        Granularity::Byte => push_bytes(range.start, range.len(), symbols)?,
        Granularity::Codepoint => {
            let mut start = range.start;
            for chunk in text[range].utf8_chunks() {
                for (idx, c) in chunk.valid().char_indices() {
                    let len = c.len_utf8();
                    let offset = start + idx;
                    match table.lookup_token(&text[offset..offset + len]) {
                        Some(token) => symbols.push(Symbol {
                            start: offset,
                            len,
                            token,
                            mergeable: true,
                        }),
                        None => push_bytes(offset, len, symbols)?,
                    }
                }
                start += chunk.valid().len();

                let invalid = chunk.invalid().len();
                push_bytes(start, invalid, symbols)?;
                start += invalid;
            }
        }
    }

    Ok(unknown)
}
