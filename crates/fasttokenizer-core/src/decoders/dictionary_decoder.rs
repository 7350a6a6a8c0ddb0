//! # Dictionary ``{ T -> Vec<u8> }`` Token Decoder

use std::sync::Arc;

use crate::{
    decoders::TokenDecoder,
    errors::{FTError, FTResult},
    types::{TokenType, token_to_u64},
    vocab::RankerTable,
};

/// A token dictionary [`TokenDecoder<T>`].
#[derive(Debug, Clone)]
pub struct DictionaryDecoder<T: TokenType> {
    table: Arc<RankerTable<T>>,
}

impl<T: TokenType> DictionaryDecoder<T> {
    /// Creates a new decoder over a table.
    pub fn new(table: Arc<RankerTable<T>>) -> Self {
        Self { table }
    }

    /// Get the attached table.
    pub fn table(&self) -> &Arc<RankerTable<T>> {
        &self.table
    }
}

impl<T: TokenType> TokenDecoder<T> for DictionaryDecoder<T> {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, tokens, buf)))]
    fn try_decode_append(
        &self,
        tokens: &[T],
        buf: &mut Vec<u8>,
    ) -> FTResult<()> {
        for &token in tokens {
            let span = self.table.lookup_span(token).ok_or(FTError::UnknownToken {
                token: token_to_u64(token),
            })?;
            buf.extend_from_slice(span);
        }
        Ok(())
    }
}
