//! # Token Encoder Trait

use std::sync::Arc;

use crate::{errors::FTResult, types::TokenType, vocab::RankerTable};

/// Expected average bytes per token; used to size output buffers.
pub const EXPECTED_BYTES_PER_TOKEN: f64 = 4.0;

/// A trait for token encoders.
pub trait TokenEncoder<T: TokenType>: Send + Sync {
    /// Return the attached ranker table.
    fn table(&self) -> &Arc<RankerTable<T>>;

    /// Encode bytes, appending to a target buffer.
    ///
    /// On error, `tokens` may hold a partial encoding.
    ///
    /// ## Arguments
    /// * `text` - The bytes to encode.
    /// * `tokens` - The target token buffer to append to.
    fn try_encode_append(
        &self,
        text: &[u8],
        tokens: &mut Vec<T>,
    ) -> FTResult<()>;

    /// Encode bytes into tokens.
    ///
    /// ## Arguments
    /// * `text` - The bytes to encode.
    ///
    /// ## Returns
    /// A `Result` containing the vector of tokens or an error.
    fn try_encode(
        &self,
        text: &[u8],
    ) -> FTResult<Vec<T>> {
        let capacity = text.len() as f64 / (EXPECTED_BYTES_PER_TOKEN * 0.5);
        let mut tokens = Vec::with_capacity(capacity as usize);

        self.try_encode_append(text, &mut tokens)?;
        Ok(tokens)
    }

    /// Encode a batch of byte strings into tokens.
    ///
    /// ## Arguments
    /// * `batch` - A slice of byte strings to encode.
    ///
    /// ## Returns
    /// A `Result` containing the vector of token vectors or an error.
    fn try_encode_batch(
        &self,
        batch: &[&[u8]],
    ) -> FTResult<Vec<Vec<T>>> {
        batch.iter().map(|text| self.try_encode(text)).collect()
    }
}
