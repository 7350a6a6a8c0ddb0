//! # Token Decoder Trait

use crate::{compat::strings::string_from_utf8_lossy, errors::FTResult, types::TokenType};

/// Trait for token decoders.
pub trait TokenDecoder<T: TokenType>: Send + Sync {
    /// Decode tokens, appending their bytes to a buffer.
    ///
    /// ## Arguments
    /// * `tokens` - A slice of tokens to decode.
    /// * `buf` - The target byte buffer.
    fn try_decode_append(
        &self,
        tokens: &[T],
        buf: &mut Vec<u8>,
    ) -> FTResult<()>;

    /// Decodes tokens into bytes.
    fn try_decode_to_bytes(
        &self,
        tokens: &[T],
    ) -> FTResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(tokens.len() * 4);
        self.try_decode_append(tokens, &mut buf)?;
        Ok(buf)
    }

    /// Decodes tokens into a string; invalid UTF-8 is replaced.
    fn try_decode_to_string(
        &self,
        tokens: &[T],
    ) -> FTResult<String> {
        Ok(string_from_utf8_lossy(&self.try_decode_to_bytes(tokens)?))
    }

    /// Decodes a batch of token sequences into bytes.
    fn try_decode_batch_to_bytes(
        &self,
        batch: &[Vec<T>],
    ) -> FTResult<Vec<Vec<u8>>> {
        batch
            .iter()
            .map(|tokens| self.try_decode_to_bytes(tokens))
            .collect()
    }
}
