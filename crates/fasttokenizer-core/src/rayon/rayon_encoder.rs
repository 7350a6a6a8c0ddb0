//! # Parallel Encoder

use std::sync::Arc;

use crate::{encoders::TokenEncoder, errors::FTResult, types::TokenType, vocab::RankerTable};

/// Batch-Level Parallel Encoder Wrapper.
///
/// Enables ``rayon`` encoding of batches when available.
#[derive(Debug, Clone)]
pub struct ParallelRayonEncoder<T: TokenType, E: TokenEncoder<T>> {
    /// Inner encoder.
    pub inner: E,

    _marker: std::marker::PhantomData<T>,
}

impl<T, E> ParallelRayonEncoder<T, E>
where
    T: TokenType,
    E: TokenEncoder<T>,
{
    /// Create a new parallel encoder.
    ///
    /// ## Arguments
    /// * `inner` - The token encoder to wrap.
    ///
    /// ## Returns
    /// A new `ParallelRayonEncoder` instance.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T, E> TokenEncoder<T> for ParallelRayonEncoder<T, E>
where
    T: TokenType,
    E: TokenEncoder<T>,
{
    fn table(&self) -> &Arc<RankerTable<T>> {
        self.inner.table()
    }

    fn try_encode_append(
        &self,
        text: &[u8],
        tokens: &mut Vec<T>,
    ) -> FTResult<()> {
        self.inner.try_encode_append(text, tokens)
    }

    fn try_encode_batch(
        &self,
        batch: &[&[u8]],
    ) -> FTResult<Vec<Vec<T>>> {
        use rayon::prelude::*;

        batch
            .par_iter()
            .map(|text| self.inner.try_encode(text))
            .collect()
    }
}
