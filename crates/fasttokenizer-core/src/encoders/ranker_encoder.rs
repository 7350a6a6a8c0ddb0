//! # Ranker Encoder

use std::sync::Arc;

use crate::{
    encoders::{
        EncoderOptions,
        TokenEncoder,
        merge_encoders::MergeEncoder,
        symbols::{Symbol, append_base_symbols},
    },
    errors::FTResult,
    spanning::TextSpanner,
    types::TokenType,
    vocab::RankerTable,
};

/// A [`TokenEncoder`] backed by a [`RankerTable`].
///
/// Each call allocates its own merge state, so one encoder may be shared
/// across threads.
#[derive(Clone)]
pub struct RankerEncoder<T: TokenType> {
    table: Arc<RankerTable<T>>,
    options: EncoderOptions,
    spanner: Option<TextSpanner>,
    merge_builder: Arc<dyn Fn() -> Box<dyn MergeEncoder<T>> + Send + Sync>,
}

impl<T: TokenType> core::fmt::Debug for RankerEncoder<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("RankerEncoder")
            .field("table", &self.table)
            .field("options", &self.options)
            .finish()
    }
}

impl<T: TokenType> RankerEncoder<T> {
    /// Create a new encoder.
    ///
    /// ## Arguments
    /// * `table` - The ranker table.
    /// * `options` - The encoder options.
    ///
    /// ## Returns
    /// The encoder, or [`crate::FTError::Pattern`] if the pattern does not compile.
    pub fn new(
        table: Arc<RankerTable<T>>,
        options: EncoderOptions,
    ) -> FTResult<Self> {
        let spanner = options
            .pattern()
            .map(TextSpanner::from_pattern)
            .transpose()?;
        let merge_builder = options.merge_strategy().merge_encoder_builder::<T>();

        Ok(Self {
            table,
            options,
            spanner,
            merge_builder,
        })
    }

    /// Get the encoder options.
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encode bytes into merged symbols.
    ///
    /// Each symbol carries the byte range it covers, so the symbols
    /// partition `text` in order.
    pub fn try_encode_symbols(
        &self,
        text: &[u8],
    ) -> FTResult<Vec<Symbol<T>>> {
        let mut symbols = Vec::with_capacity(text.len());
        self.encode_symbols_append(text, &mut symbols)?;
        Ok(symbols)
    }

    fn encode_symbols_append(
        &self,
        text: &[u8],
        symbols: &mut Vec<Symbol<T>>,
    ) -> FTResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        let spans = match &self.spanner {
            Some(spanner) => spanner.split_spans(text),
            None => vec![0..text.len()],
        };

        let mut merger = (self.merge_builder)();
        let mut span_symbols = Vec::new();
        let mut unknown = 0;

        for span in spans {
            span_symbols.clear();
            unknown += append_base_symbols(
                &self.table,
                text,
                span,
                self.options.granularity(),
                self.options.unknown_policy(),
                &mut span_symbols,
            )?;
            merger.merge_symbols(&self.table, &mut span_symbols);
            symbols.extend_from_slice(&span_symbols);
        }

        if unknown > 0 {
            log::warn!("encoded {unknown} uncovered byte(s) as the unknown token");
        }

        Ok(())
    }
}

impl<T: TokenType> TokenEncoder<T> for RankerEncoder<T> {
    fn table(&self) -> &Arc<RankerTable<T>> {
        &self.table
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text, tokens)))]
    fn try_encode_append(
        &self,
        text: &[u8],
        tokens: &mut Vec<T>,
    ) -> FTResult<()> {
        let symbols = self.try_encode_symbols(text)?;
        tokens.extend(symbols.into_iter().map(|s| s.token));
        Ok(())
    }
}
