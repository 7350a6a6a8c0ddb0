//! # Encoder Options
//!
//! Options for building a [`TokenEncoder`].

use core::str::FromStr;
use std::sync::Arc;

use crate::{
    encoders::{
        Granularity,
        MergeStrategy,
        RankerEncoder,
        TokenEncoder,
        UnknownSymbolPolicy,
    },
    errors::{FTError, FTResult},
    spanning::DEFAULT_WORD_PATTERN,
    types::TokenType,
    vocab::RankerTable,
};

/// Environment variable selecting the [`Granularity`].
pub const GRANULARITY_ENV: &str = "FASTTOKENIZER_GRANULARITY";

/// Environment variable selecting the [`UnknownSymbolPolicy`].
pub const UNKNOWN_POLICY_ENV: &str = "FASTTOKENIZER_UNKNOWN_POLICY";

/// Environment variable selecting the [`MergeStrategy`].
pub const MERGE_STRATEGY_ENV: &str = "FASTTOKENIZER_MERGE_STRATEGY";

/// Environment variable holding the pre-tokenization pattern.
///
/// The value ``default`` selects [`DEFAULT_WORD_PATTERN`].
pub const PATTERN_ENV: &str = "FASTTOKENIZER_PATTERN";

/// Environment variable enabling parallel batch encoding.
pub const PARALLEL_ENV: &str = "FASTTOKENIZER_PARALLEL";

/// Options for configuring a [`TokenEncoder`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    /// The base symbol unit.
    pub granularity: Granularity,

    /// What to do with bytes no token covers.
    pub unknown_policy: UnknownSymbolPolicy,

    /// The merge loop implementation.
    pub merge_strategy: MergeStrategy,

    /// Optional pre-tokenization pattern.
    ///
    /// When set, merges never cross the boundaries of pattern matches.
    pub pattern: Option<String>,

    /// Should batches be encoded in parallel?
    pub parallel: bool,
}

fn parse_var<V: FromStr>(
    name: &str,
    value: &str,
) -> FTResult<V> {
    V::from_str(value.trim()).map_err(|_| FTError::Config(format!("{name}={value:?}")))
}

impl EncoderOptions {
    /// Read options from the process environment.
    ///
    /// Unset variables keep their defaults. See [`Self::from_vars`].
    pub fn from_env() -> FTResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read options from a variable lookup.
    ///
    /// ## Arguments
    /// * `lookup` - Maps a variable name to its value, if set.
    ///
    /// ## Returns
    /// The options, or [`FTError::Config`] for an unparseable value.
    pub fn from_vars<F>(lookup: F) -> FTResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(value) = lookup(GRANULARITY_ENV) {
            options.set_granularity(parse_var(GRANULARITY_ENV, &value)?);
        }
        if let Some(value) = lookup(UNKNOWN_POLICY_ENV) {
            options.set_unknown_policy(parse_var(UNKNOWN_POLICY_ENV, &value)?);
        }
        if let Some(value) = lookup(MERGE_STRATEGY_ENV) {
            options.set_merge_strategy(parse_var(MERGE_STRATEGY_ENV, &value)?);
        }
        if let Some(value) = lookup(PATTERN_ENV) {
            options.set_pattern(match value.as_str() {
                "" => None,
                "default" => Some(DEFAULT_WORD_PATTERN.to_string()),
                _ => Some(value),
            });
        }
        if let Some(value) = lookup(PARALLEL_ENV) {
            options.set_parallel(match value.trim() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                _ => return Err(FTError::Config(format!("{PARALLEL_ENV}={value:?}"))),
            });
        }

        Ok(options)
    }

    /// Get the configured [`Granularity`].
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Set the configured [`Granularity`].
    pub fn set_granularity(
        &mut self,
        granularity: Granularity,
    ) {
        self.granularity = granularity;
    }

    /// Set the configured [`Granularity`] and return the builder.
    pub fn with_granularity(
        mut self,
        granularity: Granularity,
    ) -> Self {
        self.set_granularity(granularity);
        self
    }

    /// Get the configured [`UnknownSymbolPolicy`].
    pub fn unknown_policy(&self) -> UnknownSymbolPolicy {
        self.unknown_policy
    }

    /// Set the configured [`UnknownSymbolPolicy`].
    pub fn set_unknown_policy(
        &mut self,
        unknown_policy: UnknownSymbolPolicy,
    ) {
        self.unknown_policy = unknown_policy;
    }

    /// Set the configured [`UnknownSymbolPolicy`] and return the builder.
    pub fn with_unknown_policy(
        mut self,
        unknown_policy: UnknownSymbolPolicy,
    ) -> Self {
        self.set_unknown_policy(unknown_policy);
        self
    }

    /// Get the configured [`MergeStrategy`].
    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge_strategy
    }

    /// Set the configured [`MergeStrategy`].
    pub fn set_merge_strategy(
        &mut self,
        merge_strategy: MergeStrategy,
    ) {
        self.merge_strategy = merge_strategy;
    }

    /// Set the configured [`MergeStrategy`] and return the builder.
    pub fn with_merge_strategy(
        mut self,
        merge_strategy: MergeStrategy,
    ) -> Self {
        self.set_merge_strategy(merge_strategy);
        self
    }

    /// Get the configured pre-tokenization pattern.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Set the configured pre-tokenization pattern.
    pub fn set_pattern<P>(
        &mut self,
        pattern: P,
    ) where
        P: Into<Option<String>>,
    {
        self.pattern = pattern.into();
    }

    /// Set the configured pre-tokenization pattern and return the builder.
    pub fn with_pattern<P>(
        mut self,
        pattern: P,
    ) -> Self
    where
        P: Into<Option<String>>,
    {
        self.set_pattern(pattern);
        self
    }

    /// Gets the configured parallelism value.
    ///
    /// Parallel encoders fan batches out over the ``rayon`` pool;
    /// this has no effect without the `rayon` feature.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Sets the configured parallelism value.
    pub fn set_parallel(
        &mut self,
        parallel: bool,
    ) {
        self.parallel = parallel;
    }

    /// Sets the configured parallelism value and return the builder.
    pub fn with_parallel(
        mut self,
        parallel: bool,
    ) -> Self {
        self.set_parallel(parallel);
        self
    }

    /// Build a [`TokenEncoder`] for the given table.
    ///
    /// ## Returns
    /// The encoder, or [`FTError::Pattern`] if the pattern does not compile.
    pub fn build<T: TokenType>(
        &self,
        table: Arc<RankerTable<T>>,
    ) -> FTResult<Arc<dyn TokenEncoder<T>>> {
        let encoder = RankerEncoder::new(table, self.clone())?;

        #[cfg(feature = "rayon")]
        if self.parallel() {
            return Ok(Arc::new(crate::rayon::ParallelRayonEncoder::new(encoder)));
        }

        Ok(Arc::new(encoder))
    }
}
