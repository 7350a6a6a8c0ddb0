//! # Merge Strategy Selector

use std::sync::Arc;

use crate::{
    encoders::merge_encoders::{LinearScanMergeEncoder, MergeEncoder, PriorityMergeEncoder},
    types::TokenType,
};

/// Policy enum for selecting a [`MergeEncoder`].
///
/// Every strategy produces identical tokens; they differ only in cost.
#[derive(
    Default,
    Debug,
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
pub enum MergeStrategy {
    /// The canonical best merge encoder.
    ///
    /// Serialized configs that name this keep tracking "the good one" as
    /// encoders improve.
    ///
    /// This is currently an alias for: [`PriorityMerge`](`Self::PriorityMerge`)
    #[default]
    Default,

    /// The canonical reference merge encoder, for testing and comparison.
    ///
    /// This is currently an alias for: [`LinearScan`](`Self::LinearScan`)
    Reference,

    /// Use the [`PriorityMergeEncoder`].
    PriorityMerge,

    /// Use the [`LinearScanMergeEncoder`].
    LinearScan,
}

impl MergeStrategy {
    /// Get a builder for the configured [`MergeEncoder`].
    pub fn merge_encoder_builder<T: TokenType>(
        &self
    ) -> Arc<dyn Fn() -> Box<dyn MergeEncoder<T>> + Send + Sync> {
        use MergeStrategy::*;
        match self {
            Reference | LinearScan => Arc::new(|| Box::new(LinearScanMergeEncoder::<T>::default())),
            Default | PriorityMerge => Arc::new(|| Box::new(PriorityMergeEncoder::<T>::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_strategy_names() {
        assert_eq!(MergeStrategy::default(), MergeStrategy::Default);
        assert_eq!(MergeStrategy::PriorityMerge.to_string(), "priority_merge");
        assert_eq!(
            MergeStrategy::from_str("reference").unwrap(),
            MergeStrategy::Reference
        );
        assert!(MergeStrategy::from_str("bogus").is_err());
    }

    #[test]
    fn test_all_strategies_build() {
        for strategy in MergeStrategy::iter() {
            let builder = strategy.merge_encoder_builder::<u32>();
            let _encoder = builder();
        }
    }
}
