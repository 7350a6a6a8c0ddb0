//! # Common Types and Traits
use core::{
    fmt::{Debug, Display},
    hash::Hash,
};

use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

/// A type that can be used as a token id.
///
/// These are constrained to be unsigned primitive integers;
/// such that the max token in a vocabulary is less than `T::max()`.
pub trait TokenType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> TokenType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// A pair of tokens.
pub type Pair<T> = (T, T);

/// A merge priority; lower ranks merge first.
pub type Rank = u32;

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type FTHashMap<K, V> = ahash::AHashMap<K, V>;
    } else if #[cfg(feature = "foldhash")] {
        /// Type Alias for hash maps in this crate.
        pub type FTHashMap<K, V> = foldhash::HashMap<K, V>;
    } else {
        /// Type Alias for hash maps in this crate.
        pub type FTHashMap<K, V> = std::collections::HashMap<K, V>;
    }
}

/// Widen a token to `u64` for error reporting.
pub fn token_to_u64<T: TokenType>(token: T) -> u64 {
    token.to_u64().unwrap_or(u64::MAX)
}
