use crate::{encoders::symbols::Symbol, types::TokenType, vocab::RankerTable};

/// A trait for running the merge loop over a span's symbols.
pub trait MergeEncoder<T: TokenType>: Send {
    /// Merge `symbols` in place until no ranked pair remains.
    ///
    /// Each merge replaces two adjacent mergeable symbols with one symbol
    /// covering both. The lowest-rank pair merges first; equal ranks merge
    /// leftmost first.
    ///
    /// ## Arguments
    /// * `table` - The ranker table.
    /// * `symbols` - The symbols of one span, in input order.
    fn merge_symbols(
        &mut self,
        table: &RankerTable<T>,
        symbols: &mut Vec<Symbol<T>>,
    );
}
