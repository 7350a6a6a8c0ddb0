//! # Merge Encoders
//!
//! A [`MergeEncoder`] runs the merge loop over the base symbols of one span.

mod linear_scan_encoder;
mod merge_encoder;
mod merge_strategy;
mod priority_merge_encoder;

#[doc(inline)]
pub use linear_scan_encoder::LinearScanMergeEncoder;
#[doc(inline)]
pub use merge_encoder::MergeEncoder;
#[doc(inline)]
pub use merge_strategy::MergeStrategy;
#[doc(inline)]
pub use priority_merge_encoder::PriorityMergeEncoder;
