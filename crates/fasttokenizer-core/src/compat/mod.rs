//! # Cross-Rust Version Compatibility and Utility

pub mod strings;
pub mod traits;
