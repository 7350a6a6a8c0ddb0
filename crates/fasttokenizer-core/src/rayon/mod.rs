//! # Rayon Utilities
//!
//! [`rayon`] powered wrappers for parallel encoders.

mod rayon_encoder;

pub use rayon_encoder::ParallelRayonEncoder;
