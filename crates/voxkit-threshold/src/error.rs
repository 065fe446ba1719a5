//! Error types for voxkit-threshold

use thiserror::Error;

/// Errors that can occur during level calculation and thresholding
#[derive(Debug, Error)]
pub enum ThresholdError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxkit_core::Error),

    /// Morphology error while growing an object
    #[error("morphology error: {0}")]
    Morph(#[from] voxkit_morph::MorphError),

    /// Region error while segmenting a mask
    #[error("region error: {0}")]
    Region(#[from] voxkit_region::RegionError),

    /// Invalid parameters, caught before any voxel is read
    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

/// Result type for threshold operations
pub type ThresholdResult<T> = Result<T, ThresholdError>;
