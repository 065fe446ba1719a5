//! Error types for voxkit-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxkit_core::Error),

    /// Invalid parameters, caught before any voxel is read
    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
