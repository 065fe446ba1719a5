//! Error types for voxkit-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxkit_core::Error),

    /// Options that cannot be honored together, caught before any voxel is read
    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
