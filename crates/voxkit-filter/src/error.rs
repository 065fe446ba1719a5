//! Error types for voxkit-filter

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxkit_core::Error),

    /// Invalid filter parameters, caught before any voxel is read
    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
