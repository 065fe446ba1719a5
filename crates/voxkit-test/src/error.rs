//! Error types for the test framework

use thiserror::Error;
use voxkit_core::Extent;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Value comparison failed
    #[error(
        "value comparison failed at index {index}: expected {expected}, got {actual}, delta {delta}"
    )]
    ValueMismatch {
        index: usize,
        expected: f64,
        actual: f64,
        delta: f64,
    },

    /// Two grids have different extents
    #[error("extent mismatch at index {index}: {expected} vs {actual}")]
    ExtentMismatch {
        index: usize,
        expected: Extent,
        actual: Extent,
    },

    /// Voxel comparison failed
    #[error("voxel mismatch at index {index}: ({x}, {y}, {z}) {expected} vs {actual}")]
    VoxelMismatch {
        index: usize,
        x: u32,
        y: u32,
        z: u32,
        expected: f64,
        actual: f64,
    },

    /// Building a fixture failed
    #[error("fixture error: {0}")]
    Core(#[from] voxkit_core::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
