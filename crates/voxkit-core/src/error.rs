//! Error types for voxkit-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use crate::Extent;
use thiserror::Error;

/// voxkit error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid extent (a side of zero voxels)
    #[error("invalid extent: {x}x{y}x{z}")]
    InvalidExtent { x: u32, y: u32, z: u32 },

    /// Two inputs expected to share an extent do not
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: Extent, actual: Extent },

    /// On and off values of a binary encoding must differ
    #[error("invalid binary values: on={on}, off={off}")]
    InvalidBinaryValues { on: u32, off: u32 },

    /// A voxel array used as a mask holds a value that is neither on nor off
    #[error("voxel value {value} at ({x}, {y}, {z}) is neither on nor off")]
    NotBinary { x: u32, y: u32, z: u32, value: u32 },

    /// Voxel element type not supported by this operation
    #[error("unsupported voxel type: {0}")]
    UnsupportedVoxelKind(&'static str),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type alias for voxkit-core operations
pub type Result<T> = std::result::Result<T, Error>;
