//! voxkit - Voxel image processing kernels
//!
//! # Overview
//!
//! voxkit works on 3D grids of 8-bit, 16-bit or floating-point voxels and
//! binary masks over them:
//!
//! - Voxel arithmetic and histograms ([`Voxels`], [`Histogram`])
//! - Binary morphology with optional intensity gating ([`morph`])
//! - Mean, median and gradient filters ([`filter`])
//! - Connected components and labelling ([`region`])
//! - Global and per-object thresholding ([`threshold`])
//! - JSON-configured pipelines over named entries ([`pipeline`])
//!
//! # Example
//!
//! ```
//! use voxkit::{Extent, Voxels};
//!
//! let voxels = Voxels::filled(Extent::new(8, 8, 2).unwrap(), 7u8);
//! assert_eq!(voxels.extent().volume(), 128);
//! assert_eq!(voxels.get(3, 3, 1), 7);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use voxkit_core::*;

// Re-export kernel crates as modules to avoid name conflicts
pub use voxkit_filter as filter;
pub use voxkit_morph as morph;
pub use voxkit_region as region;
pub use voxkit_threshold as threshold;

pub mod pipeline;
