//! voxkit-filter - Spatial filters for voxel grids
//!
//! This crate provides windowed statistics and derivative filters:
//!
//! - Rolling mean filter with optional input and output masks
//! - Rolling median filter backed by an ordered multiset
//! - Central-difference gradients along one axis or as a magnitude
//!
//! The mean and median filters work plane by plane: each z-plane is
//! filtered with a square window and the planes never interact.

mod error;
pub mod gradient;
pub mod mean;
pub mod median;

pub use error::{FilterError, FilterResult};

pub use gradient::{GradientAxis, gradient, gradient_u16};
pub use mean::mean_filter_2d;
pub use median::{RollingMultiset, median_filter_2d};
