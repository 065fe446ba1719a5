//! voxkit-threshold - Histogram levels and thresholding
//!
//! This crate provides:
//!
//! - **Level calculators** - Otsu, mean, constant, quantile and
//!   mean-plus-deviation strategies behind the [`LevelCalculator`] trait
//! - **Global thresholding** - Fixed or histogram-derived levels
//! - **Per-object levels** - One level per object, painted into a grid or
//!   used to binarize each object on its own
//! - **Component scores** - Distance from the per-object level as a byte
//!
//! # Examples
//!
//! ```
//! use voxkit_core::{BinaryValuesByte, Voxels};
//! use voxkit_threshold::{Otsu, threshold_auto};
//!
//! let voxels = Voxels::from_slice_2d(4, 1, &[12u8, 15, 190, 201]).unwrap();
//! let mask = threshold_auto(&voxels, &Otsu, None, BinaryValuesByte::default()).unwrap();
//! assert_eq!(mask.count_on(), 2);
//! ```

mod error;
pub mod level;
pub mod per_object;
pub mod score;
pub mod threshold;

pub use error::{ThresholdError, ThresholdResult};

pub use level::{ConstantLevel, LevelCalculator, MeanLevel, MeanPlusStdDev, Otsu, QuantileLevel};
pub use per_object::{
    level_per_object, paint_level_per_object, threshold_per_component, threshold_per_object,
};
pub use score::connected_component_score;
pub use threshold::{threshold, threshold_auto};
