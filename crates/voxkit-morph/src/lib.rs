//! voxkit-morph - Morphological operations on binary masks
//!
//! This crate provides set morphology over [`Mask`](voxkit_core::Mask)s:
//!
//! - Neighborhoods: 4/8-connected in 2D, 6/26-connected in 3D, or z-only
//! - Dilation and erosion with optional intensity gating
//! - Opening, closing and outlines
//! - Growing a single [`ObjectMask`](voxkit_core::ObjectMask) inside its scene

pub mod binary;
mod error;
pub mod neighborhood;
pub mod options;

pub use binary::{close, dilate, dilate_inplace, dilate_object, erode, erode_inplace, open, outline};
pub use error::{MorphError, MorphResult};
pub use neighborhood::Neighborhood;
pub use options::{DilateOptions, ErodeOptions};
