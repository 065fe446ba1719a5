//! voxkit-region - Region processing for voxkit
//!
//! This crate turns masks into object collections and back:
//!
//! - **Connected component analysis** - Splitting a mask into objects
//! - **Object labelling** - Painting objects into a label image and
//!   recovering objects from one
//!
//! # Examples
//!
//! ```
//! use voxkit_core::{Extent, Mask};
//! use voxkit_region::{Connectivity, find_connected_components};
//!
//! let mut mask = Mask::new(Extent::new(100, 100, 1).unwrap());
//! mask.set(10, 10, 0, true);
//! mask.set(11, 10, 0, true);
//! mask.set(50, 50, 0, true);
//!
//! let objects = find_connected_components(&mask, Connectivity::Face, false, 1).unwrap();
//! assert_eq!(objects.len(), 2);
//! ```

pub mod conncomp;
mod error;
pub mod label;

pub use conncomp::{Connectivity, find_connected_components};
pub use error::{RegionError, RegionResult};
pub use label::{label_objects, objects_from_labels};
