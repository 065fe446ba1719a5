//! voxkit core - basic data structures for voxel image processing
//!
//! This crate provides the fundamental data structures used throughout
//! the voxkit library:
//!
//! - [`Extent`] / [`Resolution`] / [`Point3`] - grid geometry
//! - [`BoundingBox`] - positioned box regions
//! - [`Voxels`] - the 3D sample container, with per-plane
//!   [`VoxelBuffer`] / [`VoxelBufferMut`] views
//! - [`Channel`] - a voxel grid of runtime-chosen element type
//! - [`BinaryValues`] / [`BinaryValuesByte`] - on/off encodings
//! - [`Mask`] - binary voxel images
//! - [`ObjectMask`] / [`ObjectCollection`] - objects positioned in a scene
//! - [`Histogram`] - value counts over a grid, mask or object
//!
//! Voxel-wise arithmetic lives in [`voxels::arith`] as methods on
//! [`Voxels`].

pub mod bbox;
pub mod binary;
pub mod channel;
pub mod error;
pub mod extent;
pub mod histogram;
pub mod mask;
pub mod object;
pub mod voxels;

pub use bbox::BoundingBox;
pub use binary::{BinaryValues, BinaryValuesByte};
pub use channel::{Channel, ChannelData};
pub use error::{Error, Result};
pub use extent::{Extent, Point3, Resolution};
pub use histogram::Histogram;
pub use mask::Mask;
pub use object::{ObjectCollection, ObjectMask};
pub use voxels::{
    ArithOp, IntegerVoxel, ScalarOp, VoxelBuffer, VoxelBufferMut, VoxelKind, VoxelType, Voxels,
    mean_of_three,
};
