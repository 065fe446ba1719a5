//! Voxels - the 3D sample container
//!
//! A [`Voxels`] grid stores one flat buffer per z-plane. Inside a plane,
//! samples are laid out row-major: the sample at (x, y) lives at
//! `y * width + x` (see [`Extent::offset`]).
//!
//! # Element types
//!
//! Three element types are supported through the [`VoxelType`] trait:
//!
//! - `u8` - the dominant type, range `[0, 255]`
//! - `u16` - range `[0, 65535]`
//! - `f32` - range `[0, f32::MAX]`
//!
//! Every value written by an arithmetic kernel is saturated into the
//! element type's range, never wrapped.

pub mod arith;
mod buffer;

pub use arith::{ArithOp, ScalarOp, mean_of_three};
pub use buffer::{VoxelBuffer, VoxelBufferMut};

use crate::error::{Error, Result};
use crate::{BoundingBox, Extent, Point3};
use std::fmt;

/// Voxel element type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelKind {
    /// Unsigned 8-bit
    U8,
    /// Unsigned 16-bit
    U16,
    /// 32-bit float
    F32,
}

impl VoxelKind {
    /// Largest storable value
    pub fn max_value(self) -> f64 {
        match self {
            VoxelKind::U8 => u8::MAX as f64,
            VoxelKind::U16 => u16::MAX as f64,
            VoxelKind::F32 => f32::MAX as f64,
        }
    }

    /// Smallest storable value
    pub fn min_value(self) -> f64 {
        0.0
    }

    /// Whether samples are integers
    pub fn is_integer(self) -> bool {
        !matches!(self, VoxelKind::F32)
    }

    pub fn name(self) -> &'static str {
        match self {
            VoxelKind::U8 => "u8",
            VoxelKind::U16 => "u16",
            VoxelKind::F32 => "f32",
        }
    }
}

impl fmt::Display for VoxelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar sample type that can be stored in a [`Voxels`] grid.
pub trait VoxelType:
    Copy + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static
{
    /// Element type tag
    const KIND: VoxelKind;

    /// Widen to f64 (lossless for all supported types)
    fn to_f64(self) -> f64;

    /// Narrow from f64, saturating into the valid range.
    ///
    /// Integer types round to nearest. NaN maps to 0.
    fn from_f64(value: f64) -> Self;
}

/// Integer voxel types, which can index a histogram.
pub trait IntegerVoxel: VoxelType + Eq + Ord + std::hash::Hash {
    /// Number of representable values (histogram bin count)
    const NUM_VALUES: usize;

    /// Value as a histogram bin index
    fn to_index(self) -> usize;

    /// Value from a bin index, saturating
    fn from_index(index: usize) -> Self;
}

impl VoxelType for u8 {
    const KIND: VoxelKind = VoxelKind::U8;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return 0;
        }
        value.round().clamp(0.0, u8::MAX as f64) as u8
    }
}

impl VoxelType for u16 {
    const KIND: VoxelKind = VoxelKind::U16;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return 0;
        }
        value.round().clamp(0.0, u16::MAX as f64) as u16
    }
}

impl VoxelType for f32 {
    const KIND: VoxelKind = VoxelKind::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, f32::MAX as f64) as f32
    }
}

impl IntegerVoxel for u8 {
    const NUM_VALUES: usize = 256;

    #[inline]
    fn to_index(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        index.min(u8::MAX as usize) as u8
    }
}

impl IntegerVoxel for u16 {
    const NUM_VALUES: usize = 65536;

    #[inline]
    fn to_index(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        index.min(u16::MAX as usize) as u16
    }
}

/// A 3D grid of scalar samples, stored as one flat buffer per z-plane.
///
/// # Examples
///
/// ```
/// use voxkit_core::{Extent, Voxels};
///
/// let extent = Extent::new(4, 3, 2).unwrap();
/// let mut voxels: Voxels<u8> = Voxels::new(extent);
/// voxels.set(1, 2, 1, 200);
/// assert_eq!(voxels.get(1, 2, 1), 200);
/// assert_eq!(voxels.plane(1).get(extent.offset(1, 2)), 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Voxels<T> {
    extent: Extent,
    planes: Vec<Vec<T>>,
}

impl<T: VoxelType> Voxels<T> {
    /// Create a zero-initialized grid
    pub fn new(extent: Extent) -> Self {
        Self::filled(extent, T::default())
    }

    /// Create a grid with every voxel set to `value`
    pub fn filled(extent: Extent, value: T) -> Self {
        let planes = (0..extent.z())
            .map(|_| vec![value; extent.volume_xy()])
            .collect();
        Self { extent, planes }
    }

    /// Create a grid by evaluating `f(x, y, z)` at every voxel
    pub fn from_fn(extent: Extent, mut f: impl FnMut(u32, u32, u32) -> T) -> Self {
        let mut planes = Vec::with_capacity(extent.z() as usize);
        for z in 0..extent.z() {
            let mut plane = Vec::with_capacity(extent.volume_xy());
            for y in 0..extent.y() {
                for x in 0..extent.x() {
                    plane.push(f(x, y, z));
                }
            }
            planes.push(plane);
        }
        Self { extent, planes }
    }

    /// Create a grid from existing plane buffers
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the number or size of the
    /// planes does not match `extent`.
    pub fn from_planes(extent: Extent, planes: Vec<Vec<T>>) -> Result<Self> {
        if planes.len() != extent.z() as usize {
            return Err(Error::InvalidParameter(format!(
                "expected {} planes, got {}",
                extent.z(),
                planes.len()
            )));
        }
        if let Some(bad) = planes.iter().find(|p| p.len() != extent.volume_xy()) {
            return Err(Error::InvalidParameter(format!(
                "plane has {} voxels, expected {}",
                bad.len(),
                extent.volume_xy()
            )));
        }
        Ok(Self { extent, planes })
    }

    /// Create a single-plane grid from a row-major slice
    pub fn from_slice_2d(width: u32, height: u32, data: &[T]) -> Result<Self> {
        let extent = Extent::new_2d(width, height)?;
        Self::from_planes(extent, vec![data.to_vec()])
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Element type tag
    #[inline]
    pub fn kind(&self) -> VoxelKind {
        T::KIND
    }

    /// Buffer view of plane `z`
    ///
    /// # Panics
    ///
    /// Panics if `z` is out of range.
    #[inline]
    pub fn plane(&self, z: u32) -> VoxelBuffer<'_, T> {
        VoxelBuffer::new(&self.planes[z as usize])
    }

    /// Mutable buffer view of plane `z`
    #[inline]
    pub fn plane_mut(&mut self, z: u32) -> VoxelBufferMut<'_, T> {
        VoxelBufferMut::new(&mut self.planes[z as usize])
    }

    /// Raw samples of plane `z`
    #[inline]
    pub fn plane_slice(&self, z: u32) -> &[T] {
        &self.planes[z as usize]
    }

    /// Mutable raw samples of plane `z`
    #[inline]
    pub fn plane_slice_mut(&mut self, z: u32) -> &mut [T] {
        &mut self.planes[z as usize]
    }

    /// Get a voxel value.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the extent.
    #[inline]
    pub fn get(&self, x: u32, y: u32, z: u32) -> T {
        self.planes[z as usize][self.extent.offset(x, y)]
    }

    /// Get a voxel value at a signed point, `None` outside the extent.
    #[inline]
    pub fn get_point(&self, p: Point3) -> Option<T> {
        if self.extent.contains_point(p) {
            Some(self.get(p.x as u32, p.y as u32, p.z as u32))
        } else {
            None
        }
    }

    /// Set a voxel value.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the extent.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, z: u32, value: T) {
        let offset = self.extent.offset(x, y);
        self.planes[z as usize][offset] = value;
    }

    /// Set every voxel to `value`
    pub fn fill(&mut self, value: T) {
        for plane in &mut self.planes {
            plane.fill(value);
        }
    }

    /// Iterate over all samples, plane by plane
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.planes.iter().flat_map(|p| p.iter().copied())
    }

    /// Iterate mutably over all samples, plane by plane
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.planes.iter_mut().flat_map(|p| p.iter_mut())
    }

    /// Apply `f` to every sample, producing a grid of another type
    pub fn map<U: VoxelType>(&self, mut f: impl FnMut(T) -> U) -> Voxels<U> {
        Voxels {
            extent: self.extent,
            planes: self
                .planes
                .iter()
                .map(|p| p.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }

    /// Number of samples satisfying `pred`
    pub fn count_where(&self, mut pred: impl FnMut(T) -> bool) -> usize {
        self.iter().filter(|&v| pred(v)).count()
    }

    /// Minimum and maximum sample
    pub fn min_max(&self) -> (T, T) {
        let mut iter = self.iter();
        // Extent guarantees at least one voxel
        let first = iter.next().unwrap_or_default();
        iter.fold((first, first), |(lo, hi), v| {
            (
                if v < lo { v } else { lo },
                if v > hi { v } else { hi },
            )
        })
    }

    /// Returns an error unless `other` has the same extent
    pub fn check_same_extent<U: VoxelType>(&self, other: &Voxels<U>) -> Result<()> {
        self.extent.check_equal(other.extent)
    }

    /// Replace the contents with another grid of identical extent.
    ///
    /// # Panics
    ///
    /// Panics if the extents differ. Kernels always produce outputs of
    /// their input's extent, so a mismatch here is a defect.
    pub fn replace(&mut self, other: Voxels<T>) {
        assert_eq!(
            self.extent, other.extent,
            "replacement voxels must keep the extent"
        );
        self.planes = other.planes;
    }

    /// Copy out the sub-grid covered by `bbox`
    ///
    /// # Errors
    ///
    /// Returns an error if the box is not inside the extent.
    pub fn extract_box(&self, bbox: &BoundingBox) -> Result<Voxels<T>> {
        bbox.check_within(self.extent)?;
        let c = bbox.corner();
        Ok(Voxels::from_fn(bbox.extent(), |x, y, z| {
            self.get(x + c.x as u32, y + c.y as u32, z + c.z as u32)
        }))
    }

    /// Consume the grid, returning its plane buffers
    pub fn into_planes(self) -> Vec<Vec<T>> {
        self.planes
    }
}
