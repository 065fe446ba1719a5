//! Voxel arithmetic operations
//!
//! This module provides voxel-wise arithmetic operations:
//!
//! - Scalar ops (`add_constant`, `multiply_constant`,
//!   `subtract_from_constant`, `max_with_constant`, `min_with_constant`)
//! - Two-grid ops (`arith_add`, `arith_subtract`, `arith_abs_diff`,
//!   `arith_min`, `arith_max`) and [`mean_of_three`]
//! - Unary ops (`invert`, `z_score`)
//! - Masked assignment (`assign_under_mask`, `copy_under_mask`)
//!
//! Every result is computed in f64 and saturated into the element type's
//! range before it is stored: `subtract(10, 250)` on u8 is 0, not a
//! wrapped value. Each op has an allocating form and an `_inplace` form.

use super::{VoxelType, Voxels};
use crate::error::{Error, Result};
use crate::{Histogram, Mask};

/// Two-grid voxel-wise operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// a + b
    Add,
    /// a - b
    Subtract,
    /// |a - b|
    AbsDiff,
    /// min(a, b)
    Min,
    /// max(a, b)
    Max,
}

impl ArithOp {
    #[inline]
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Subtract => a - b,
            ArithOp::AbsDiff => (a - b).abs(),
            ArithOp::Min => a.min(b),
            ArithOp::Max => a.max(b),
        }
    }
}

/// Voxel-with-constant operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarOp {
    /// v + c
    Add(f64),
    /// v * c
    Multiply(f64),
    /// c - v
    SubtractFrom(f64),
    /// c where v < c, otherwise v
    MaxWith(f64),
    /// c where v > c, otherwise v
    MinWith(f64),
}

impl ScalarOp {
    #[inline]
    fn apply(self, v: f64) -> f64 {
        match self {
            ScalarOp::Add(c) => v + c,
            ScalarOp::Multiply(c) => v * c,
            ScalarOp::SubtractFrom(c) => c - v,
            ScalarOp::MaxWith(c) => {
                if v < c {
                    c
                } else {
                    v
                }
            }
            ScalarOp::MinWith(c) => {
                if v > c {
                    c
                } else {
                    v
                }
            }
        }
    }
}

impl<T: VoxelType> Voxels<T> {
    /// Apply a scalar operation in place, saturating each result.
    pub fn apply_scalar_inplace(&mut self, op: ScalarOp) {
        for v in self.iter_mut() {
            *v = T::from_f64(op.apply(v.to_f64()));
        }
    }

    /// Apply a scalar operation, returning a new grid.
    pub fn apply_scalar(&self, op: ScalarOp) -> Voxels<T> {
        let mut out = self.clone();
        out.apply_scalar_inplace(op);
        out
    }

    /// Add a constant value to all voxels.
    ///
    /// Values are clipped to the valid range for the element type.
    ///
    /// # Arguments
    ///
    /// * `val` - Value to add (can be negative for subtraction)
    ///
    /// # Example
    ///
    /// ```
    /// use voxkit_core::{Extent, Voxels};
    ///
    /// let v: Voxels<u8> = Voxels::filled(Extent::new(4, 4, 1).unwrap(), 200);
    /// let brighter = v.add_constant(100.0);
    /// assert_eq!(brighter.get(0, 0, 0), 255);
    /// ```
    pub fn add_constant(&self, val: f64) -> Voxels<T> {
        self.apply_scalar(ScalarOp::Add(val))
    }

    pub fn add_constant_inplace(&mut self, val: f64) {
        self.apply_scalar_inplace(ScalarOp::Add(val))
    }

    /// Multiply all voxels by a constant factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `factor` is negative or not finite.
    pub fn multiply_constant(&self, factor: f64) -> Result<Voxels<T>> {
        let mut out = self.clone();
        out.multiply_constant_inplace(factor)?;
        Ok(out)
    }

    pub fn multiply_constant_inplace(&mut self, factor: f64) -> Result<()> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "factor must be a finite value >= 0.0, got {factor}"
            )));
        }
        self.apply_scalar_inplace(ScalarOp::Multiply(factor));
        Ok(())
    }

    /// Replace every voxel `v` with `val - v`.
    pub fn subtract_from_constant(&self, val: f64) -> Voxels<T> {
        self.apply_scalar(ScalarOp::SubtractFrom(val))
    }

    pub fn subtract_from_constant_inplace(&mut self, val: f64) {
        self.apply_scalar_inplace(ScalarOp::SubtractFrom(val))
    }

    /// Raise every voxel below `val` to `val`.
    pub fn max_with_constant(&self, val: f64) -> Voxels<T> {
        self.apply_scalar(ScalarOp::MaxWith(val))
    }

    pub fn max_with_constant_inplace(&mut self, val: f64) {
        self.apply_scalar_inplace(ScalarOp::MaxWith(val))
    }

    /// Lower every voxel above `val` to `val`.
    pub fn min_with_constant(&self, val: f64) -> Voxels<T> {
        self.apply_scalar(ScalarOp::MinWith(val))
    }

    pub fn min_with_constant_inplace(&mut self, val: f64) {
        self.apply_scalar_inplace(ScalarOp::MinWith(val))
    }

    /// Invert every voxel: `v -> typeMax - v`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVoxelKind`] for float voxels, which have
    /// no meaningful maximum to invert against.
    pub fn invert(&self) -> Result<Voxels<T>> {
        let mut out = self.clone();
        out.invert_inplace()?;
        Ok(out)
    }

    pub fn invert_inplace(&mut self) -> Result<()> {
        if !T::KIND.is_integer() {
            return Err(Error::UnsupportedVoxelKind(T::KIND.name()));
        }
        let max = T::KIND.max_value();
        self.apply_scalar_inplace(ScalarOp::SubtractFrom(max));
        Ok(())
    }

    /// Normalize voxels to z-scores against a histogram.
    ///
    /// Each voxel becomes `max(0, (v - mean) / stddev * factor)`. A
    /// histogram with zero standard deviation maps every voxel to 0.
    pub fn z_score(&self, histogram: &Histogram, factor: f64) -> Voxels<T> {
        let mut out = self.clone();
        out.z_score_inplace(histogram, factor);
        out
    }

    pub fn z_score_inplace(&mut self, histogram: &Histogram, factor: f64) {
        let mean = histogram.mean();
        let std_dev = histogram.std_dev();
        if std_dev == 0.0 {
            log::warn!("z-score against a histogram with zero spread; output is all zero");
            self.fill(T::default());
            return;
        }
        for v in self.iter_mut() {
            let score = (v.to_f64() - mean) / std_dev * factor;
            *v = T::from_f64(score.max(0.0));
        }
    }

    /// Combine with another grid voxel by voxel, returning a new grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the extents differ. No voxel
    /// is touched in that case.
    pub fn arith_binary_op(&self, other: &Voxels<T>, op: ArithOp) -> Result<Voxels<T>> {
        let mut out = self.clone();
        out.arith_binary_op_inplace(other, op)?;
        Ok(out)
    }

    /// In-place form of [`Voxels::arith_binary_op`]: `self = op(self, other)`.
    pub fn arith_binary_op_inplace(&mut self, other: &Voxels<T>, op: ArithOp) -> Result<()> {
        self.check_same_extent(other)?;
        for z in 0..self.extent().z() {
            let src = other.plane_slice(z);
            for (d, &s) in self.plane_slice_mut(z).iter_mut().zip(src) {
                *d = T::from_f64(op.apply(d.to_f64(), s.to_f64()));
            }
        }
        Ok(())
    }

    /// Voxel-wise sum, saturated
    pub fn arith_add(&self, other: &Voxels<T>) -> Result<Voxels<T>> {
        self.arith_binary_op(other, ArithOp::Add)
    }

    /// Voxel-wise difference `self - other`, clipped at 0
    ///
    /// # Example
    ///
    /// ```
    /// use voxkit_core::Voxels;
    ///
    /// let a = Voxels::from_slice_2d(2, 1, &[10u8, 250]).unwrap();
    /// let b = Voxels::from_slice_2d(2, 1, &[250u8, 10]).unwrap();
    /// let d = a.arith_subtract(&b).unwrap();
    /// assert_eq!(d.plane_slice(0), &[0, 240]);
    /// ```
    pub fn arith_subtract(&self, other: &Voxels<T>) -> Result<Voxels<T>> {
        self.arith_binary_op(other, ArithOp::Subtract)
    }

    /// Voxel-wise absolute difference
    pub fn arith_abs_diff(&self, other: &Voxels<T>) -> Result<Voxels<T>> {
        self.arith_binary_op(other, ArithOp::AbsDiff)
    }

    /// Voxel-wise minimum
    pub fn arith_min(&self, other: &Voxels<T>) -> Result<Voxels<T>> {
        self.arith_binary_op(other, ArithOp::Min)
    }

    /// Voxel-wise maximum
    pub fn arith_max(&self, other: &Voxels<T>) -> Result<Voxels<T>> {
        self.arith_binary_op(other, ArithOp::Max)
    }

    pub fn arith_add_inplace(&mut self, other: &Voxels<T>) -> Result<()> {
        self.arith_binary_op_inplace(other, ArithOp::Add)
    }

    pub fn arith_subtract_inplace(&mut self, other: &Voxels<T>) -> Result<()> {
        self.arith_binary_op_inplace(other, ArithOp::Subtract)
    }

    pub fn arith_min_inplace(&mut self, other: &Voxels<T>) -> Result<()> {
        self.arith_binary_op_inplace(other, ArithOp::Min)
    }

    pub fn arith_max_inplace(&mut self, other: &Voxels<T>) -> Result<()> {
        self.arith_binary_op_inplace(other, ArithOp::Max)
    }

    /// Set every voxel under the mask's "on" voxels to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the mask extent differs.
    pub fn assign_under_mask(&mut self, mask: &Mask, value: T) -> Result<()> {
        self.check_same_extent(mask.voxels())?;
        let on = mask.binary_values().on();
        for z in 0..self.extent().z() {
            let m = mask.voxels().plane_slice(z);
            for (d, &mv) in self.plane_slice_mut(z).iter_mut().zip(m) {
                if mv == on {
                    *d = value;
                }
            }
        }
        Ok(())
    }

    /// Copy voxels from `source` wherever the mask is on.
    pub fn copy_under_mask(&mut self, source: &Voxels<T>, mask: &Mask) -> Result<()> {
        self.check_same_extent(source)?;
        self.check_same_extent(mask.voxels())?;
        let on = mask.binary_values().on();
        for z in 0..self.extent().z() {
            let m = mask.voxels().plane_slice(z);
            let src = source.plane_slice(z);
            for ((d, &s), &mv) in self.plane_slice_mut(z).iter_mut().zip(src).zip(m) {
                if mv == on {
                    *d = s;
                }
            }
        }
        Ok(())
    }
}

/// Voxel-wise mean of three grids, rounded and saturated.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] unless all three extents agree.
pub fn mean_of_three<T: VoxelType>(
    a: &Voxels<T>,
    b: &Voxels<T>,
    c: &Voxels<T>,
) -> Result<Voxels<T>> {
    a.check_same_extent(b)?;
    a.check_same_extent(c)?;
    let mut out = a.clone();
    for z in 0..a.extent().z() {
        let pb = b.plane_slice(z);
        let pc = c.plane_slice(z);
        for ((d, &vb), &vc) in out.plane_slice_mut(z).iter_mut().zip(pb).zip(pc) {
            *d = T::from_f64((d.to_f64() + vb.to_f64() + vc.to_f64()) / 3.0);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryValuesByte, Extent};

    fn row<T: VoxelType>(data: &[T]) -> Voxels<T> {
        Voxels::from_slice_2d(data.len() as u32, 1, data).unwrap()
    }

    #[test]
    fn test_subtract_saturates() {
        let a = row(&[10u8, 100, 255]);
        let b = row(&[250u8, 50, 0]);
        let d = a.arith_subtract(&b).unwrap();
        assert_eq!(d.plane_slice(0), &[0, 50, 255]);
    }

    #[test]
    fn test_add_saturates_u16() {
        let a = row(&[60000u16, 1]);
        let b = row(&[10000u16, 2]);
        assert_eq!(a.arith_add(&b).unwrap().plane_slice(0), &[65535, 3]);
    }

    #[test]
    fn test_min_max_abs_diff() {
        let a = row(&[1u8, 9, 5]);
        let b = row(&[4u8, 3, 5]);
        assert_eq!(a.arith_min(&b).unwrap().plane_slice(0), &[1, 3, 5]);
        assert_eq!(a.arith_max(&b).unwrap().plane_slice(0), &[4, 9, 5]);
        assert_eq!(a.arith_abs_diff(&b).unwrap().plane_slice(0), &[3, 6, 0]);
    }

    #[test]
    fn test_binary_op_mismatch_leaves_input() {
        let mut a = row(&[1u8, 2, 3]);
        let b = row(&[1u8, 2]);
        assert!(matches!(
            a.arith_add_inplace(&b),
            Err(Error::DimensionMismatch { .. })
        ));
        assert_eq!(a.plane_slice(0), &[1, 2, 3]);
    }

    #[test]
    fn test_scalar_ops() {
        let a = row(&[0u8, 100, 200]);
        assert_eq!(a.add_constant(60.0).plane_slice(0), &[60, 160, 255]);
        assert_eq!(a.add_constant(-150.0).plane_slice(0), &[0, 0, 50]);
        assert_eq!(a.multiply_constant(1.5).unwrap().plane_slice(0), &[0, 150, 255]);
        assert!(a.multiply_constant(-1.0).is_err());
        assert_eq!(a.subtract_from_constant(150.0).plane_slice(0), &[150, 50, 0]);
        assert_eq!(a.max_with_constant(50.0).plane_slice(0), &[50, 100, 200]);
        assert_eq!(a.min_with_constant(150.0).plane_slice(0), &[0, 100, 150]);
    }

    #[test]
    fn test_invert() {
        let a = row(&[0u8, 55, 255]);
        assert_eq!(a.invert().unwrap().plane_slice(0), &[255, 200, 0]);
        let w = row(&[0u16, 65535]);
        assert_eq!(w.invert().unwrap().plane_slice(0), &[65535, 0]);
        let f = row(&[1.0f32]);
        assert!(matches!(f.invert(), Err(Error::UnsupportedVoxelKind(_))));
    }

    #[test]
    fn test_z_score() {
        let a = row(&[10u8, 20, 30]);
        let hist = Histogram::from_voxels(&a);
        // mean 20, population stddev sqrt(200/3)
        let z = a.z_score(&hist, 10.0);
        let sd = (200.0f64 / 3.0).sqrt();
        assert_eq!(z.get(0, 0, 0), 0);
        assert_eq!(z.get(1, 0, 0), 0);
        assert_eq!(z.get(2, 0, 0), u8::from_f64(10.0 / sd * 10.0));

        let flat = row(&[7u8, 7]);
        let zf = flat.z_score(&Histogram::from_voxels(&flat), 1.0);
        assert_eq!(zf.plane_slice(0), &[0, 0]);
    }

    #[test]
    fn test_mean_of_three() {
        let a = row(&[0u8, 255]);
        let b = row(&[3u8, 255]);
        let c = row(&[4u8, 254]);
        let m = mean_of_three(&a, &b, &c).unwrap();
        assert_eq!(m.plane_slice(0), &[2, 255]);
    }

    #[test]
    fn test_masked_assignment() {
        let e = Extent::new(3, 1, 1).unwrap();
        let mask = Mask::from_fn(e, BinaryValuesByte::default(), |x, _, _| x != 1);
        let mut v = row(&[1u8, 2, 3]);
        v.assign_under_mask(&mask, 9).unwrap();
        assert_eq!(v.plane_slice(0), &[9, 2, 9]);

        let src = row(&[7u8, 8, 9]);
        let mut t = row(&[0u8, 0, 0]);
        t.copy_under_mask(&src, &mask.invert_interpretation()).unwrap();
        assert_eq!(t.plane_slice(0), &[0, 8, 0]);
    }
}
