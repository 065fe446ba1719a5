//! Global thresholding

use crate::{LevelCalculator, ThresholdResult};
use voxkit_core::{BinaryValuesByte, Histogram, IntegerVoxel, Mask, VoxelType, Voxels};

/// Binarize a grid at a fixed level.
///
/// Voxels with value `>= level` become on.
pub fn threshold<T: VoxelType>(voxels: &Voxels<T>, level: u32, bv: BinaryValuesByte) -> Mask {
    let level = level as f64;
    Mask::from_fn(voxels.extent(), bv, |x, y, z| voxels.get(x, y, z).to_f64() >= level)
}

/// Binarize a grid at a level computed from its own histogram.
///
/// With `restrict_to`, only voxels under the mask contribute to the
/// histogram, and voxels outside it are off in the result.
///
/// # Errors
///
/// Returns a dimension mismatch if `restrict_to` has a different extent,
/// or the calculator's error.
pub fn threshold_auto<T: IntegerVoxel>(
    voxels: &Voxels<T>,
    calculator: &dyn LevelCalculator,
    restrict_to: Option<&Mask>,
    bv: BinaryValuesByte,
) -> ThresholdResult<Mask> {
    let histogram = match restrict_to {
        Some(mask) => Histogram::from_voxels_masked(voxels, mask)?,
        None => Histogram::from_voxels(voxels),
    };
    let level = calculator.calculate_level(&histogram)?;
    log::debug!(
        "threshold auto: extent={} level={level} restricted={}",
        voxels.extent(),
        restrict_to.is_some()
    );

    let mut mask = threshold(voxels, level, bv);
    if let Some(restrict) = restrict_to {
        let e = voxels.extent();
        for z in 0..e.z() {
            for y in 0..e.y() {
                for x in 0..e.x() {
                    if !restrict.is_on(x, y, z) {
                        mask.set(x, y, z, false);
                    }
                }
            }
        }
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantLevel, MeanLevel};
    use voxkit_core::Extent;

    #[test]
    fn test_threshold_inclusive() {
        let v = Voxels::from_slice_2d(4, 1, &[9u8, 10, 11, 0]).unwrap();
        let m = threshold(&v, 10, BinaryValuesByte::default());
        assert_eq!(m.voxels().plane_slice(0), &[0, 255, 255, 0]);
    }

    #[test]
    fn test_threshold_custom_encoding() {
        let v = Voxels::from_slice_2d(2, 1, &[100u16, 5000]).unwrap();
        let bv = BinaryValuesByte::new(1, 0).unwrap();
        let m = threshold(&v, 1000, bv);
        assert_eq!(m.voxels().plane_slice(0), &[0, 1]);
    }

    #[test]
    fn test_auto_with_restriction() {
        let v = Voxels::from_slice_2d(4, 1, &[10u8, 30, 200, 250]).unwrap();
        let e = v.extent();
        let restrict = Mask::from_fn(e, BinaryValuesByte::default(), |x, _, _| x < 2);
        let m = threshold_auto(&v, &MeanLevel, Some(&restrict), BinaryValuesByte::default())
            .unwrap();
        // Level is 20 from the first two voxels; the bright pair is outside
        assert_eq!(m.voxels().plane_slice(0), &[0, 255, 0, 0]);
    }

    #[test]
    fn test_auto_extent_mismatch() {
        let v: Voxels<u8> = Voxels::new(Extent::new(3, 3, 1).unwrap());
        let restrict = Mask::new(Extent::new(3, 3, 2).unwrap());
        let bv = BinaryValuesByte::default();
        assert!(threshold_auto(&v, &ConstantLevel(1), Some(&restrict), bv).is_err());
    }
}
