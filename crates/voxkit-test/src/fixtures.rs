//! Synthetic inputs for regression tests
//!
//! Every fixture is generated in memory and is fully deterministic.

use crate::error::TestResult;
use voxkit_core::{
    BinaryValuesByte, BoundingBox, Extent, Mask, ObjectCollection, ObjectMask, Point3, Voxels,
};

/// Grid of constant value
pub fn uniform(x: u32, y: u32, z: u32, value: u8) -> TestResult<Voxels<u8>> {
    Ok(Voxels::filled(Extent::new(x, y, z)?, value))
}

/// Horizontal ramp from 0 at x = 0 to 255 at the last column
pub fn ramp_x(x: u32, y: u32, z: u32) -> TestResult<Voxels<u8>> {
    let extent = Extent::new(x, y, z)?;
    let span = (x.max(2) - 1) as f64;
    Ok(Voxels::from_fn(extent, |vx, _, _| {
        (vx as f64 * 255.0 / span).round() as u8
    }))
}

/// Mask with a single on voxel
pub fn single_voxel_mask(extent: Extent, p: Point3) -> Mask {
    Mask::from_fn(extent, BinaryValuesByte::default(), |x, y, z| {
        Point3::new(x as i32, y as i32, z as i32) == p
    })
}

/// Mask whose on voxels fill the inclusive box `lo..=hi`
pub fn box_mask(extent: Extent, lo: Point3, hi: Point3) -> Mask {
    Mask::from_fn(extent, BinaryValuesByte::default(), |x, y, z| {
        let (x, y, z) = (x as i32, y as i32, z as i32);
        (lo.x..=hi.x).contains(&x) && (lo.y..=hi.y).contains(&y) && (lo.z..=hi.z).contains(&z)
    })
}

/// Solid rectangular object covering the inclusive box `lo..=hi`
pub fn box_object(lo: Point3, hi: Point3) -> TestResult<ObjectMask> {
    let bbox = BoundingBox::from_corners(lo, hi)?;
    let mut object = ObjectMask::new(bbox);
    for p in bbox.points() {
        object.set_global(p, true)?;
    }
    Ok(object)
}

/// A 20x10x1 scene with two 8x8 square objects.
///
/// The left object has mean intensity 50 (a checkerboard of 40 and 60),
/// the right one mean 200 (190 and 210). The background is 0.
pub fn two_regions() -> TestResult<(Voxels<u8>, ObjectCollection)> {
    let extent = Extent::new(20, 10, 1)?;
    let left = box_object(Point3::new(1, 1, 0), Point3::new(8, 8, 0))?;
    let right = box_object(Point3::new(11, 1, 0), Point3::new(18, 8, 0))?;
    let voxels = Voxels::from_fn(extent, |x, y, _| {
        let p = Point3::new(x as i32, y as i32, 0);
        let wobble = if (x + y) % 2 == 0 { -10 } else { 10 };
        if left.contains_global(p) {
            (50 + wobble) as u8
        } else if right.contains_global(p) {
            (200 + wobble) as u8
        } else {
            0
        }
    });
    Ok((voxels, [left, right].into_iter().collect()))
}
