//! Per-object levels
//!
//! Each object gets its own level, computed from the histogram of the
//! intensity under the object (optionally grown by a few dilations so the
//! surrounding background takes part). Results are painted at exactly the
//! object's own voxels. Where objects overlap the first object in the
//! collection wins.

use crate::{LevelCalculator, ThresholdResult};
use voxkit_core::{
    BinaryValuesByte, Extent, Histogram, IntegerVoxel, Mask, ObjectCollection, Voxels,
};
use voxkit_morph::dilate_object;
use voxkit_region::{Connectivity, find_connected_components};

/// Level of each object, in collection order.
///
/// All levels are computed before anything is written, so a failure
/// leaves every output untouched.
pub(crate) fn levels_for_objects<T: IntegerVoxel>(
    intensity: &Voxels<T>,
    objects: &ObjectCollection,
    calculator: &dyn LevelCalculator,
    num_dilations: u32,
    do_3d: bool,
) -> ThresholdResult<Vec<u32>> {
    let extent = intensity.extent();
    let mut levels = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        object.bbox().check_within(extent)?;
        let grown = dilate_object(object, num_dilations, do_3d, false, extent)?;
        let histogram = Histogram::from_object(intensity, &grown)?;
        let level = calculator.calculate_level(&histogram)?;
        log::debug!(
            "object {i}: {} voxels, histogram of {}, level {level}",
            object.count(),
            histogram.total_count()
        );
        levels.push(level);
    }
    Ok(levels)
}

/// Visit every object voxel once, first object first.
///
/// `visit` receives the object index and the voxel coordinate.
pub(crate) fn for_each_first_owner(
    objects: &ObjectCollection,
    scene: Extent,
    mut visit: impl FnMut(usize, u32, u32, u32),
) {
    let mut claimed = Mask::new(scene);
    for (i, object) in objects.iter().enumerate() {
        for p in object.iter_global() {
            let (x, y, z) = (p.x as u32, p.y as u32, p.z as u32);
            if !claimed.is_on(x, y, z) {
                claimed.set(x, y, z, true);
                visit(i, x, y, z);
            }
        }
    }
}

/// Write each object's level at the object's voxels.
///
/// Voxels outside every object keep their value in `output`.
///
/// # Arguments
///
/// * `intensity` - Grid the histograms are taken from
/// * `objects` - Objects to compute levels for
/// * `calculator` - Level strategy
/// * `num_dilations` - Grow each object this many times before taking its
///   histogram; 0 uses the object as is
/// * `do_3d` - Grow in 3D rather than plane by plane
/// * `output` - Grid receiving the levels; must match `intensity`
///
/// Returns the level of each object in collection order.
pub fn paint_level_per_object<T: IntegerVoxel>(
    intensity: &Voxels<T>,
    objects: &ObjectCollection,
    calculator: &dyn LevelCalculator,
    num_dilations: u32,
    do_3d: bool,
    output: &mut Voxels<T>,
) -> ThresholdResult<Vec<u32>> {
    intensity.check_same_extent(output)?;
    log::debug!(
        "level per object: {} objects, num_dilations={num_dilations} do_3d={do_3d}",
        objects.len()
    );
    let levels = levels_for_objects(intensity, objects, calculator, num_dilations, do_3d)?;

    for_each_first_owner(objects, intensity.extent(), |i, x, y, z| {
        output.set(x, y, z, T::from_index(levels[i] as usize))
    });
    Ok(levels)
}

/// Like [`paint_level_per_object`], into a fresh zeroed grid
pub fn level_per_object<T: IntegerVoxel>(
    intensity: &Voxels<T>,
    objects: &ObjectCollection,
    calculator: &dyn LevelCalculator,
    num_dilations: u32,
    do_3d: bool,
) -> ThresholdResult<Voxels<T>> {
    let mut output = Voxels::new(intensity.extent());
    paint_level_per_object(intensity, objects, calculator, num_dilations, do_3d, &mut output)?;
    Ok(output)
}

/// Binarize each object at its own level.
///
/// A voxel is on when it belongs to an object and its intensity is at or
/// above that object's level. Everything outside the objects is off.
pub fn threshold_per_object<T: IntegerVoxel>(
    intensity: &Voxels<T>,
    objects: &ObjectCollection,
    calculator: &dyn LevelCalculator,
    num_dilations: u32,
    do_3d: bool,
    bv: BinaryValuesByte,
) -> ThresholdResult<Mask> {
    let levels = levels_for_objects(intensity, objects, calculator, num_dilations, do_3d)?;
    let mut mask = Mask::new_with(intensity.extent(), bv);
    for_each_first_owner(objects, intensity.extent(), |i, x, y, z| {
        let on = intensity.get(x, y, z).to_index() >= levels[i] as usize;
        mask.set(x, y, z, on);
    });
    Ok(mask)
}

/// Split a mask into connected components, then binarize each at its own
/// level.
pub fn threshold_per_component<T: IntegerVoxel>(
    intensity: &Voxels<T>,
    mask: &Mask,
    connectivity: Connectivity,
    calculator: &dyn LevelCalculator,
    num_dilations: u32,
    do_3d: bool,
) -> ThresholdResult<Mask> {
    intensity.check_same_extent(mask.voxels())?;
    let objects = find_connected_components(mask, connectivity, do_3d, 1)?;
    threshold_per_object(
        intensity,
        &objects,
        calculator,
        num_dilations,
        do_3d,
        mask.binary_values(),
    )
}
