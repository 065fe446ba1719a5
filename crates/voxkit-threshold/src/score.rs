//! Per-object confidence scores
//!
//! Each object voxel is scored by how far its intensity lies from the
//! object's level, measured in units of `tolerance`:
//!
//! ```text
//! score = clamp(round(128 + 128 * (v - level) / tolerance), 0, 255)
//! ```
//!
//! A voxel exactly at the level scores 128, one a full tolerance above it
//! scores 255 (saturated).

use crate::per_object::{for_each_first_owner, levels_for_objects};
use crate::{LevelCalculator, ThresholdResult};
use voxkit_core::{IntegerVoxel, ObjectCollection, Voxels};

#[inline]
fn score(value: usize, level: u32, tolerance: u32) -> u8 {
    if tolerance == 0 {
        return if value >= level as usize { 255 } else { 0 };
    }
    let delta = value as f64 - level as f64;
    (128.0 + 128.0 * delta / tolerance as f64).round().clamp(0.0, 255.0) as u8
}

/// Score every object voxel against its object's level.
///
/// Levels come from each object's histogram after `num_dilations`
/// dilations within its z-plane. Voxels outside every object score 0, and
/// the first object wins where objects overlap. A `tolerance` of 0 turns
/// the score into a step: 255 at or above the level, 0 below.
pub fn connected_component_score<T: IntegerVoxel>(
    intensity: &Voxels<T>,
    objects: &ObjectCollection,
    calculator: &dyn LevelCalculator,
    tolerance: u32,
    num_dilations: u32,
) -> ThresholdResult<Voxels<u8>> {
    if tolerance == 0 {
        log::warn!("component score with zero tolerance, scoring as a step");
    }
    log::debug!(
        "component score: {} objects, tolerance={tolerance} num_dilations={num_dilations}",
        objects.len()
    );
    let levels = levels_for_objects(intensity, objects, calculator, num_dilations, false)?;

    let mut scores = Voxels::new(intensity.extent());
    for_each_first_owner(objects, intensity.extent(), |i, x, y, z| {
        let v = intensity.get(x, y, z).to_index();
        scores.set(x, y, z, score(v, levels[i], tolerance));
    });
    Ok(scores)
}
