//! Binary morphological operations
//!
//! Implements dilation, erosion, opening, closing and outlines for masks.
//!
//! Each pass reads a full snapshot of the previous pass and writes a fresh
//! grid, so the result does not depend on the scan direction.

use crate::options::IntensityGate;
use crate::{DilateOptions, ErodeOptions, MorphResult, Neighborhood};
use voxkit_core::{BinaryValuesByte, Extent, Mask, ObjectMask, Point3, Voxels};

/// What a pass does to the voxel under test
#[derive(Debug, Clone, Copy)]
enum Pass {
    /// Off voxels turn on if any neighbor is on
    Dilate,
    /// On voxels turn off if any neighbor is off
    Erode { outside_on: bool },
}

/// Run one pass over `src`, returning the new grid.
fn morph_pass(
    src: &Voxels<u8>,
    bv: BinaryValuesByte,
    neighborhood: &Neighborhood,
    gate: Option<IntensityGate<'_>>,
    pass: Pass,
) -> Voxels<u8> {
    let extent = src.extent();
    let mut out = src.clone();

    for z in 0..extent.z() {
        for y in 0..extent.y() {
            for x in 0..extent.x() {
                let on = bv.is_on(src.get(x, y, z));
                // Only off voxels can grow, only on voxels can shrink
                let candidate = match pass {
                    Pass::Dilate => !on,
                    Pass::Erode { .. } => on,
                };
                if !candidate {
                    continue;
                }

                let p = Point3::new(x as i32, y as i32, z as i32);
                let hit = neighborhood
                    .offsets()
                    .iter()
                    .any(|&d| neighbor_triggers(src, bv, gate, pass, extent, p + d));
                if hit {
                    out.set(x, y, z, bv.value_for(!on));
                }
            }
        }
    }

    out
}

#[inline]
fn neighbor_triggers(
    src: &Voxels<u8>,
    bv: BinaryValuesByte,
    gate: Option<IntensityGate<'_>>,
    pass: Pass,
    extent: Extent,
    q: Point3,
) -> bool {
    if !extent.contains_point(q) {
        // Beyond the border there is nothing to grow from; erosion sees
        // either on or off there depending on the option
        return match pass {
            Pass::Dilate => false,
            Pass::Erode { outside_on } => !outside_on,
        };
    }
    let (qx, qy, qz) = (q.x as u32, q.y as u32, q.z as u32);
    if let Some(gate) = gate
        && !gate.admits(qx, qy, qz)
    {
        return false;
    }
    let neighbor_on = bv.is_on(src.get(qx, qy, qz));
    match pass {
        Pass::Dilate => neighbor_on,
        Pass::Erode { .. } => !neighbor_on,
    }
}

fn run_passes(
    mask: &Mask,
    iterations: u32,
    neighborhood: &Neighborhood,
    gate: Option<IntensityGate<'_>>,
    pass: Pass,
) -> Voxels<u8> {
    let bv = mask.binary_values();
    let mut current = morph_pass(mask.voxels(), bv, neighborhood, gate, pass);
    for i in 1..iterations {
        log::trace!("{pass:?} pass {} of {iterations}", i + 1);
        current = morph_pass(&current, bv, neighborhood, gate, pass);
    }
    current
}

/// Dilate a mask
///
/// A voxel becomes on if it is on or any neighbor was on in the previous
/// pass. Neighbors outside the image never count.
///
/// # Arguments
///
/// * `mask` - Input mask
/// * `opts` - Neighborhood, iteration count and intensity gating
///
/// # Errors
///
/// Returns [`MorphError::Misconfigured`](crate::MorphError::Misconfigured)
/// for invalid options, detected before any voxel is read.
///
/// # Example
///
/// ```
/// use voxkit_core::{Extent, Mask};
/// use voxkit_morph::{DilateOptions, dilate};
///
/// let mut mask = Mask::new(Extent::new(10, 10, 1).unwrap());
/// mask.set(5, 5, 0, true);
/// let grown = dilate(&mask, &DilateOptions::default()).unwrap();
/// assert_eq!(grown.count_on(), 5);
/// assert!(!grown.is_on(4, 4, 0));
/// ```
pub fn dilate(mask: &Mask, opts: &DilateOptions<'_>) -> MorphResult<Mask> {
    let mut out = mask.clone();
    dilate_inplace(&mut out, opts)?;
    Ok(out)
}

/// Dilate a mask, replacing its voxel grid
pub fn dilate_inplace(mask: &mut Mask, opts: &DilateOptions<'_>) -> MorphResult<()> {
    opts.validate(mask.extent())?;
    let neighborhood = opts.neighborhood();
    log::debug!(
        "dilate: extent={} neighborhood={} iterations={} gated={}",
        mask.extent(),
        neighborhood.name(),
        opts.iterations,
        opts.gate().is_some()
    );
    let result = run_passes(mask, opts.iterations, &neighborhood, opts.gate(), Pass::Dilate);
    mask.replace_voxels(result);
    Ok(())
}

/// Erode a mask
///
/// An on voxel becomes off if any neighbor was off in the previous pass.
/// Voxels beyond the border count as off unless
/// [`ErodeOptions::outside_at_threshold`] is set.
pub fn erode(mask: &Mask, opts: &ErodeOptions<'_>) -> MorphResult<Mask> {
    let mut out = mask.clone();
    erode_inplace(&mut out, opts)?;
    Ok(out)
}

/// Erode a mask, replacing its voxel grid
pub fn erode_inplace(mask: &mut Mask, opts: &ErodeOptions<'_>) -> MorphResult<()> {
    opts.validate(mask.extent())?;
    let neighborhood = opts.neighborhood();
    log::debug!(
        "erode: extent={} neighborhood={} iterations={} outside_on={}",
        mask.extent(),
        neighborhood.name(),
        opts.iterations,
        opts.outside_at_threshold
    );
    let pass = Pass::Erode {
        outside_on: opts.outside_at_threshold,
    };
    let result = run_passes(mask, opts.iterations, &neighborhood, opts.gate(), pass);
    mask.replace_voxels(result);
    Ok(())
}

/// Open a mask
///
/// Opening = erosion followed by dilation with the same neighborhood.
/// Removes small foreground specks.
pub fn open(mask: &Mask, opts: &ErodeOptions<'_>) -> MorphResult<Mask> {
    let eroded = erode(mask, opts)?;
    dilate(&eroded, &opts.to_dilate())
}

/// Close a mask
///
/// Closing = dilation followed by erosion with the same neighborhood.
/// Fills small holes and gaps.
pub fn close(mask: &Mask, opts: &ErodeOptions<'_>) -> MorphResult<Mask> {
    let dilated = dilate(mask, &opts.to_dilate())?;
    erode(&dilated, opts)
}

/// Inner outline of a mask: on voxels that erosion would switch off
pub fn outline(mask: &Mask, opts: &ErodeOptions<'_>) -> MorphResult<Mask> {
    let eroded = erode(mask, opts)?;
    let mut out = mask.clone();
    let e = mask.extent();
    for z in 0..e.z() {
        for y in 0..e.y() {
            for x in 0..e.x() {
                if eroded.is_on(x, y, z) {
                    out.set(x, y, z, false);
                }
            }
        }
    }
    Ok(out)
}

/// Grow an object by `iterations` dilation passes inside a scene.
///
/// The object's box is first grown by `iterations` voxels (along z only
/// when `do_3d`), clipped to `scene`, so the dilation is never cut short by
/// the box edge except at the scene border.
pub fn dilate_object(
    object: &ObjectMask,
    iterations: u32,
    do_3d: bool,
    big_neighborhood: bool,
    scene: Extent,
) -> MorphResult<ObjectMask> {
    if iterations == 0 {
        return Ok(object.clone());
    }
    let grown = object.grow_bbox(iterations, do_3d, scene);
    let opts = DilateOptions {
        do_3d,
        iterations,
        big_neighborhood,
        ..Default::default()
    };
    let local = dilate(&grown.as_local_mask(), &opts)?;
    Ok(ObjectMask::from_local_mask(grown.bbox(), local)?)
}
