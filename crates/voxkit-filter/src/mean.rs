//! Rolling mean filter
//!
//! Keeps one running sum per column, covering the rows of the current
//! window. Moving down a row subtracts the row that leaves the window and
//! adds the row that enters it; moving along x subtracts the trailing
//! column sum and adds the leading one. Each output voxel therefore costs
//! O(1) after the first window of its row.

use crate::FilterResult;
use voxkit_core::{Extent, IntegerVoxel, Mask, Voxels};

/// One plane of a mask, for per-voxel membership tests
#[derive(Clone, Copy)]
struct PlaneMask<'a> {
    data: &'a [u8],
    on: u8,
}

impl<'a> PlaneMask<'a> {
    fn of(mask: Option<&'a Mask>, z: u32) -> Option<Self> {
        mask.map(|m| Self {
            data: m.voxels().plane_slice(z),
            on: m.binary_values().on(),
        })
    }

    #[inline]
    fn is_on(&self, offset: usize) -> bool {
        self.data[offset] == self.on
    }
}

/// Per-column running sums over the rows of the window
struct ColumnSums {
    sum: Vec<u64>,
    count: Vec<u64>,
}

impl ColumnSums {
    fn new(width: usize) -> Self {
        Self {
            sum: vec![0; width],
            count: vec![0; width],
        }
    }

    fn add_row<T: IntegerVoxel>(&mut self, src: &[T], input: Option<PlaneMask<'_>>, row: usize) {
        let width = self.sum.len();
        for x in 0..width {
            let i = row * width + x;
            if input.is_none_or(|m| m.is_on(i)) {
                self.sum[x] += src[i].to_index() as u64;
                self.count[x] += 1;
            }
        }
    }

    fn remove_row<T: IntegerVoxel>(
        &mut self,
        src: &[T],
        input: Option<PlaneMask<'_>>,
        row: usize,
    ) {
        let width = self.sum.len();
        for x in 0..width {
            let i = row * width + x;
            if input.is_none_or(|m| m.is_on(i)) {
                self.sum[x] -= src[i].to_index() as u64;
                self.count[x] -= 1;
            }
        }
    }
}

/// Mean of `count` values summing to `sum`, rounded half up; 0 when empty
#[inline]
fn rounded_mean(sum: u64, count: u64) -> usize {
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)) as usize
}

fn filter_plane<T: IntegerVoxel>(
    src: &[T],
    dst: &mut [T],
    extent: Extent,
    radius: usize,
    input: Option<PlaneMask<'_>>,
    output: Option<PlaneMask<'_>>,
) {
    let w = extent.x() as usize;
    let h = extent.y() as usize;
    let mut cols = ColumnSums::new(w);

    for row in 0..=radius.min(h - 1) {
        cols.add_row(src, input, row);
    }

    for y in 0..h {
        if y > 0 {
            if y > radius {
                cols.remove_row(src, input, y - radius - 1);
            }
            if y + radius < h {
                cols.add_row(src, input, y + radius);
            }
        }

        let mut sum = 0u64;
        let mut count = 0u64;
        for x in 0..=radius.min(w - 1) {
            sum += cols.sum[x];
            count += cols.count[x];
        }

        for x in 0..w {
            if x > 0 {
                if x > radius {
                    sum -= cols.sum[x - radius - 1];
                    count -= cols.count[x - radius - 1];
                }
                if x + radius < w {
                    sum += cols.sum[x + radius];
                    count += cols.count[x + radius];
                }
            }

            let i = y * w + x;
            if output.is_none_or(|m| m.is_on(i)) {
                dst[i] = T::from_index(rounded_mean(sum, count));
            }
        }
    }
}

/// Mean filter over a square window, applied to each z-plane.
///
/// The window has side `2 * radius + 1` and is clipped at the image
/// border, so edge voxels average over fewer samples.
///
/// # Arguments
///
/// * `voxels` - Input grid
/// * `radius` - Half-width of the window; 0 copies the input
/// * `input_mask` - Only voxels under this mask contribute to a window
/// * `output_mask` - Only voxels under this mask are written; all others
///   keep their input value
///
/// A window with no contributing voxels yields 0. Means round half up.
///
/// # Errors
///
/// Returns a dimension mismatch if a mask extent differs from `voxels`.
pub fn mean_filter_2d<T: IntegerVoxel>(
    voxels: &Voxels<T>,
    radius: u32,
    input_mask: Option<&Mask>,
    output_mask: Option<&Mask>,
) -> FilterResult<Voxels<T>> {
    for mask in [input_mask, output_mask].into_iter().flatten() {
        voxels.check_same_extent(mask.voxels())?;
    }
    let extent = voxels.extent();
    log::debug!(
        "mean filter: extent={extent} radius={radius} input_mask={} output_mask={}",
        input_mask.is_some(),
        output_mask.is_some()
    );

    let mut out = voxels.clone();
    for z in 0..extent.z() {
        filter_plane(
            voxels.plane_slice(z),
            out.plane_slice_mut(z),
            extent,
            radius as usize,
            PlaneMask::of(input_mask, z),
            PlaneMask::of(output_mask, z),
        );
    }
    Ok(out)
}
