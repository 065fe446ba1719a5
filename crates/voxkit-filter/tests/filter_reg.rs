//! Spatial filter regression test
//!
//! Tests the mean, median and gradient filters:
//!   (1) Mean and median leave a uniform grid unchanged
//!   (2) Rolling median matches a direct sort of every window
//!   (3) Masked mean only writes under the output mask
//!   (4) Gradient of a horizontal ramp is flat in x and zero in y
//!
//! Run with:
//! ```
//! cargo test -p voxkit-filter --test filter_reg
//! ```

use rand::prelude::*;
use voxkit_core::{Extent, Point3, Voxels};
use voxkit_filter::{GradientAxis, gradient, gradient_u16, mean_filter_2d, median_filter_2d};
use voxkit_test::{RegParams, fixtures};

fn brute_median(v: &Voxels<u8>, x: u32, y: u32, z: u32, k: u32) -> u8 {
    let e = v.extent();
    let mut window = Vec::new();
    for yy in y.saturating_sub(k)..=(y + k).min(e.y() - 1) {
        for xx in x.saturating_sub(k)..=(x + k).min(e.x() - 1) {
            window.push(v.get(xx, yy, z));
        }
    }
    window.sort_unstable();
    window[(window.len() - 1) / 2]
}

#[test]
fn filter_reg_uniform() {
    let mut rp = RegParams::new("filter_uniform");

    let flat = fixtures::uniform(12, 9, 3, 77).unwrap();
    for r in [0, 1, 4] {
        rp.compare_voxels(&flat, &mean_filter_2d(&flat, r, None, None).unwrap());
        rp.compare_voxels(&flat, &median_filter_2d(&flat, r).unwrap());
    }

    assert!(rp.cleanup(), "filter_uniform regression test failed");
}

#[test]
fn filter_reg_median_random() {
    let mut rp = RegParams::new("filter_median_random");
    let mut rng = StdRng::seed_from_u64(42);
    let extent = Extent::new(15, 11, 2).unwrap();
    let noisy = Voxels::from_fn(extent, |_, _, _| rng.random_range(0..=255u8));

    for k in [1, 2, 3] {
        let filtered = median_filter_2d(&noisy, k).unwrap();
        let expected = Voxels::from_fn(extent, |x, y, z| brute_median(&noisy, x, y, z, k));
        rp.compare_voxels(&expected, &filtered);
    }

    assert!(rp.cleanup(), "filter_median_random regression test failed");
}

#[test]
fn filter_reg_masked_mean() {
    let mut rp = RegParams::new("filter_masked_mean");
    let mut rng = StdRng::seed_from_u64(3);
    let extent = Extent::new(10, 10, 1).unwrap();
    let noisy = Voxels::from_fn(extent, |_, _, _| rng.random_range(0..=255u8));
    let output = fixtures::box_mask(extent, Point3::new(3, 3, 0), Point3::new(6, 6, 0));

    let filtered = mean_filter_2d(&noisy, 2, None, Some(&output)).unwrap();
    let unmasked = mean_filter_2d(&noisy, 2, None, None).unwrap();

    let mut changed_outside = 0;
    let mut wrong_inside = 0;
    for y in 0..10 {
        for x in 0..10 {
            if output.is_on(x, y, 0) {
                if filtered.get(x, y, 0) != unmasked.get(x, y, 0) {
                    wrong_inside += 1;
                }
            } else if filtered.get(x, y, 0) != noisy.get(x, y, 0) {
                changed_outside += 1;
            }
        }
    }
    rp.compare_values(0.0, changed_outside as f64, 0.0);
    rp.compare_values(0.0, wrong_inside as f64, 0.0);

    assert!(rp.cleanup(), "filter_masked_mean regression test failed");
}

#[test]
fn filter_reg_gradient_ramp() {
    let mut rp = RegParams::new("filter_gradient_ramp");

    // 0, 5, 10, ... 255 along x
    let ramp = fixtures::ramp_x(52, 6, 2).unwrap();
    let gx = gradient(&ramp, GradientAxis::X, 1.0).unwrap();
    let gy = gradient(&ramp, GradientAxis::Y, 1.0).unwrap();
    let gm = gradient(&ramp, GradientAxis::Magnitude3d, 1.0).unwrap();

    rp.compare_voxels(&Voxels::filled(ramp.extent(), 5.0f32), &gx);
    rp.compare_voxels(&Voxels::filled(ramp.extent(), 0.0f32), &gy);
    rp.compare_voxels_within(&gx, &gm, 1e-4);

    let signed = gradient_u16(&ramp, GradientAxis::X, -1.0, 100.0).unwrap();
    rp.compare_voxels(&Voxels::filled(ramp.extent(), 95u16), &signed);

    assert!(rp.cleanup(), "filter_gradient_ramp regression test failed");
}
