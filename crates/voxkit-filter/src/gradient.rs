//! Gradient filters
//!
//! Derivatives are central differences, `(v[i+1] - v[i-1]) / 2`, falling
//! back to a one-sided difference on the first and last voxel of an axis.
//! An axis with a single voxel has derivative 0.

use crate::{FilterError, FilterResult};
use voxkit_core::{VoxelType, Voxels};

/// Which derivative a gradient filter computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientAxis {
    /// Derivative along x
    X,
    /// Derivative along y
    Y,
    /// Derivative along z
    Z,
    /// Magnitude of the (x, y) gradient
    Magnitude2d,
    /// Magnitude of the (x, y, z) gradient
    Magnitude3d,
}

#[inline]
fn difference(len: u32, pos: u32, sample: impl Fn(u32) -> f64) -> f64 {
    if len == 1 {
        0.0
    } else if pos == 0 {
        sample(1) - sample(0)
    } else if pos == len - 1 {
        sample(pos) - sample(pos - 1)
    } else {
        (sample(pos + 1) - sample(pos - 1)) / 2.0
    }
}

/// Signed derivative at (x, y, z); magnitudes are never negative
fn signed_at<T: VoxelType>(
    voxels: &Voxels<T>,
    axis: GradientAxis,
    x: u32,
    y: u32,
    z: u32,
) -> f64 {
    let e = voxels.extent();
    let dx = || difference(e.x(), x, |i| voxels.get(i, y, z).to_f64());
    let dy = || difference(e.y(), y, |i| voxels.get(x, i, z).to_f64());
    let dz = || difference(e.z(), z, |i| voxels.get(x, y, i).to_f64());
    match axis {
        GradientAxis::X => dx(),
        GradientAxis::Y => dy(),
        GradientAxis::Z => dz(),
        GradientAxis::Magnitude2d => dx().hypot(dy()),
        GradientAxis::Magnitude3d => {
            let (gx, gy, gz) = (dx(), dy(), dz());
            (gx * gx + gy * gy + gz * gz).sqrt()
        }
    }
}

fn check_finite(name: &str, value: f64) -> FilterResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FilterError::Misconfigured(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

/// Gradient as non-negative floating point values.
///
/// Single axes store the absolute derivative, scaled by `scale`.
///
/// # Errors
///
/// Returns [`FilterError::Misconfigured`] if `scale` is NaN or infinite.
///
/// # Example
///
/// ```
/// use voxkit_core::{Extent, Voxels};
/// use voxkit_filter::{GradientAxis, gradient};
///
/// let ramp = Voxels::from_fn(Extent::new(5, 3, 1).unwrap(), |x, _, _| (x * 10) as u8);
/// let g = gradient(&ramp, GradientAxis::X, 1.0).unwrap();
/// assert_eq!(g.get(2, 1, 0), 10.0);
/// ```
pub fn gradient<T: VoxelType>(
    voxels: &Voxels<T>,
    axis: GradientAxis,
    scale: f64,
) -> FilterResult<Voxels<f32>> {
    check_finite("scale", scale)?;
    log::debug!("gradient: extent={} axis={axis:?} scale={scale}", voxels.extent());

    Ok(Voxels::from_fn(voxels.extent(), |x, y, z| {
        (signed_at(voxels, axis, x, y, z) * scale).abs() as f32
    }))
}

/// Gradient stored as `signed * scale + offset`, saturated into u16.
///
/// Keeping the sign means an offset near the middle of the range
/// (32768) preserves both falling and rising edges.
pub fn gradient_u16<T: VoxelType>(
    voxels: &Voxels<T>,
    axis: GradientAxis,
    scale: f64,
    offset: f64,
) -> FilterResult<Voxels<u16>> {
    check_finite("scale", scale)?;
    check_finite("offset", offset)?;
    log::debug!(
        "gradient_u16: extent={} axis={axis:?} scale={scale} offset={offset}",
        voxels.extent()
    );

    Ok(Voxels::from_fn(voxels.extent(), |x, y, z| {
        u16::from_f64(signed_at(voxels, axis, x, y, z) * scale + offset)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxkit_core::Extent;

    fn plane(w: u32, h: u32, f: impl Fn(u32, u32) -> u8) -> Voxels<u8> {
        Voxels::from_fn(Extent::new(w, h, 1).unwrap(), |x, y, _| f(x, y))
    }

    #[test]
    fn test_ramp_constant_derivative() {
        let v = plane(6, 4, |x, _| (x * 10) as u8);
        let gx = gradient(&v, GradientAxis::X, 1.0).unwrap();
        assert!(gx.iter().all(|g| g == 10.0));
        let gy = gradient(&v, GradientAxis::Y, 1.0).unwrap();
        assert!(gy.iter().all(|g| g == 0.0));
    }

    #[test]
    fn test_single_voxel_axis_is_zero() {
        let v = plane(4, 4, |x, y| (x * 7 + y * 3) as u8);
        let gz = gradient(&v, GradientAxis::Z, 5.0).unwrap();
        assert!(gz.iter().all(|g| g == 0.0));
    }

    #[test]
    fn test_magnitude_2d() {
        let v = plane(5, 5, |x, y| (3 * x + 4 * y) as u8);
        let g = gradient(&v, GradientAxis::Magnitude2d, 2.0).unwrap();
        assert!(g.iter().all(|m| (m - 10.0).abs() < 1e-5));
    }

    #[test]
    fn test_magnitude_3d() {
        let e = Extent::new(3, 3, 3).unwrap();
        let v = Voxels::from_fn(e, |x, y, z| (2 * x + 3 * y + 6 * z) as u8);
        let g = gradient(&v, GradientAxis::Magnitude3d, 1.0).unwrap();
        assert!((g.get(1, 1, 1) - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_falling_edge_absolute() {
        let v = plane(4, 1, |x, _| 200 - (x * 20) as u8);
        let g = gradient(&v, GradientAxis::X, 1.0).unwrap();
        assert_eq!(g.get(1, 0, 0), 20.0);
    }

    #[test]
    fn test_u16_keeps_sign() {
        let falling = plane(4, 1, |x, _| 200 - (x * 20) as u8);
        let g = gradient_u16(&falling, GradientAxis::X, 1.0, 32768.0).unwrap();
        assert_eq!(g.get(2, 0, 0), 32748);

        let rising = plane(4, 1, |x, _| (x * 20) as u8);
        let g = gradient_u16(&rising, GradientAxis::X, 2.0, 32768.0).unwrap();
        assert_eq!(g.get(2, 0, 0), 32808);
    }

    #[test]
    fn test_u16_saturates() {
        let falling = plane(3, 1, |x, _| 250 - (x * 100) as u8);
        let g = gradient_u16(&falling, GradientAxis::X, 1.0, 0.0).unwrap();
        assert!(g.iter().all(|v| v == 0));
        let g = gradient_u16(&falling, GradientAxis::X, -1000.0, 0.0).unwrap();
        assert!(g.iter().all(|v| v == u16::MAX));
    }

    #[test]
    fn test_non_finite_scale() {
        let v = plane(2, 2, |_, _| 0);
        assert!(matches!(
            gradient(&v, GradientAxis::X, f64::NAN),
            Err(FilterError::Misconfigured(_))
        ));
        assert!(matches!(
            gradient_u16(&v, GradientAxis::Y, 1.0, f64::INFINITY),
            Err(FilterError::Misconfigured(_))
        ));
    }
}
