//! Regression test parameters and operations

use crate::error::TestError;
use voxkit_core::{Mask, VoxelType, Voxels};

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index and success status.
pub struct RegParams {
    /// Name of the test (e.g., "dilate")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "dilate")
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    fn fail(&mut self, err: TestError) {
        let msg = format!("Failure in {}_reg: {}", self.test_name, err);
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            });
            false
        } else {
            true
        }
    }

    /// Compare two voxel grids for exact equality
    ///
    /// Reports the first differing voxel.
    pub fn compare_voxels<T: VoxelType>(
        &mut self,
        expected: &Voxels<T>,
        actual: &Voxels<T>,
    ) -> bool {
        self.compare_voxels_within(expected, actual, 0.0)
    }

    /// Compare two voxel grids, allowing each voxel to differ by `delta`
    pub fn compare_voxels_within<T: VoxelType>(
        &mut self,
        expected: &Voxels<T>,
        actual: &Voxels<T>,
        delta: f64,
    ) -> bool {
        self.index += 1;

        if expected.extent() != actual.extent() {
            self.fail(TestError::ExtentMismatch {
                index: self.index,
                expected: expected.extent(),
                actual: actual.extent(),
            });
            return false;
        }

        let e = expected.extent();
        for z in 0..e.z() {
            for y in 0..e.y() {
                for x in 0..e.x() {
                    let a = expected.get(x, y, z).to_f64();
                    let b = actual.get(x, y, z).to_f64();
                    if (a - b).abs() > delta {
                        self.fail(TestError::VoxelMismatch {
                            index: self.index,
                            x,
                            y,
                            z,
                            expected: a,
                            actual: b,
                        });
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Compare two masks by their on/off state.
    ///
    /// Masks with different encodings compare equal when the same voxels
    /// are on.
    pub fn compare_masks(&mut self, expected: &Mask, actual: &Mask) -> bool {
        self.index += 1;

        if expected.extent() != actual.extent() {
            self.fail(TestError::ExtentMismatch {
                index: self.index,
                expected: expected.extent(),
                actual: actual.extent(),
            });
            return false;
        }

        let e = expected.extent();
        for z in 0..e.z() {
            for y in 0..e.y() {
                for x in 0..e.x() {
                    let a = expected.is_on(x, y, z);
                    let b = actual.is_on(x, y, z);
                    if a != b {
                        self.fail(TestError::VoxelMismatch {
                            index: self.index,
                            x,
                            y,
                            z,
                            expected: a as u8 as f64,
                            actual: b as u8 as f64,
                        });
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxkit_core::{BinaryValuesByte, Extent};

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_voxels_reports_mismatch() {
        let a = Voxels::from_slice_2d(3, 1, &[1u8, 2, 3]).unwrap();
        let b = Voxels::from_slice_2d(3, 1, &[1u8, 2, 4]).unwrap();
        let mut rp = RegParams::new("test");
        assert!(rp.compare_voxels(&a, &a));
        assert!(rp.compare_voxels_within(&a, &b, 1.0));
        assert!(!rp.compare_voxels(&a, &b));
        assert_eq!(rp.index(), 3);
        assert!(rp.failures()[0].contains("(2, 0, 0)"));
    }

    #[test]
    fn test_compare_masks_ignores_encoding() {
        let e = Extent::new(4, 1, 1).unwrap();
        let a = Mask::from_fn(e, BinaryValuesByte::default(), |x, _, _| x < 2);
        let bv = BinaryValuesByte::new(1, 0).unwrap();
        let b = Mask::from_fn(e, bv, |x, _, _| x < 2);
        let mut rp = RegParams::new("test");
        assert!(rp.compare_masks(&a, &b));
        assert!(!rp.compare_masks(&a, &b.invert_interpretation()));
        assert!(!rp.cleanup());
    }
}
