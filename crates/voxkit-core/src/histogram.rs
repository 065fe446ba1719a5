//! Histogram - voxel value counts
//!
//! One bin per representable value of an integer voxel type (256 for u8,
//! 65536 for u16). A histogram is built once per invocation from a grid,
//! optionally restricted to a mask or an object, and only queried after that.

use crate::error::Result;
use crate::{IntegerVoxel, Mask, ObjectMask, Voxels};

/// Count of voxels per value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
    total: u64,
}

impl Histogram {
    /// Create an empty histogram with `num_bins` bins (values 0..num_bins)
    pub fn new(num_bins: usize) -> Self {
        Self {
            counts: vec![0; num_bins],
            total: 0,
        }
    }

    /// Histogram over every voxel of a grid
    pub fn from_voxels<T: IntegerVoxel>(voxels: &Voxels<T>) -> Self {
        let mut hist = Self::new(T::NUM_VALUES);
        for v in voxels.iter() {
            hist.counts[v.to_index()] += 1;
        }
        hist.total = voxels.extent().volume() as u64;
        hist
    }

    /// Histogram over the voxels under a mask's on voxels
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if the extents differ.
    pub fn from_voxels_masked<T: IntegerVoxel>(voxels: &Voxels<T>, mask: &Mask) -> Result<Self> {
        voxels.check_same_extent(mask.voxels())?;
        let on = mask.binary_values().on();
        let mut hist = Self::new(T::NUM_VALUES);
        for z in 0..voxels.extent().z() {
            let m = mask.voxels().plane_slice(z);
            for (&v, &mv) in voxels.plane_slice(z).iter().zip(m) {
                if mv == on {
                    hist.add(v.to_index(), 1);
                }
            }
        }
        Ok(hist)
    }

    /// Histogram over the voxels covered by an object
    ///
    /// # Errors
    ///
    /// Returns an error if the object's box is not inside the grid.
    pub fn from_object<T: IntegerVoxel>(voxels: &Voxels<T>, object: &ObjectMask) -> Result<Self> {
        object.bbox().check_within(voxels.extent())?;
        let mut hist = Self::new(T::NUM_VALUES);
        for p in object.iter_global() {
            let v = voxels.get(p.x as u32, p.y as u32, p.z as u32);
            hist.add(v.to_index(), 1);
        }
        Ok(hist)
    }

    /// Add `count` occurrences of `value`. Values past the last bin land in it.
    pub fn add(&mut self, value: usize, count: u64) {
        let bin = value.min(self.counts.len().saturating_sub(1));
        if let Some(c) = self.counts.get_mut(bin) {
            *c += count;
            self.total += count;
        }
    }

    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Count for a single value (0 past the last bin)
    #[inline]
    pub fn count(&self, value: usize) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// Mean value; 0.0 for an empty histogram
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(v, &c)| v as f64 * c as f64)
            .sum();
        sum / self.total as f64
    }

    /// Population variance; 0.0 for an empty histogram
    pub fn variance(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(v, &c)| {
                let d = v as f64 - mean;
                d * d * c as f64
            })
            .sum();
        sum_sq / self.total as f64
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest value with a non-zero count
    pub fn min_value(&self) -> Option<u32> {
        self.counts.iter().position(|&c| c > 0).map(|v| v as u32)
    }

    /// Largest value with a non-zero count
    pub fn max_value(&self) -> Option<u32> {
        self.counts.iter().rposition(|&c| c > 0).map(|v| v as u32)
    }

    /// Value at quantile `q` in `[0, 1]`.
    ///
    /// Returns the smallest value whose cumulative count reaches
    /// `ceil(q * total)` (at least one voxel), or `None` when empty.
    pub fn quantile(&self, q: f64) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let q = q.clamp(0.0, 1.0);
        let target = ((q * self.total as f64).ceil() as u64).max(1);
        let mut cum = 0u64;
        for (v, &c) in self.counts.iter().enumerate() {
            cum += c;
            if cum >= target {
                return Some(v as u32);
            }
        }
        self.max_value()
    }

    /// Number of voxels with a value strictly greater than `value`
    pub fn count_above(&self, value: u32) -> u64 {
        self.counts.iter().skip(value as usize + 1).sum()
    }

    /// Number of voxels with a value strictly less than `value`
    pub fn count_below(&self, value: u32) -> u64 {
        self.counts.iter().take(value as usize).sum()
    }

    /// Number of distinct values present
    pub fn unique_values(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryValuesByte, Extent};

    fn hist_of(data: &[u8]) -> Histogram {
        Histogram::from_voxels(&Voxels::from_slice_2d(data.len() as u32, 1, data).unwrap())
    }

    #[test]
    fn test_basic_stats() {
        let h = hist_of(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(h.num_bins(), 256);
        assert_eq!(h.total_count(), 8);
        assert!((h.mean() - 5.0).abs() < 1e-12);
        assert!((h.std_dev() - 2.0).abs() < 1e-12);
        assert_eq!(h.min_value(), Some(2));
        assert_eq!(h.max_value(), Some(9));
        assert_eq!(h.unique_values(), 5);
    }

    #[test]
    fn test_empty_histogram() {
        let h = Histogram::new(256);
        assert!(h.is_empty());
        assert_eq!(h.mean(), 0.0);
        assert_eq!(h.std_dev(), 0.0);
        assert_eq!(h.min_value(), None);
        assert_eq!(h.quantile(0.5), None);
    }

    #[test]
    fn test_quantile_and_counts() {
        let h = hist_of(&[1, 2, 3, 4]);
        assert_eq!(h.quantile(0.0), Some(1));
        assert_eq!(h.quantile(0.5), Some(2));
        assert_eq!(h.quantile(0.51), Some(3));
        assert_eq!(h.quantile(1.0), Some(4));
        assert_eq!(h.count_above(2), 2);
        assert_eq!(h.count_below(2), 1);
        assert_eq!(h.count_above(255), 0);
    }

    #[test]
    fn test_masked() {
        let v = Voxels::from_slice_2d(4, 1, &[10u8, 20, 30, 40]).unwrap();
        let e = Extent::new(4, 1, 1).unwrap();
        let mask = Mask::from_fn(e, BinaryValuesByte::default(), |x, _, _| x >= 2);
        let h = Histogram::from_voxels_masked(&v, &mask).unwrap();
        assert_eq!(h.total_count(), 2);
        assert!((h.mean() - 35.0).abs() < 1e-12);

        let wrong = Mask::new(Extent::new(3, 1, 1).unwrap());
        assert!(Histogram::from_voxels_masked(&v, &wrong).is_err());
    }

    #[test]
    fn test_u16_bins() {
        let v = Voxels::from_slice_2d(2, 1, &[0u16, 65535]).unwrap();
        let h = Histogram::from_voxels(&v);
        assert_eq!(h.num_bins(), 65536);
        assert_eq!(h.count(65535), 1);
    }
}
