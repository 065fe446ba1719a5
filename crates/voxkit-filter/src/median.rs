//! Rolling median filter
//!
//! The window contents are held in a [`RollingMultiset`], an ordered
//! value -> count map. Sliding the window one voxel along x removes the
//! trailing column and inserts the leading column; the median is found by
//! walking the map to the middle rank.

use crate::FilterResult;
use std::collections::BTreeMap;
use voxkit_core::{IntegerVoxel, Voxels};

/// Ordered multiset supporting insertion, removal and rank lookup.
///
/// # Example
///
/// ```
/// use voxkit_filter::RollingMultiset;
///
/// let mut set = RollingMultiset::new();
/// for v in [5u8, 1, 9, 1] {
///     set.insert(v);
/// }
/// assert_eq!(set.median(), Some(1));
/// set.remove(1);
/// assert_eq!(set.median(), Some(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RollingMultiset<T> {
    counts: BTreeMap<T, usize>,
    len: usize,
}

impl<T: Ord + Copy> RollingMultiset<T> {
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            len: 0,
        }
    }

    /// Add one occurrence of `value`
    pub fn insert(&mut self, value: T) {
        *self.counts.entry(value).or_insert(0) += 1;
        self.len += 1;
    }

    /// Remove one occurrence of `value`.
    ///
    /// Returns false if the value was not present.
    pub fn remove(&mut self, value: T) -> bool {
        match self.counts.get_mut(&value) {
            Some(c) if *c > 1 => *c -= 1,
            Some(_) => {
                self.counts.remove(&value);
            }
            None => return false,
        }
        self.len -= 1;
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value at zero-based `rank` in ascending order
    pub fn nth(&self, rank: usize) -> Option<T> {
        let mut seen = 0;
        for (&value, &count) in &self.counts {
            seen += count;
            if rank < seen {
                return Some(value);
            }
        }
        None
    }

    /// Median; for an even count, the lower of the two middle values
    pub fn median(&self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.nth((self.len - 1) / 2)
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.len = 0;
    }
}

/// Median filter over a square window, applied to each z-plane.
///
/// The window has side `2 * half_width + 1` and is clipped at the image
/// border. For an even number of samples the lower middle value is used.
///
/// # Arguments
///
/// * `voxels` - Input grid
/// * `half_width` - Half-width of the window; 0 copies the input
pub fn median_filter_2d<T: IntegerVoxel>(
    voxels: &Voxels<T>,
    half_width: u32,
) -> FilterResult<Voxels<T>> {
    let extent = voxels.extent();
    log::debug!("median filter: extent={extent} half_width={half_width}");

    let w = extent.x() as usize;
    let h = extent.y() as usize;
    let k = half_width as usize;
    let mut out = voxels.clone();
    let mut window = RollingMultiset::new();

    for z in 0..extent.z() {
        let src = voxels.plane_slice(z);
        let dst = out.plane_slice_mut(z);

        for y in 0..h {
            let rows = y.saturating_sub(k)..=(y + k).min(h - 1);
            let column = |x: usize| rows.clone().map(move |r| src[r * w + x]);

            window.clear();
            for x in 0..=k.min(w - 1) {
                column(x).for_each(|v| window.insert(v));
            }

            for x in 0..w {
                if x > 0 {
                    if x > k {
                        column(x - k - 1).for_each(|v| {
                            window.remove(v);
                        });
                    }
                    if x + k < w {
                        column(x + k).for_each(|v| window.insert(v));
                    }
                }
                if let Some(m) = window.median() {
                    dst[y * w + x] = m;
                }
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxkit_core::Extent;

    #[test]
    fn test_multiset_ranks() {
        let mut s = RollingMultiset::new();
        for v in [3u16, 3, 7, 1] {
            s.insert(v);
        }
        assert_eq!(s.len(), 4);
        assert_eq!(s.nth(0), Some(1));
        assert_eq!(s.nth(2), Some(3));
        assert_eq!(s.nth(3), Some(7));
        assert_eq!(s.nth(4), None);
        assert_eq!(s.median(), Some(3));
        assert!(s.remove(3));
        assert!(!s.remove(42));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_even_count_lower_middle() {
        let mut s = RollingMultiset::new();
        for v in [10u8, 20, 30, 40] {
            s.insert(v);
        }
        assert_eq!(s.median(), Some(20));
    }

    #[test]
    fn test_5x5_center() {
        // Values 0..25 shuffled by a fixed permutation; median is 12
        let data: Vec<u8> = (0..25u32).map(|i| ((i * 7) % 25) as u8).collect();
        let v = Voxels::from_slice_2d(5, 5, &data).unwrap();
        let f = median_filter_2d(&v, 2).unwrap();
        assert_eq!(f.get(2, 2, 0), 12);
    }

    #[test]
    fn test_edge_window_clipped() {
        let v = Voxels::from_slice_2d(3, 1, &[9u8, 1, 5]).unwrap();
        let f = median_filter_2d(&v, 1).unwrap();
        // Windows: {9, 1} -> 1, {9, 1, 5} -> 5, {1, 5} -> 1
        assert_eq!(f.plane_slice(0), &[1, 5, 1]);
    }

    #[test]
    fn test_removes_salt_noise() {
        let mut v: Voxels<u8> = Voxels::filled(Extent::new(7, 7, 1).unwrap(), 40);
        v.set(3, 3, 0, 255);
        let f = median_filter_2d(&v, 1).unwrap();
        assert_eq!(f.get(3, 3, 0), 40);
    }
}
