//! Level calculators
//!
//! A level calculator reduces a histogram to a single intensity. Voxels at
//! or above the level count as foreground.
//!
//! Every histogram-derived strategy handles degenerate input the same
//! way: an empty histogram gives 0 and a histogram holding a single
//! distinct value gives that value.

use crate::{ThresholdError, ThresholdResult};
use voxkit_core::Histogram;

/// Strategy computing a threshold level from a histogram
pub trait LevelCalculator {
    fn calculate_level(&self, histogram: &Histogram) -> ThresholdResult<u32>;
}

/// Shared handling of empty and single-valued histograms
fn degenerate_level(histogram: &Histogram) -> Option<u32> {
    if histogram.is_empty() {
        log::warn!("level of an empty histogram, using 0");
        return Some(0);
    }
    if histogram.unique_values() == 1 {
        return histogram.min_value();
    }
    None
}

/// Otsu's method: the level maximizing between-class variance
#[derive(Debug, Clone, Copy, Default)]
pub struct Otsu;

impl LevelCalculator for Otsu {
    fn calculate_level(&self, histogram: &Histogram) -> ThresholdResult<u32> {
        if let Some(level) = degenerate_level(histogram) {
            return Ok(level);
        }
        let counts = histogram.counts();
        let total = histogram.total_count() as f64;
        let sum_all: f64 = counts
            .iter()
            .enumerate()
            .map(|(v, &c)| v as f64 * c as f64)
            .sum();

        // Split after value k: below = 0..=k, above = k+1..
        let (mut w_below, mut sum_below) = (0.0, 0.0);
        let mut best_variance = f64::MIN;
        let mut best_split = 0;
        for (k, &c) in counts.iter().enumerate() {
            w_below += c as f64;
            sum_below += k as f64 * c as f64;
            let w_above = total - w_below;
            if w_below == 0.0 {
                continue;
            }
            if w_above == 0.0 {
                break;
            }
            let diff = sum_below / w_below - (sum_all - sum_below) / w_above;
            let between = w_below * w_above * diff * diff;
            if between > best_variance {
                best_variance = between;
                best_split = k;
            }
        }
        Ok(best_split as u32 + 1)
    }
}

/// The histogram mean, rounded to the nearest value
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanLevel;

impl LevelCalculator for MeanLevel {
    fn calculate_level(&self, histogram: &Histogram) -> ThresholdResult<u32> {
        if let Some(level) = degenerate_level(histogram) {
            return Ok(level);
        }
        Ok(histogram.mean().round() as u32)
    }
}

/// A fixed level, ignoring the histogram
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantLevel(pub u32);

impl LevelCalculator for ConstantLevel {
    fn calculate_level(&self, _histogram: &Histogram) -> ThresholdResult<u32> {
        Ok(self.0)
    }
}

/// The value at a quantile of the histogram
#[derive(Debug, Clone, Copy)]
pub struct QuantileLevel {
    /// Fraction in `[0, 1]`
    pub quantile: f64,
}

impl Default for QuantileLevel {
    fn default() -> Self {
        Self { quantile: 0.5 }
    }
}

impl QuantileLevel {
    pub fn validate(&self) -> ThresholdResult<()> {
        if !(0.0..=1.0).contains(&self.quantile) {
            return Err(ThresholdError::Misconfigured(format!(
                "quantile must lie in [0, 1], got {}",
                self.quantile
            )));
        }
        Ok(())
    }
}

impl LevelCalculator for QuantileLevel {
    fn calculate_level(&self, histogram: &Histogram) -> ThresholdResult<u32> {
        self.validate()?;
        if let Some(level) = degenerate_level(histogram) {
            return Ok(level);
        }
        Ok(histogram.quantile(self.quantile).unwrap_or(0))
    }
}

/// Mean plus a multiple of the standard deviation
///
/// The result is clamped to the histogram's value range.
#[derive(Debug, Clone, Copy)]
pub struct MeanPlusStdDev {
    pub factor: f64,
}

impl Default for MeanPlusStdDev {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

impl MeanPlusStdDev {
    pub fn validate(&self) -> ThresholdResult<()> {
        if !self.factor.is_finite() {
            return Err(ThresholdError::Misconfigured(format!(
                "factor must be finite, got {}",
                self.factor
            )));
        }
        Ok(())
    }
}

impl LevelCalculator for MeanPlusStdDev {
    fn calculate_level(&self, histogram: &Histogram) -> ThresholdResult<u32> {
        self.validate()?;
        if let Some(level) = degenerate_level(histogram) {
            return Ok(level);
        }
        let max = histogram.num_bins().saturating_sub(1) as f64;
        let level = histogram.mean() + self.factor * histogram.std_dev();
        Ok(level.round().clamp(0.0, max) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxkit_core::Voxels;

    fn hist_of(data: &[u8]) -> Histogram {
        Histogram::from_voxels(&Voxels::from_slice_2d(data.len() as u32, 1, data).unwrap())
    }

    fn all_calculators() -> Vec<Box<dyn LevelCalculator>> {
        vec![
            Box::new(Otsu),
            Box::new(MeanLevel),
            Box::new(QuantileLevel::default()),
            Box::new(MeanPlusStdDev::default()),
        ]
    }

    #[test]
    fn test_empty_histogram_is_zero() {
        let empty = Histogram::new(256);
        for calc in all_calculators() {
            assert_eq!(calc.calculate_level(&empty).unwrap(), 0);
        }
    }

    #[test]
    fn test_single_value_histogram() {
        let h = hist_of(&[77; 12]);
        for calc in all_calculators() {
            assert_eq!(calc.calculate_level(&h).unwrap(), 77);
        }
    }

    #[test]
    fn test_otsu_splits_two_clusters() {
        let mut data = vec![20u8; 50];
        data.extend([22u8; 30]);
        data.extend([180u8; 40]);
        data.extend([185u8; 40]);
        let level = Otsu.calculate_level(&hist_of(&data)).unwrap();
        assert!(level > 22 && level <= 180, "level {level}");
    }

    #[test]
    fn test_otsu_two_values() {
        let level = Otsu.calculate_level(&hist_of(&[40, 60, 40, 60])).unwrap();
        assert_eq!(level, 41);
    }

    #[test]
    fn test_mean_and_constant() {
        let h = hist_of(&[10, 20, 31]);
        assert_eq!(MeanLevel.calculate_level(&h).unwrap(), 20);
        assert_eq!(ConstantLevel(99).calculate_level(&h).unwrap(), 99);
    }

    #[test]
    fn test_quantile_level() {
        let h = hist_of(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let q = QuantileLevel { quantile: 0.9 };
        assert_eq!(q.calculate_level(&h).unwrap(), 9);
        let bad = QuantileLevel { quantile: 1.5 };
        assert!(matches!(bad.calculate_level(&h), Err(ThresholdError::Misconfigured(_))));
    }

    #[test]
    fn test_mean_plus_std_dev() {
        // mean 5, population std dev 2
        let h = hist_of(&[2, 4, 4, 4, 5, 5, 7, 9]);
        let calc = MeanPlusStdDev { factor: 1.5 };
        assert_eq!(calc.calculate_level(&h).unwrap(), 8);
        let clamped = MeanPlusStdDev { factor: 1000.0 };
        assert_eq!(clamped.calculate_level(&h).unwrap(), 255);
        let nan = MeanPlusStdDev { factor: f64::NAN };
        assert!(nan.calculate_level(&h).is_err());
    }
}
