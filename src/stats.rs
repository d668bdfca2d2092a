//! Descriptive statistics for a cohort grade distribution.
//!
//! The portal exposes, per course syllabus and exam period, the raw grade
//! samples of the whole cohort. This is consumed independently of the
//! per-student aggregation.

use serde::Serialize;

use crate::aggregate::course::PASS_THRESHOLD;
use crate::aggregate::utility::{mean, stddev};

/// Summary of one cohort distribution, over normalized 0–10 samples.
#[derive(Debug, Default, Serialize)]
pub struct DistributionStats {
    pub count: usize,
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of samples at or above the pass threshold, 0–100.
    pub pass_percent: f64,
    /// Sample counts per unit grade band: `[0,1)`, `[1,2)`, …, `[9,10]`.
    pub histogram: [usize; 10],
}

impl DistributionStats {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return DistributionStats::default();
        }

        let avg = mean(samples);
        let sd = stddev(samples, avg);

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut passing = 0;
        let mut histogram = [0usize; 10];

        for &sample in samples {
            if sample < min {
                min = sample;
            }
            if sample > max {
                max = sample;
            }
            if sample >= PASS_THRESHOLD {
                passing += 1;
            }

            let bucket = (sample.floor() as usize).min(9);
            histogram[bucket] += 1;
        }

        DistributionStats {
            count: samples.len(),
            mean: avg,
            stddev: sd,
            min,
            max,
            pass_percent: Self::pct(passing, samples.len()),
            histogram,
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(DistributionStats::pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(DistributionStats::pct(50, 100), 50.0);
        assert_eq!(DistributionStats::pct(1, 4), 25.0);
    }

    #[test]
    fn test_from_empty_samples() {
        let stats = DistributionStats::from_samples(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.pass_percent, 0.0);
    }

    #[test]
    fn test_from_samples() {
        let stats = DistributionStats::from_samples(&[4.0, 6.0, 8.0, 10.0]);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 7.0);
        assert_eq!(stats.min, 4.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.pass_percent, 75.0);
    }

    #[test]
    fn test_histogram_buckets() {
        let stats = DistributionStats::from_samples(&[0.0, 0.9, 5.0, 5.5, 10.0]);

        assert_eq!(stats.histogram[0], 2);
        assert_eq!(stats.histogram[5], 2);
        // A full 10.0 lands in the top band
        assert_eq!(stats.histogram[9], 1);
    }
}
