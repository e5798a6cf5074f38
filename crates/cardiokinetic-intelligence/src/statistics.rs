// ABOUTME: Statistical helpers for simulation output and trajectory analysis
// ABOUTME: Interpolated percentiles, summary stats, triangular smoothing, derivatives, and CUSUM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Percentile band of one week's samples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentileBand {
    /// 15th percentile
    pub p15: f64,
    /// 30th percentile
    pub p30: f64,
    /// Median
    pub p50: f64,
    /// 70th percentile
    pub p70: f64,
    /// 85th percentile
    pub p85: f64,
}

impl PercentileBand {
    /// Whether `p15 <= p30 <= p50 <= p70 <= p85`
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.p15 <= self.p30 && self.p30 <= self.p50 && self.p50 <= self.p70 && self.p70 <= self.p85
    }
}

/// Mean, spread, and range of a sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

/// Statistical analyzer for simulated score distributions and weekly trajectories
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Percentile of an ascending-sorted sample by linear interpolation
    ///
    /// The rank is `p / 100 x (n - 1)`. Returns 0 for an empty sample.
    #[must_use]
    pub fn percentile(sorted: &[f64], p: f64) -> f64 {
        match sorted.len() {
            0 => 0.0,
            1 => sorted[0],
            n => {
                let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
                let lower = rank.floor() as usize;
                let upper = rank.ceil() as usize;
                let fraction = rank - lower as f64;
                (sorted[upper] - sorted[lower]).mul_add(fraction, sorted[lower])
            }
        }
    }

    /// Sort a sample in place and read its percentile band
    #[must_use]
    pub fn percentile_band(samples: &mut [f64]) -> PercentileBand {
        samples.sort_by(f64::total_cmp);
        PercentileBand {
            p15: Self::percentile(samples, 15.0),
            p30: Self::percentile(samples, 30.0),
            p50: Self::percentile(samples, 50.0),
            p70: Self::percentile(samples, 70.0),
            p85: Self::percentile(samples, 85.0),
        }
    }

    /// Arithmetic mean; 0 for an empty sample
    #[must_use]
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Mean, population standard deviation, min, and max
    #[must_use]
    pub fn summary(values: &[f64]) -> SummaryStats {
        if values.is_empty() {
            return SummaryStats::default();
        }
        let mean = Self::mean(values);
        let variance = values
            .iter()
            .map(|value| (value - mean) * (value - mean))
            .sum::<f64>()
            / values.len() as f64;
        SummaryStats {
            mean,
            std_dev: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Triangular-weighted moving average over a centred window of `window` points
    ///
    /// Weights are `h + 1 - |k|` for offsets `|k| <= h` where `h = window / 2`,
    /// renormalized at the edges where part of the window falls outside.
    #[must_use]
    pub fn triangular_smooth(values: &[f64], window: usize) -> Vec<f64> {
        let half = window / 2;
        if half == 0 || values.len() < 2 {
            return values.to_vec();
        }
        let last = values.len() - 1;
        (0..values.len())
            .map(|i| {
                let start = i.saturating_sub(half);
                let end = (i + half).min(last);
                let (sum, weight) = (start..=end).fold((0.0, 0.0), |(sum, weight), j| {
                    let w = (half + 1 - i.abs_diff(j)) as f64;
                    (w.mul_add(values[j], sum), weight + w)
                });
                sum / weight
            })
            .collect()
    }

    /// First derivative by central difference, one-sided at the edges
    #[must_use]
    pub fn velocity(values: &[f64]) -> Vec<f64> {
        let n = values.len();
        if n < 2 {
            return vec![0.0; n];
        }
        (0..n)
            .map(|i| match i {
                0 => values[1] - values[0],
                i if i == n - 1 => values[i] - values[i - 1],
                i => (values[i + 1] - values[i - 1]) / 2.0,
            })
            .collect()
    }

    /// Second derivative `s[i+1] - 2 s[i] + s[i-1]`, zero at the edges
    #[must_use]
    pub fn acceleration(values: &[f64]) -> Vec<f64> {
        let n = values.len();
        (0..n)
            .map(|i| {
                if i == 0 || i + 1 >= n {
                    0.0
                } else {
                    2.0f64.mul_add(-values[i], values[i + 1]) + values[i - 1]
                }
            })
            .collect()
    }

    /// Two-sided CUSUM over step deltas; returns indices where a shift is flagged
    ///
    /// Each step's delta is dampened by `drift` before accumulating. When either
    /// accumulator crosses `threshold` the index is flagged and both reset.
    #[must_use]
    pub fn cusum_change_points(values: &[f64], threshold: f64, drift: f64) -> Vec<usize> {
        if threshold <= 0.0 {
            return Vec::new();
        }
        let mut positive = 0.0_f64;
        let mut negative = 0.0_f64;
        let mut change_points = Vec::new();

        for i in 1..values.len() {
            let delta = values[i] - values[i - 1];
            positive = (positive + delta - drift).max(0.0);
            negative = (negative + delta + drift).min(0.0);
            if positive > threshold || negative < -threshold {
                change_points.push(i);
                positive = 0.0;
                negative = 0.0;
            }
        }
        change_points
    }
}
