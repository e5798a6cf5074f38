// ABOUTME: Segments a simulated median trajectory into build/recovery cycles and phase bands
// ABOUTME: Smoothing, derivatives, CUSUM change points, extrema, and a global adaptation trend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Trend/Cycle Analyzer
//!
//! Windows adapt to plan length: the local window is `floor(0.2 N)` within
//! `[2, N - 1]` and the meso window `floor(0.4 N)` within `[3, N]`. The local
//! window smooths the median fatigue series; the meso window sets the
//! minimum spacing between change points.
//!
//! Each week is assigned a [`CyclePhase`] by the first rule that applies:
//!
//! 1. Recovery-focus weeks are troughs
//! 2. Intensity or density weeks with non-falling power are peaks when power
//!    is flat and fatigue is high, otherwise ascending
//! 3. Local fatigue extrema
//! 4. Power multiplier trend outside the dead band
//! 5. Fatigue level, velocity, and acceleration heuristics

use std::collections::BTreeMap;

use cardiokinetic_core::errors::{AppError, AppResult};
use cardiokinetic_core::models::{
    CyclePhase, SessionStyle, TrainingPlan, WeekFocus, WeekPosition,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CycleConfig;
use crate::simulation::SimulationResult;
use crate::statistics::{PercentileBand, StatisticalAnalyzer};

/// Local extremum of the median fatigue series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extremum {
    /// Above both neighbours by more than the margin
    Peak,
    /// Below both neighbours by more than the margin
    Trough,
}

/// Per-week analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekAnalysis {
    /// 1-based week number
    pub week: u32,
    /// Named block from the plan
    pub phase_name: String,
    /// Planned focus
    pub focus: WeekFocus,
    /// Planned session style
    pub session_style: SessionStyle,
    /// Planned power multiplier
    pub power_multiplier: f64,
    /// Fatigue percentiles
    pub fatigue: PercentileBand,
    /// Readiness percentiles
    pub readiness: PercentileBand,
    /// Smoothed median fatigue
    pub smoothed_fatigue: f64,
    /// First derivative of smoothed fatigue
    pub velocity: f64,
    /// Second derivative of smoothed fatigue
    pub acceleration: f64,
    /// First derivative of the power multiplier
    pub power_velocity: f64,
    /// Local extremum, if any
    pub extremum: Option<Extremum>,
    /// Whether a new segment starts at this week
    pub change_point: bool,
    /// Assigned cycle phase
    pub phase: CyclePhase,
    /// Position within the plan
    pub position: WeekPosition,
}

/// Contiguous run of weeks between change points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSegment {
    /// First week of the segment
    pub start_week: u32,
    /// Last week of the segment
    pub end_week: u32,
    /// Week with the highest median fatigue
    pub peak_week: u32,
    /// Week with the lowest median fatigue
    pub trough_week: u32,
    /// Mean median fatigue
    pub avg_fatigue: f64,
    /// Mean median readiness
    pub avg_readiness: f64,
}

/// Whole-plan adaptation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationDirection {
    /// Readiness rising and/or fatigue falling
    Improving,
    /// Readiness falling and/or fatigue rising
    Declining,
    /// Neither
    Stable,
}

/// First-third versus last-third comparison of the median trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalTrend {
    /// Classified direction
    pub direction: AdaptationDirection,
    /// Weighted adaptation score
    pub score: f64,
    /// Relative fatigue drop, within `[-1, 1]`
    pub fatigue_component: f64,
    /// Relative readiness gain, within `[-1, 1]`
    pub readiness_component: f64,
    /// Whether the score clears the strong-trend threshold
    pub strong: bool,
}

/// Pooled percentile bands over a group of weeks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBand {
    /// Weeks in the group
    pub weeks: Vec<u32>,
    /// Pooled fatigue percentiles
    pub fatigue: PercentileBand,
    /// Pooled readiness percentiles
    pub readiness: PercentileBand,
}

/// Full analysis of a simulated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleAnalysis {
    /// Smoothing window (weeks)
    pub local_window: usize,
    /// Change-point spacing window (weeks)
    pub meso_window: usize,
    /// Per-week analysis in plan order
    pub weeks: Vec<WeekAnalysis>,
    /// Weeks at which a new segment starts
    pub change_points: Vec<u32>,
    /// Contiguous segments
    pub segments: Vec<CycleSegment>,
    /// Whole-plan trend
    pub trend: GlobalTrend,
    /// Bands pooled per cycle phase
    pub phase_bands: BTreeMap<CyclePhase, PhaseBand>,
    /// Bands pooled per named block, in first-appearance order
    pub named_phase_bands: Vec<(String, PhaseBand)>,
}

impl CycleAnalysis {
    /// Plan-wide mean of a per-week percentile
    #[must_use]
    pub fn mean_of<F>(&self, select: F) -> f64
    where
        F: Fn(&WeekAnalysis) -> f64,
    {
        let values: Vec<f64> = self.weeks.iter().map(select).collect();
        StatisticalAnalyzer::mean(&values)
    }
}

/// Window clamp that tolerates an upper bound below the lower bound
fn bounded_window(raw: usize, lower: usize, upper: usize) -> usize {
    raw.max(lower).min(upper.max(1))
}

/// Trend and cycle analyzer over simulation output
#[derive(Debug, Clone, Default)]
pub struct CycleAnalyzer {
    config: CycleConfig,
}

impl CycleAnalyzer {
    /// Create an analyzer with the given parameters
    #[must_use]
    pub const fn new(config: CycleConfig) -> Self {
        Self { config }
    }

    /// Local and meso window sizes for a plan of `weeks` weeks
    #[must_use]
    pub fn windows(&self, weeks: usize) -> (usize, usize) {
        let n = weeks as f64;
        let local = (n * self.config.local_window_fraction).floor() as usize;
        let meso = (n * self.config.meso_window_fraction).floor() as usize;
        (
            bounded_window(local, 2, weeks.saturating_sub(1)),
            bounded_window(meso, 3, weeks),
        )
    }

    /// Analyze a plan against its simulation result
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the plan is empty or the simulation covers a
    /// different number of weeks
    pub fn analyze(
        &self,
        plan: &TrainingPlan,
        simulation: &SimulationResult,
    ) -> AppResult<CycleAnalysis> {
        let n = plan.len();
        if n == 0 {
            return Err(AppError::invalid_input("Cannot analyze a plan with no weeks"));
        }
        if simulation.weeks.len() != n {
            return Err(AppError::invalid_input(format!(
                "Simulation covers {} weeks but plan '{}' has {n}",
                simulation.weeks.len(),
                plan.name
            )));
        }

        let (local_window, meso_window) = self.windows(n);
        let fatigue = simulation.median_fatigue();
        let readiness = simulation.median_readiness();
        let power = plan.power_multipliers();

        let smoothed = StatisticalAnalyzer::triangular_smooth(&fatigue, local_window);
        let velocity = StatisticalAnalyzer::velocity(&smoothed);
        let acceleration = StatisticalAnalyzer::acceleration(&smoothed);
        let power_velocity = StatisticalAnalyzer::velocity(&power);
        let extrema = self.extrema(&fatigue);
        let change_points = self.change_points(&fatigue, &smoothed, meso_window);

        let weeks: Vec<WeekAnalysis> = simulation
            .weeks
            .iter()
            .enumerate()
            .map(|(i, stats)| {
                let definition = plan.week(stats.week)?;
                let phase = self.classify(
                    definition.focus,
                    fatigue[i],
                    velocity[i],
                    acceleration[i],
                    power_velocity[i],
                    extrema[i],
                );
                Ok(WeekAnalysis {
                    week: definition.week,
                    phase_name: definition.phase_name.clone(),
                    focus: definition.focus,
                    session_style: definition.session_style,
                    power_multiplier: definition.power_multiplier,
                    fatigue: stats.fatigue,
                    readiness: stats.readiness,
                    smoothed_fatigue: smoothed[i],
                    velocity: velocity[i],
                    acceleration: acceleration[i],
                    power_velocity: power_velocity[i],
                    extremum: extrema[i],
                    change_point: change_points.contains(&i),
                    phase,
                    position: WeekPosition::classify(i as u32 + 1, n as u32),
                })
            })
            .collect::<AppResult<_>>()?;

        let segments = Self::segments(&weeks, &change_points);
        let trend = self.global_trend(&fatigue, &readiness);
        let phase_bands = Self::phase_bands(&weeks, simulation);
        let named_phase_bands = Self::named_phase_bands(&weeks, simulation);

        debug!(
            plan = %plan.name,
            local_window,
            meso_window,
            change_points = change_points.len(),
            segments = segments.len(),
            trend = ?trend.direction,
            "Analyzed plan cycles"
        );

        Ok(CycleAnalysis {
            local_window,
            meso_window,
            change_points: change_points.iter().map(|&i| weeks[i].week).collect(),
            weeks,
            segments,
            trend,
            phase_bands,
            named_phase_bands,
        })
    }

    /// Weeks whose median fatigue beats both neighbours by more than the margin
    fn extrema(&self, fatigue: &[f64]) -> Vec<Option<Extremum>> {
        let margin = self.config.extremum_margin;
        (0..fatigue.len())
            .map(|i| {
                if i == 0 || i + 1 >= fatigue.len() {
                    return None;
                }
                let (prev, here, next) = (fatigue[i - 1], fatigue[i], fatigue[i + 1]);
                if here > prev + margin && here > next + margin {
                    Some(Extremum::Peak)
                } else if here < prev - margin && here < next - margin {
                    Some(Extremum::Trough)
                } else {
                    None
                }
            })
            .collect()
    }

    /// CUSUM change points on the smoothed series, merged to the meso spacing
    fn change_points(&self, fatigue: &[f64], smoothed: &[f64], meso_window: usize) -> Vec<usize> {
        let threshold = self.config.cusum_threshold_factor * StatisticalAnalyzer::mean(fatigue);
        let drift = self.config.cusum_drift_factor * threshold;
        let min_gap = (meso_window / 2).max(1);

        let mut merged: Vec<usize> = Vec::new();
        for point in StatisticalAnalyzer::cusum_change_points(smoothed, threshold, drift) {
            if merged.last().is_none_or(|&last| point - last >= min_gap) {
                merged.push(point);
            }
        }
        merged
    }

    fn classify(
        &self,
        focus: WeekFocus,
        fatigue: f64,
        velocity: f64,
        acceleration: f64,
        power_velocity: f64,
        extremum: Option<Extremum>,
    ) -> CyclePhase {
        let cfg = &self.config;

        if focus == WeekFocus::Recovery {
            return CyclePhase::Trough;
        }

        if matches!(focus, WeekFocus::Intensity | WeekFocus::Density) && power_velocity >= 0.0 {
            return if power_velocity.abs() < cfg.power_dead_band
                && fatigue > cfg.intensity_peak_fatigue
            {
                CyclePhase::Peak
            } else {
                CyclePhase::Ascending
            };
        }

        match extremum {
            Some(Extremum::Peak) => return CyclePhase::Peak,
            Some(Extremum::Trough) => return CyclePhase::Trough,
            None => {}
        }

        if power_velocity > cfg.power_dead_band {
            return CyclePhase::Ascending;
        }
        if power_velocity < -cfg.power_dead_band {
            return CyclePhase::Descending;
        }

        let flat = velocity.abs() < cfg.flat_velocity;
        if flat && fatigue > cfg.heuristic_peak_fatigue {
            return CyclePhase::Peak;
        }
        if flat && fatigue < cfg.heuristic_trough_fatigue {
            return CyclePhase::Trough;
        }
        if flat && acceleration < -cfg.flat_velocity {
            return CyclePhase::Peak;
        }
        if flat && acceleration > cfg.flat_velocity {
            return CyclePhase::Trough;
        }
        if velocity >= 0.0 {
            CyclePhase::Ascending
        } else {
            CyclePhase::Descending
        }
    }

    fn segments(weeks: &[WeekAnalysis], change_points: &[usize]) -> Vec<CycleSegment> {
        let mut bounds: Vec<usize> = Vec::with_capacity(change_points.len() + 2);
        bounds.push(0);
        bounds.extend(change_points.iter().copied().filter(|&i| i > 0));
        bounds.push(weeks.len());

        bounds
            .windows(2)
            .filter(|pair| pair[0] < pair[1])
            .map(|pair| {
                let span = &weeks[pair[0]..pair[1]];
                let by_fatigue = |a: &&WeekAnalysis, b: &&WeekAnalysis| {
                    a.fatigue.p50.total_cmp(&b.fatigue.p50)
                };
                let fatigue: Vec<f64> = span.iter().map(|w| w.fatigue.p50).collect();
                let readiness: Vec<f64> = span.iter().map(|w| w.readiness.p50).collect();
                CycleSegment {
                    start_week: span[0].week,
                    end_week: span[span.len() - 1].week,
                    peak_week: span.iter().max_by(by_fatigue).map_or(span[0].week, |w| w.week),
                    trough_week: span.iter().min_by(by_fatigue).map_or(span[0].week, |w| w.week),
                    avg_fatigue: StatisticalAnalyzer::mean(&fatigue),
                    avg_readiness: StatisticalAnalyzer::mean(&readiness),
                }
            })
            .collect()
    }

    /// Compare the first and last thirds of the median trajectory
    #[must_use]
    pub fn global_trend(&self, fatigue: &[f64], readiness: &[f64]) -> GlobalTrend {
        let n = fatigue.len().min(readiness.len());
        let third = (n / 3).max(1).min(n);
        let first_fatigue = StatisticalAnalyzer::mean(&fatigue[..third]);
        let last_fatigue = StatisticalAnalyzer::mean(&fatigue[n - third..n]);
        let first_readiness = StatisticalAnalyzer::mean(&readiness[..third]);
        let last_readiness = StatisticalAnalyzer::mean(&readiness[n - third..n]);

        let fatigue_component =
            ((first_fatigue - last_fatigue) / first_fatigue.max(1.0)).clamp(-1.0, 1.0);
        let readiness_component =
            ((last_readiness - first_readiness) / first_readiness.max(1.0)).clamp(-1.0, 1.0);
        let score = self.config.trend_readiness_weight.mul_add(
            readiness_component,
            self.config.trend_fatigue_weight * fatigue_component,
        );

        let direction = if score > self.config.trend_threshold {
            AdaptationDirection::Improving
        } else if score < -self.config.trend_threshold {
            AdaptationDirection::Declining
        } else {
            AdaptationDirection::Stable
        };

        GlobalTrend {
            direction,
            score,
            fatigue_component,
            readiness_component,
            strong: score.abs() > self.config.strong_trend_threshold,
        }
    }

    fn pooled_band(
        indices: &[usize],
        weeks: &[WeekAnalysis],
        simulation: &SimulationResult,
    ) -> PhaseBand {
        let mut fatigue: Vec<f64> = Vec::new();
        let mut readiness: Vec<f64> = Vec::new();
        for &i in indices {
            if let Some(samples) = simulation.samples.fatigue.get(i) {
                fatigue.extend_from_slice(samples);
            }
            if let Some(samples) = simulation.samples.readiness.get(i) {
                readiness.extend_from_slice(samples);
            }
        }
        // Results restored without raw samples fall back to the weekly medians
        if fatigue.is_empty() {
            fatigue = indices.iter().map(|&i| weeks[i].fatigue.p50).collect();
        }
        if readiness.is_empty() {
            readiness = indices.iter().map(|&i| weeks[i].readiness.p50).collect();
        }
        PhaseBand {
            weeks: indices.iter().map(|&i| weeks[i].week).collect(),
            fatigue: StatisticalAnalyzer::percentile_band(&mut fatigue),
            readiness: StatisticalAnalyzer::percentile_band(&mut readiness),
        }
    }

    fn phase_bands(
        weeks: &[WeekAnalysis],
        simulation: &SimulationResult,
    ) -> BTreeMap<CyclePhase, PhaseBand> {
        let mut groups: BTreeMap<CyclePhase, Vec<usize>> = BTreeMap::new();
        for (i, week) in weeks.iter().enumerate() {
            groups.entry(week.phase).or_default().push(i);
        }
        groups
            .into_iter()
            .map(|(phase, indices)| (phase, Self::pooled_band(&indices, weeks, simulation)))
            .collect()
    }

    fn named_phase_bands(
        weeks: &[WeekAnalysis],
        simulation: &SimulationResult,
    ) -> Vec<(String, PhaseBand)> {
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (i, week) in weeks.iter().enumerate() {
            match groups.iter_mut().find(|(name, _)| *name == week.phase_name) {
                Some((_, indices)) => indices.push(i),
                None => groups.push((week.phase_name.clone(), vec![i])),
            }
        }
        groups
            .into_iter()
            .map(|(name, indices)| (name, Self::pooled_band(&indices, weeks, simulation)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_adapt_to_plan_length() {
        let analyzer = CycleAnalyzer::default();
        assert_eq!(analyzer.windows(12), (2, 4));
        assert_eq!(analyzer.windows(20), (4, 8));
        assert_eq!(analyzer.windows(4), (2, 3));
        assert_eq!(analyzer.windows(1), (1, 1));
    }

    #[test]
    fn test_recovery_focus_is_always_trough() {
        let analyzer = CycleAnalyzer::default();
        let phase = analyzer.classify(
            WeekFocus::Recovery,
            90.0,
            5.0,
            0.0,
            0.3,
            Some(Extremum::Peak),
        );
        assert_eq!(phase, CyclePhase::Trough);
    }

    #[test]
    fn test_flat_intensity_week_with_high_fatigue_is_peak() {
        let analyzer = CycleAnalyzer::default();
        assert_eq!(
            analyzer.classify(WeekFocus::Intensity, 62.0, 0.5, 0.0, 0.0, None),
            CyclePhase::Peak
        );
        assert_eq!(
            analyzer.classify(WeekFocus::Intensity, 40.0, 0.5, 0.0, 0.05, None),
            CyclePhase::Ascending
        );
    }

    #[test]
    fn test_power_trend_outside_dead_band() {
        let analyzer = CycleAnalyzer::default();
        assert_eq!(
            analyzer.classify(WeekFocus::Volume, 50.0, 3.0, 0.0, -0.05, None),
            CyclePhase::Descending
        );
        assert_eq!(
            analyzer.classify(WeekFocus::Volume, 50.0, -3.0, 0.0, 0.05, None),
            CyclePhase::Ascending
        );
    }

    #[test]
    fn test_global_trend_improving() {
        let analyzer = CycleAnalyzer::default();
        let fatigue = [60.0, 58.0, 55.0, 50.0, 45.0, 40.0];
        let readiness = [40.0, 45.0, 50.0, 55.0, 62.0, 70.0];
        let trend = analyzer.global_trend(&fatigue, &readiness);
        assert_eq!(trend.direction, AdaptationDirection::Improving);
        assert!(trend.strong);
        assert!(trend.readiness_component <= 1.0);
    }

    #[test]
    fn test_extrema_need_margin() {
        let analyzer = CycleAnalyzer::default();
        let extrema = analyzer.extrema(&[40.0, 45.0, 41.0, 30.0, 31.5]);
        assert_eq!(extrema[1], Some(Extremum::Peak));
        assert_eq!(extrema[3], Some(Extremum::Trough));
        assert_eq!(extrema[2], None);
    }
}
