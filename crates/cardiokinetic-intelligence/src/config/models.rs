// ABOUTME: Load, score, and wellness model parameters with defaults from the model constants
// ABOUTME: These govern the live scoring path and the per-run recursion inside the simulator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Model Configuration
//!
//! Parameters of the hybrid load model, the dual-EWMA score recursion, and
//! the wellness adjustment layer.

use cardiokinetic_core::constants::{load, scores, wellness};
use cardiokinetic_core::models::ScoreState;
use serde::{Deserialize, Serialize};

/// Hybrid power/RPE daily load model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadModelConfig {
    /// Weight of the power component when both components are present
    pub power_weight: f64,
    /// Weight of the RPE component when both components are present
    pub rpe_weight: f64,
    /// Load of one hour at baseline power
    pub power_load_scale: f64,
    /// Divisor of `rpe x minutes`
    pub rpe_divisor: f64,
    /// Time constant of the personal power baseline (days)
    pub baseline_days: f64,
}

impl LoadModelConfig {
    /// Smoothing factor of the power baseline EWMA, `2 / (N + 1)`
    #[must_use]
    pub fn baseline_alpha(&self) -> f64 {
        2.0 / (self.baseline_days + 1.0)
    }
}

impl Default for LoadModelConfig {
    fn default() -> Self {
        Self {
            power_weight: load::POWER_WEIGHT,
            rpe_weight: load::RPE_WEIGHT,
            power_load_scale: load::POWER_LOAD_SCALE,
            rpe_divisor: load::RPE_LOAD_DIVISOR,
            baseline_days: load::POWER_BASELINE_DAYS,
        }
    }
}

/// Acute/chronic recursion and score curve parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreModelConfig {
    /// Acute load time constant (days)
    pub atl_days: f64,
    /// Chronic load time constant (days)
    pub ctl_days: f64,
    /// Program-start state for live scoring
    pub live_seed: ScoreState,
    /// Minimum CTL used as the ACWR denominator
    pub ctl_floor: f64,
    /// Logistic steepness of the fatigue curve
    pub fatigue_steepness: f64,
    /// ACWR at which fatigue reads 50
    pub fatigue_midpoint: f64,
    /// TSB at which readiness peaks
    pub readiness_optimal_tsb: f64,
    /// Gaussian width for TSB at or above the optimum
    pub readiness_width_detraining: f64,
    /// Gaussian width for TSB below the optimum
    pub readiness_width_overtraining: f64,
}

impl ScoreModelConfig {
    /// ATL smoothing factor, `2 / (atl_days + 1)`
    #[must_use]
    pub fn atl_alpha(&self) -> f64 {
        2.0 / (self.atl_days + 1.0)
    }

    /// CTL smoothing factor, `2 / (ctl_days + 1)`
    #[must_use]
    pub fn ctl_alpha(&self) -> f64 {
        2.0 / (self.ctl_days + 1.0)
    }
}

impl Default for ScoreModelConfig {
    fn default() -> Self {
        Self {
            atl_days: scores::ATL_DAYS,
            ctl_days: scores::CTL_DAYS,
            live_seed: ScoreState::live_seed(),
            ctl_floor: scores::CTL_FLOOR,
            fatigue_steepness: scores::FATIGUE_STEEPNESS,
            fatigue_midpoint: scores::FATIGUE_MIDPOINT,
            readiness_optimal_tsb: scores::READINESS_OPTIMAL_TSB,
            readiness_width_detraining: scores::READINESS_WIDTH_DETRAINING,
            readiness_width_overtraining: scores::READINESS_WIDTH_OVERTRAINING,
        }
    }
}

/// Wellness adjustment layer parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessConfig {
    /// Exponent of the deviation amplifier, `1 + (|v - 3| / 2)^k`
    pub amplifier_exponent: f64,
    /// Cluster mean at or below which a cluster is extreme-negative
    pub cluster_extreme_low: f64,
    /// Cluster mean at or above which a cluster is extreme-positive
    pub cluster_extreme_high: f64,
    /// Multiplier when two clusters align
    pub synergy_two_clusters: f64,
    /// Multiplier when three or more clusters align
    pub synergy_three_clusters: f64,
    /// Calendar days before today considered for trend
    pub trend_history_days: usize,
    /// Minimum prior responses before a trend is detected
    pub trend_min_history: usize,
    /// Weighted-average gap that counts as a trend
    pub trend_threshold: f64,
    /// Multiplier when today is markedly worse than the trailing average
    pub trend_declining_multiplier: f64,
    /// Multiplier when today is markedly better than the trailing average
    pub trend_improving_multiplier: f64,
    /// Extra weight on worse-than-neutral adjustments
    pub risk_bias: f64,
    /// Cap on the combined multiplier relative to the base impact
    pub multiplier_cap: f64,
    /// Cap on the summed cascade fatigue boost (points)
    pub cascade_fatigue_cap: f64,
    /// Cap on the summed cascade readiness boost (points)
    pub cascade_readiness_cap: f64,
}

impl Default for WellnessConfig {
    fn default() -> Self {
        Self {
            amplifier_exponent: 1.5,
            cluster_extreme_low: 1.5,
            cluster_extreme_high: 4.5,
            synergy_two_clusters: 1.25,
            synergy_three_clusters: 1.5,
            trend_history_days: wellness::TREND_HISTORY_DAYS,
            trend_min_history: wellness::TREND_MIN_HISTORY,
            trend_threshold: 0.5,
            trend_declining_multiplier: 1.3,
            trend_improving_multiplier: 0.85,
            risk_bias: 1.2,
            multiplier_cap: 2.5,
            cascade_fatigue_cap: 8.0,
            cascade_readiness_cap: 5.0,
        }
    }
}
