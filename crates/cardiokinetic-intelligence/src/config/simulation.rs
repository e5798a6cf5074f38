// ABOUTME: Monte-Carlo simulation and cycle analysis parameters
// ABOUTME: Run counts, session placement range, jitter, seeding, and trend-analysis windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Simulation Configuration
//!
//! Controls how many synthetic trajectories are sampled, how sessions are
//! placed and perturbed inside each simulated week, and how the resulting
//! median trajectory is segmented into cycles.

use cardiokinetic_core::models::ScoreState;
use serde::{Deserialize, Serialize};

/// Monte-Carlo simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent trajectories
    pub runs: usize,
    /// Runs per cooperative batch
    pub batch_size: usize,
    /// Fewest sessions drawn per week
    pub sessions_min: u32,
    /// Most sessions drawn per week
    pub sessions_max: u32,
    /// Uniform power jitter as a fraction of planned power
    pub power_jitter: f64,
    /// Uniform RPE jitter in rating points
    pub rpe_jitter: f64,
    /// Master seed; `None` draws one from OS entropy
    pub seed: Option<u64>,
    /// Starting state of every trajectory
    pub seed_state: ScoreState,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runs: 10_000,
            batch_size: 500,
            sessions_min: 2,
            sessions_max: 4,
            power_jitter: 0.05,
            rpe_jitter: 0.5,
            seed: None,
            seed_state: ScoreState::simulation_seed(),
        }
    }
}

/// Trend and cycle analysis parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Local smoothing window as a fraction of plan length
    pub local_window_fraction: f64,
    /// Meso window as a fraction of plan length
    pub meso_window_fraction: f64,
    /// CUSUM threshold as a fraction of mean median fatigue
    pub cusum_threshold_factor: f64,
    /// CUSUM drift as a fraction of the threshold
    pub cusum_drift_factor: f64,
    /// Points by which a week must beat both neighbours to be an extremum
    pub extremum_margin: f64,
    /// Power-multiplier change treated as flat
    pub power_dead_band: f64,
    /// Fatigue above which a flat intensity week reads as a peak
    pub intensity_peak_fatigue: f64,
    /// Fatigue above which a flat week reads as a peak
    pub heuristic_peak_fatigue: f64,
    /// Fatigue below which a flat week reads as a trough
    pub heuristic_trough_fatigue: f64,
    /// Velocity magnitude treated as flat by the heuristics
    pub flat_velocity: f64,
    /// Adaptation score beyond which the plan trend is improving or declining
    pub trend_threshold: f64,
    /// Adaptation score beyond which the plan trend is strong
    pub strong_trend_threshold: f64,
    /// Weight of the readiness component of the adaptation score
    pub trend_readiness_weight: f64,
    /// Weight of the fatigue component of the adaptation score
    pub trend_fatigue_weight: f64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            local_window_fraction: 0.20,
            meso_window_fraction: 0.40,
            cusum_threshold_factor: 0.25,
            cusum_drift_factor: 0.30,
            extremum_margin: 2.0,
            power_dead_band: 0.02,
            intensity_peak_fatigue: 50.0,
            heuristic_peak_fatigue: 70.0,
            heuristic_trough_fatigue: 30.0,
            flat_velocity: 1.0,
            trend_threshold: 0.1,
            strong_trend_threshold: 0.25,
            trend_readiness_weight: 0.6,
            trend_fatigue_weight: 0.4,
        }
    }
}
