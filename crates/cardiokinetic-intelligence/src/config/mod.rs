// ABOUTME: Engine configuration for load, scoring, wellness, simulation, and cycle analysis
// ABOUTME: Orchestrates domain-specific configs and provides unified validation and loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine Configuration Module
//!
//! Configuration is organized into domain-specific modules:
//! - `models` - Load model, score recursion, and wellness layer parameters
//! - `simulation` - Monte-Carlo sampling and cycle analysis parameters
//!
//! There is no global instance. Callers build an [`EngineConfig`] (usually
//! with [`EngineConfig::load`]) and pass it to each engine explicitly.

pub mod error;
pub mod models;
pub mod simulation;

pub use error::ConfigError;
pub use models::{LoadModelConfig, ScoreModelConfig, WellnessConfig};
pub use simulation::{CycleConfig, SimulationConfig};

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Highest number of sessions that fit in one simulated week
const DAYS_PER_WEEK: u32 = 7;

/// Main engine configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hybrid daily load model
    pub load: LoadModelConfig,
    /// Acute/chronic recursion and score curves
    pub scores: ScoreModelConfig,
    /// Wellness adjustment layer
    pub wellness: WellnessConfig,
    /// Monte-Carlo simulation
    pub simulation: SimulationConfig,
    /// Trend and cycle analysis
    pub cycles: CycleConfig,
}

impl EngineConfig {
    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        debug!(
            runs = config.simulation.runs,
            batch_size = config.simulation.batch_size,
            seeded = config.simulation.seed.is_some(),
            "Engine configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weight_sum = self.load.power_weight + self.load.rpe_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::InvalidWeights(
                "power_weight and rpe_weight must sum to 1.0",
            ));
        }
        if self.load.power_weight < 0.0 || self.load.rpe_weight < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "load weights must be non-negative",
            ));
        }
        if self.load.rpe_divisor <= 0.0 || self.load.baseline_days <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "rpe_divisor and baseline_days must be positive",
            ));
        }

        if self.scores.atl_days <= 0.0 || self.scores.ctl_days <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "ATL and CTL time constants must be positive",
            ));
        }
        if self.scores.atl_days >= self.scores.ctl_days {
            return Err(ConfigError::InvalidRange("atl_days must be < ctl_days"));
        }
        if self.scores.ctl_floor <= 0.0 {
            return Err(ConfigError::ValueOutOfRange("ctl_floor must be positive"));
        }
        if self.scores.readiness_width_detraining <= 0.0
            || self.scores.readiness_width_overtraining <= 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "readiness widths must be positive",
            ));
        }

        if self.wellness.cluster_extreme_low >= self.wellness.cluster_extreme_high {
            return Err(ConfigError::InvalidRange(
                "cluster_extreme_low must be < cluster_extreme_high",
            ));
        }
        if self.wellness.multiplier_cap <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "wellness multiplier_cap must be positive",
            ));
        }

        self.validate_simulation()?;
        self.validate_cycles()
    }

    fn validate_simulation(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.runs == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "simulation runs must be at least 1",
            ));
        }
        if sim.batch_size == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "simulation batch_size must be at least 1",
            ));
        }
        if sim.sessions_min == 0 || sim.sessions_max > DAYS_PER_WEEK {
            return Err(ConfigError::ValueOutOfRange(
                "sessions per week must be within 1..=7",
            ));
        }
        if sim.sessions_min > sim.sessions_max {
            return Err(ConfigError::InvalidRange(
                "sessions_min must be <= sessions_max",
            ));
        }
        if !(0.0..1.0).contains(&sim.power_jitter) || sim.rpe_jitter < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "power_jitter must be within [0, 1) and rpe_jitter non-negative",
            ));
        }
        Ok(())
    }

    fn validate_cycles(&self) -> Result<(), ConfigError> {
        let cycles = &self.cycles;
        if cycles.local_window_fraction <= 0.0 || cycles.meso_window_fraction <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "cycle window fractions must be positive",
            ));
        }
        if cycles.heuristic_trough_fatigue >= cycles.heuristic_peak_fatigue {
            return Err(ConfigError::InvalidRange(
                "heuristic_trough_fatigue must be < heuristic_peak_fatigue",
            ));
        }
        if cycles.trend_threshold > cycles.strong_trend_threshold {
            return Err(ConfigError::InvalidRange(
                "trend_threshold must be <= strong_trend_threshold",
            ));
        }
        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Simulation overrides
        Self::apply_env_var("CK_SIMULATION_RUNS", &mut self.simulation.runs)?;
        Self::apply_env_var("CK_SIMULATION_BATCH_SIZE", &mut self.simulation.batch_size)?;
        Self::apply_env_var("CK_SESSIONS_MIN", &mut self.simulation.sessions_min)?;
        Self::apply_env_var("CK_SESSIONS_MAX", &mut self.simulation.sessions_max)?;
        if let Ok(val) = env::var("CK_SIMULATION_SEED") {
            let seed = val
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid CK_SIMULATION_SEED".to_owned()))?;
            self.simulation.seed = Some(seed);
        }

        // Score model overrides
        Self::apply_env_var("CK_CTL_FLOOR", &mut self.scores.ctl_floor)?;
        Self::apply_env_var("CK_FATIGUE_STEEPNESS", &mut self.scores.fatigue_steepness)?;
        Self::apply_env_var("CK_FATIGUE_MIDPOINT", &mut self.scores.fatigue_midpoint)?;

        // Load model overrides
        Self::apply_env_var("CK_POWER_WEIGHT", &mut self.load.power_weight)?;
        Self::apply_env_var("CK_RPE_WEIGHT", &mut self.load.rpe_weight)?;

        Ok(self)
    }
}
