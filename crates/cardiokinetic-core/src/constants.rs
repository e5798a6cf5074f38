// ABOUTME: Model constants for the load calculator, dual-EWMA score engine, and wellness layer
// ABOUTME: Grouped by concern so config defaults and tests read from one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Model constants
//!
//! These values define the mathematical contract of the engine. They are the
//! defaults for the runtime configuration in `cardiokinetic-intelligence`.

/// Hybrid external/internal daily load model
pub mod load {
    /// Power load scale: a one-hour session at baseline power scores 100
    pub const POWER_LOAD_SCALE: f64 = 100.0;

    /// RPE load divisor: `(rpe x minutes) / 4`
    pub const RPE_LOAD_DIVISOR: f64 = 4.0;

    /// Weight of the power (external) component when both components exist
    pub const POWER_WEIGHT: f64 = 0.6;

    /// Weight of the RPE (internal) component when both components exist
    pub const RPE_WEIGHT: f64 = 0.4;

    /// Time constant of the personal power baseline EWMA (days)
    pub const POWER_BASELINE_DAYS: f64 = 42.0;

    /// Lowest accepted RPE rating
    pub const RPE_MIN: f64 = 1.0;

    /// Highest accepted RPE rating
    pub const RPE_MAX: f64 = 10.0;
}

/// Banister-style acute/chronic load recursion and score shaping
pub mod scores {
    /// Acute load time constant (days)
    pub const ATL_DAYS: f64 = 7.0;

    /// Chronic load time constant (days)
    pub const CTL_DAYS: f64 = 42.0;

    /// Seed ATL for live scoring; keeps day-1 readiness near 75 instead of 93
    pub const LIVE_SEED_ATL: f64 = 9.0;

    /// Seed CTL for live scoring
    pub const LIVE_SEED_CTL: f64 = 10.0;

    /// Seed ATL for simulated trajectories
    pub const SIMULATION_SEED_ATL: f64 = 0.0;

    /// Seed CTL for simulated trajectories
    pub const SIMULATION_SEED_CTL: f64 = 10.0;

    /// Minimum CTL used as the ACWR denominator
    pub const CTL_FLOOR: f64 = 15.0;

    /// Logistic steepness of the fatigue curve
    pub const FATIGUE_STEEPNESS: f64 = 4.5;

    /// ACWR at which fatigue reads 50
    pub const FATIGUE_MIDPOINT: f64 = 1.15;

    /// TSB at which readiness peaks at 100
    pub const READINESS_OPTIMAL_TSB: f64 = 20.0;

    /// Gaussian width above the optimum (detraining side)
    pub const READINESS_WIDTH_DETRAINING: f64 = 2000.0;

    /// Gaussian width below the optimum (overtraining side)
    pub const READINESS_WIDTH_OVERTRAINING: f64 = 1000.0;

    /// Lower bound of every score
    pub const SCORE_MIN: f64 = 0.0;

    /// Upper bound of every score
    pub const SCORE_MAX: f64 = 100.0;
}

/// Interpretation bands for fatigue and readiness scores
pub mod zones {
    /// Readiness at or above this is "fresh"
    pub const READINESS_FRESH: f64 = 65.0;

    /// Readiness at or above this is "recovered"
    pub const READINESS_RECOVERED: f64 = 50.0;

    /// Readiness at or above this is "tired"; below is "overreached"
    pub const READINESS_TIRED: f64 = 35.0;

    /// Fatigue at or above this is "overreaching"
    pub const FATIGUE_OVERREACHING: f64 = 60.0;

    /// Fatigue at or above this is "high risk"
    pub const FATIGUE_HIGH_RISK: f64 = 80.0;
}

/// Subjective wellness questionnaire
pub mod wellness {
    /// Lowest questionnaire rating
    pub const RATING_MIN: u8 = 1;

    /// Highest questionnaire rating
    pub const RATING_MAX: u8 = 5;

    /// Neutral questionnaire rating
    pub const RATING_NEUTRAL: f64 = 3.0;

    /// Calendar days before today consulted for trend analysis
    pub const TREND_HISTORY_DAYS: usize = 7;

    /// Minimum prior responses before a trend is considered
    pub const TREND_MIN_HISTORY: usize = 3;
}
