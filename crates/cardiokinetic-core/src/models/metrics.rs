// ABOUTME: Recursive acute/chronic load state and the per-day metrics record derived from it
// ABOUTME: Includes readiness and fatigue interpretation bands used by charts and summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::scores::{
    LIVE_SEED_ATL, LIVE_SEED_CTL, SIMULATION_SEED_ATL, SIMULATION_SEED_CTL,
};
use crate::constants::zones::{
    FATIGUE_HIGH_RISK, FATIGUE_OVERREACHING, READINESS_FRESH, READINESS_RECOVERED,
    READINESS_TIRED,
};

/// Acute/chronic load pair carried from one day to the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Acute training load (7-day EWMA)
    pub atl: f64,
    /// Chronic training load (42-day EWMA)
    pub ctl: f64,
}

impl ScoreState {
    /// Create a state from explicit values
    #[must_use]
    pub const fn new(atl: f64, ctl: f64) -> Self {
        Self { atl, ctl }
    }

    /// Program-start seed for live athletes
    #[must_use]
    pub const fn live_seed() -> Self {
        Self::new(LIVE_SEED_ATL, LIVE_SEED_CTL)
    }

    /// Fresh seed for each simulated trajectory
    #[must_use]
    pub const fn simulation_seed() -> Self {
        Self::new(SIMULATION_SEED_ATL, SIMULATION_SEED_CTL)
    }

    /// Training stress balance, `ctl - atl`
    #[must_use]
    pub fn tsb(&self) -> f64 {
        self.ctl - self.atl
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::live_seed()
    }
}

/// Scores and load state for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    /// Calendar date
    pub date: NaiveDate,
    /// Blended daily load
    pub daily_load: f64,
    /// Acute training load after this day
    pub atl: f64,
    /// Chronic training load after this day
    pub ctl: f64,
    /// Acute:chronic workload ratio with floored CTL
    pub acwr: f64,
    /// Training stress balance
    pub tsb: f64,
    /// Fatigue score, 0-100
    pub fatigue_score: f64,
    /// Readiness score, 0-100
    pub readiness_score: f64,
}

impl DailyMetrics {
    /// Interpret the readiness score
    #[must_use]
    pub fn readiness_zone(&self) -> ReadinessZone {
        ReadinessZone::from_score(self.readiness_score)
    }

    /// Interpret the fatigue score
    #[must_use]
    pub fn fatigue_zone(&self) -> FatigueZone {
        FatigueZone::from_score(self.fatigue_score)
    }
}

/// Readiness interpretation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessZone {
    /// Readiness >= 65
    Fresh,
    /// Readiness 50-65
    Recovered,
    /// Readiness 35-50
    Tired,
    /// Readiness < 35
    Overreached,
}

impl ReadinessZone {
    /// Classify a readiness score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= READINESS_FRESH {
            Self::Fresh
        } else if score >= READINESS_RECOVERED {
            Self::Recovered
        } else if score >= READINESS_TIRED {
            Self::Tired
        } else {
            Self::Overreached
        }
    }
}

/// Fatigue interpretation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueZone {
    /// Fatigue < 60
    Low,
    /// Fatigue 60-80
    Overreaching,
    /// Fatigue >= 80
    HighRisk,
}

impl FatigueZone {
    /// Classify a fatigue score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= FATIGUE_HIGH_RISK {
            Self::HighRisk
        } else if score >= FATIGUE_OVERREACHING {
            Self::Overreaching
        } else {
            Self::Low
        }
    }
}
