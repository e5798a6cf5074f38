// ABOUTME: Hybrid external/internal daily load model and the personal power baseline
// ABOUTME: Folds session history into per-day aggregates and scores each day's training cost
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Load Calculator
//!
//! Daily load blends an external, power-based cost with an internal,
//! effort-based cost:
//!
//! - Power load: `scale x hours x (avg_power / baseline)^2`
//! - RPE load: `(avg_rpe x minutes) / divisor`
//! - Daily load: `0.6 x power + 0.4 x rpe`, falling back to whichever
//!   component is present when the other is zero
//!
//! The power baseline is a 42-day EWMA of daily average power. It is a
//! running fold, so a day's load always depends on every earlier day.

use std::collections::BTreeMap;

use cardiokinetic_core::models::{DailyAggregate, Session};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::LoadModelConfig;

/// Fold a session history into one aggregate per calendar date, oldest first
///
/// Sessions may arrive in any order. Sessions with a non-positive duration
/// still count towards `session_count` but contribute no load.
#[must_use]
pub fn aggregate_sessions(sessions: &[Session]) -> Vec<DailyAggregate> {
    let mut by_date: BTreeMap<NaiveDate, DailyAggregate> = BTreeMap::new();
    for session in sessions {
        if session.duration_minutes <= 0.0 {
            warn!(
                date = %session.date,
                duration_minutes = session.duration_minutes,
                "Session without positive duration contributes no load"
            );
        }
        by_date
            .entry(session.date)
            .and_modify(|aggregate| aggregate.add_session(session))
            .or_insert_with(|| DailyAggregate::from_session(session));
    }
    by_date.into_values().collect()
}

/// Personal power reference tracked as an EWMA of daily average power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerBaseline {
    value: Option<f64>,
    alpha: f64,
}

impl PowerBaseline {
    /// Empty baseline; the first powered day seeds it
    #[must_use]
    pub fn new(config: &LoadModelConfig) -> Self {
        Self {
            value: None,
            alpha: config.baseline_alpha(),
        }
    }

    /// Baseline seeded with a known reference power
    ///
    /// Non-positive seeds are ignored and the first powered day seeds it instead.
    #[must_use]
    pub fn seeded(config: &LoadModelConfig, watts: f64) -> Self {
        if watts <= 0.0 {
            warn!(watts, "Ignoring non-positive power baseline seed");
        }
        Self {
            value: (watts > 0.0).then_some(watts),
            alpha: config.baseline_alpha(),
        }
    }

    /// Current baseline in watts, if any powered day has been seen
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// Advance the baseline with one day's average power
    ///
    /// Days without power leave the baseline unchanged.
    pub fn update(&mut self, avg_power: f64) {
        if avg_power <= 0.0 {
            return;
        }
        self.value = Some(match self.value {
            Some(baseline) => self.alpha.mul_add(avg_power - baseline, baseline),
            None => avg_power,
        });
    }
}

/// Daily load for one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    /// Calendar date
    pub date: NaiveDate,
    /// Power (external) component
    pub power_load: f64,
    /// RPE (internal) component
    pub rpe_load: f64,
    /// Blended load fed to the score recursion
    pub load: f64,
}

/// Calculator for the hybrid daily load model
#[derive(Debug, Clone, Default)]
pub struct LoadCalculator {
    config: LoadModelConfig,
}

impl LoadCalculator {
    /// Create a calculator with the given model parameters
    #[must_use]
    pub const fn new(config: LoadModelConfig) -> Self {
        Self { config }
    }

    /// Model parameters in use
    #[must_use]
    pub const fn config(&self) -> &LoadModelConfig {
        &self.config
    }

    /// External load: `scale x hours x (power / baseline)^2`
    ///
    /// Zero if either power value is absent or non-positive.
    #[must_use]
    pub fn power_load(&self, duration_minutes: f64, avg_power: f64, baseline: f64) -> f64 {
        if avg_power <= 0.0 || baseline <= 0.0 || duration_minutes <= 0.0 {
            return 0.0;
        }
        let ratio = avg_power / baseline;
        self.config.power_load_scale * (duration_minutes / 60.0) * ratio * ratio
    }

    /// Internal load: `(rpe x minutes) / divisor`
    #[must_use]
    pub fn rpe_load(&self, duration_minutes: f64, avg_rpe: f64) -> f64 {
        if avg_rpe <= 0.0 || duration_minutes <= 0.0 {
            return 0.0;
        }
        avg_rpe * duration_minutes / self.config.rpe_divisor
    }

    /// Blend both components, using the present one at full weight when the other is zero
    #[must_use]
    pub fn blend(&self, power_load: f64, rpe_load: f64) -> f64 {
        match (power_load > 0.0, rpe_load > 0.0) {
            (true, true) => self
                .config
                .power_weight
                .mul_add(power_load, self.config.rpe_weight * rpe_load),
            (true, false) => power_load,
            (false, true) => rpe_load,
            (false, false) => 0.0,
        }
    }

    /// Daily load of one aggregate against a power baseline
    #[must_use]
    pub fn daily_load(&self, aggregate: &DailyAggregate, baseline: f64) -> DailyLoad {
        let power_load =
            self.power_load(aggregate.total_duration_minutes, aggregate.avg_power, baseline);
        let rpe_load = self.rpe_load(aggregate.total_duration_minutes, aggregate.avg_rpe);
        DailyLoad {
            date: aggregate.date,
            power_load,
            rpe_load,
            load: self.blend(power_load, rpe_load),
        }
    }

    /// Score a chronological series of aggregates, folding the power baseline as it goes
    ///
    /// Each day is scored against the baseline built from earlier days only.
    /// When no earlier powered day exists (and no seed was given) the day is
    /// scored against its own power. Aggregates must be sorted oldest first.
    #[must_use]
    pub fn daily_loads(
        &self,
        aggregates: &[DailyAggregate],
        baseline_seed: Option<f64>,
    ) -> Vec<DailyLoad> {
        let mut baseline = baseline_seed.map_or_else(
            || PowerBaseline::new(&self.config),
            |watts| PowerBaseline::seeded(&self.config, watts),
        );

        aggregates
            .iter()
            .map(|aggregate| {
                let reference = baseline.value().unwrap_or(aggregate.avg_power);
                let load = self.daily_load(aggregate, reference);
                baseline.update(aggregate.avg_power);
                load
            })
            .collect()
    }

    /// Load of a single synthetic session using its instantaneous power ratio
    ///
    /// Used by the simulator, which does not carry a rolling baseline.
    #[must_use]
    pub fn session_load(
        &self,
        duration_minutes: f64,
        power: f64,
        base_power: f64,
        rpe: f64,
    ) -> f64 {
        let power_load = self.power_load(duration_minutes, power, base_power);
        let rpe_load = self.rpe_load(duration_minutes, rpe);
        self.blend(power_load, rpe_load)
    }
}
