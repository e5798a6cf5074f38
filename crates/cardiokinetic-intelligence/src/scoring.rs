// ABOUTME: Dual-EWMA acute/chronic load recursion with logistic fatigue and Gaussian readiness
// ABOUTME: Advances one calendar day at a time; rest days still decay the state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Dual-EWMA Score Engine
//!
//! `atl' = atl x (1 - 2/8) + load x 2/8` and `ctl' = ctl x (1 - 2/43) + load x 2/43`.
//!
//! - Fatigue: `100 / (1 + e^(-4.5 x (ACWR - 1.15)))` with `ACWR = atl / max(ctl, 15)`
//! - Readiness: `100 x e^(-(TSB - 20)^2 / w)` with `w = 2000` at or above the
//!   optimum and `w = 1000` below it
//!
//! Both scores are rounded and clamped to `[0, 100]`. The recursion is a
//! non-commutative fold: reordering the same loads changes the result.

use std::collections::HashMap;

use cardiokinetic_core::constants::scores::{SCORE_MAX, SCORE_MIN};
use cardiokinetic_core::models::{DailyMetrics, ScoreState};
use chrono::NaiveDate;

use crate::config::ScoreModelConfig;
use crate::load::DailyLoad;

/// Round and clamp a raw score into `[0, 100]`
#[must_use]
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return SCORE_MIN;
    }
    raw.round().clamp(SCORE_MIN, SCORE_MAX)
}

/// Acute/chronic load recursion and score curves
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoreModelConfig,
}

impl ScoreEngine {
    /// Create an engine with the given model parameters
    #[must_use]
    pub const fn new(config: ScoreModelConfig) -> Self {
        Self { config }
    }

    /// Model parameters in use
    #[must_use]
    pub const fn config(&self) -> &ScoreModelConfig {
        &self.config
    }

    /// Advance the state by one day of load
    #[must_use]
    pub fn step(&self, state: ScoreState, load: f64) -> ScoreState {
        let atl_alpha = self.config.atl_alpha();
        let ctl_alpha = self.config.ctl_alpha();
        ScoreState {
            atl: load.mul_add(atl_alpha, state.atl * (1.0 - atl_alpha)),
            ctl: load.mul_add(ctl_alpha, state.ctl * (1.0 - ctl_alpha)),
        }
    }

    /// Fold a sequence of daily loads in order
    #[must_use]
    pub fn fold_loads(&self, seed: ScoreState, loads: &[f64]) -> ScoreState {
        loads
            .iter()
            .fold(seed, |state, &load| self.step(state, load))
    }

    /// Acute:chronic ratio with the CTL floor applied
    #[must_use]
    pub fn acwr(&self, atl: f64, ctl: f64) -> f64 {
        atl / ctl.max(self.config.ctl_floor)
    }

    /// Fatigue score from acute and chronic load
    #[must_use]
    pub fn fatigue_score(&self, atl: f64, ctl: f64) -> f64 {
        let acwr = self.acwr(atl, ctl);
        let exponent = -self.config.fatigue_steepness * (acwr - self.config.fatigue_midpoint);
        clamp_score(100.0 / (1.0 + exponent.exp()))
    }

    /// Readiness score from training stress balance
    #[must_use]
    pub fn readiness_score(&self, tsb: f64) -> f64 {
        let optimum = self.config.readiness_optimal_tsb;
        let width = if tsb >= optimum {
            self.config.readiness_width_detraining
        } else {
            self.config.readiness_width_overtraining
        };
        let offset = tsb - optimum;
        clamp_score(100.0 * (-(offset * offset) / width).exp())
    }

    /// Metrics record for a day whose load has already been folded into `state`
    #[must_use]
    pub fn metrics(&self, date: NaiveDate, daily_load: f64, state: ScoreState) -> DailyMetrics {
        let tsb = state.tsb();
        DailyMetrics {
            date,
            daily_load,
            atl: state.atl,
            ctl: state.ctl,
            acwr: self.acwr(state.atl, state.ctl),
            tsb,
            fatigue_score: self.fatigue_score(state.atl, state.ctl),
            readiness_score: self.readiness_score(tsb),
        }
    }

    /// One metrics record per calendar day from `start` through `end`, inclusive
    ///
    /// Days without a load entry are rest days with zero load. Loads dated
    /// outside the range are ignored. The series is recomputed from the live
    /// seed every call.
    #[must_use]
    pub fn compute_series(
        &self,
        loads: &[DailyLoad],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<DailyMetrics> {
        let by_date: HashMap<NaiveDate, f64> = loads
            .iter()
            .map(|daily| (daily.date, daily.load))
            .collect();

        let mut state = self.config.live_seed;
        start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| {
                let load = by_date.get(&date).copied().unwrap_or(0.0);
                state = self.step(state, load);
                self.metrics(date, load, state)
            })
            .collect()
    }

    /// Metrics for the last day of [`Self::compute_series`], if the range is non-empty
    #[must_use]
    pub fn metrics_on(
        &self,
        loads: &[DailyLoad],
        start: NaiveDate,
        target: NaiveDate,
    ) -> Option<DailyMetrics> {
        self.compute_series(loads, start, target).pop()
    }
}
