// ABOUTME: Live readiness path that turns stored history into today's adjusted scores
// ABOUTME: Reads sessions and questionnaires through the record store and runs the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Readiness service
//!
//! Each report recomputes the full metrics series from program start, so
//! inserting or editing a past session changes every later day.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::intelligence::load::aggregate_sessions;
use crate::intelligence::wellness::history_window_start;
use crate::intelligence::{
    EngineConfig, LoadCalculator, ScoreEngine, WellnessAdjuster, WellnessAdjustment,
};
use crate::logging::AppLogger;
use crate::models::{DailyMetrics, FatigueZone, ModifierContext, ReadinessZone};
use crate::store::TrainingRecordStore;

/// Scores for one day, before and after the wellness adjustment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    /// Target date
    pub date: NaiveDate,
    /// First day of the computed series
    pub program_start: NaiveDate,
    /// Unadjusted metrics for the target date
    pub metrics: DailyMetrics,
    /// Wellness-adjusted scores
    pub wellness: WellnessAdjustment,
    /// Interpretation of the adjusted readiness
    pub readiness_zone: ReadinessZone,
    /// Interpretation of the adjusted fatigue
    pub fatigue_zone: FatigueZone,
}

impl ReadinessReport {
    /// Adjusted fatigue score
    #[must_use]
    pub const fn fatigue(&self) -> f64 {
        self.wellness.fatigue
    }

    /// Adjusted readiness score
    #[must_use]
    pub const fn readiness(&self) -> f64 {
        self.wellness.readiness
    }

    /// Modifier context carrying the adjusted scores; callers add plan position
    #[must_use]
    pub const fn modifier_context(&self) -> ModifierContext {
        ModifierContext::scores(self.wellness.fatigue, self.wellness.readiness)
    }
}

/// Computes readiness reports from a record store
pub struct ReadinessService<S: TrainingRecordStore> {
    store: Arc<S>,
    config: EngineConfig,
    load: LoadCalculator,
    scores: ScoreEngine,
    wellness: WellnessAdjuster,
    base_power: Option<f64>,
    program_start: Option<NaiveDate>,
}

impl<S: TrainingRecordStore> ReadinessService<S> {
    /// Create a service over a store
    #[must_use]
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            load: LoadCalculator::new(config.load.clone()),
            scores: ScoreEngine::new(config.scores.clone()),
            wellness: WellnessAdjuster::new(config.wellness.clone()),
            config,
            base_power: None,
            program_start: None,
        }
    }

    /// Seed the power baseline with a known base power
    #[must_use]
    pub const fn with_base_power(mut self, watts: f64) -> Self {
        self.base_power = Some(watts);
        self
    }

    /// Start the series on a fixed date instead of the first stored session
    #[must_use]
    pub const fn with_program_start(mut self, start: NaiveDate) -> Self {
        self.program_start = Some(start);
        self
    }

    /// Full metrics series from program start through `target`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `target` precedes the program start, or a
    /// storage error from the record store
    pub fn series(&self, target: NaiveDate) -> AppResult<Vec<DailyMetrics>> {
        let start = self.resolve_start(target)?;
        let sessions = self.store.sessions_between(start, target)?;
        let aggregates = aggregate_sessions(&sessions);
        let loads = self.load.daily_loads(&aggregates, self.base_power);
        Ok(self.scores.compute_series(&loads, start, target))
    }

    /// Wellness-adjusted report for `target`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `target` precedes the program start, or a
    /// storage error from the record store
    pub fn report(&self, target: NaiveDate) -> AppResult<ReadinessReport> {
        let program_start = self.resolve_start(target)?;
        let metrics = self
            .series(target)?
            .pop()
            .ok_or_else(|| AppError::internal(format!("Empty metrics series for {target}")))?;

        let today = self.store.response_on(target)?;
        let window_start = history_window_start(target, self.config.wellness.trend_history_days);
        let history = self.store.responses_between(window_start, target)?;
        let wellness = self.wellness.adjust(
            metrics.fatigue_score,
            metrics.readiness_score,
            today.as_ref(),
            &history,
        );

        AppLogger::log_readiness(
            &target.to_string(),
            wellness.fatigue,
            wellness.readiness,
            wellness.breakdown.is_some(),
        );

        Ok(ReadinessReport {
            date: target,
            program_start,
            readiness_zone: ReadinessZone::from_score(wellness.readiness),
            fatigue_zone: FatigueZone::from_score(wellness.fatigue),
            metrics,
            wellness,
        })
    }

    fn resolve_start(&self, target: NaiveDate) -> AppResult<NaiveDate> {
        let start = match self.program_start {
            Some(start) => start,
            None => self.store.first_session_date()?.unwrap_or(target),
        };
        if start > target {
            return Err(AppError::invalid_input(format!(
                "Target date {target} precedes program start {start}"
            )));
        }
        Ok(start)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Session;
    use crate::store::InMemoryRecordStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_empty_store_reports_seed_scores() {
        let service = ReadinessService::new(
            Arc::new(InMemoryRecordStore::new()),
            EngineConfig::default(),
        );
        let report = service.report(day(10)).unwrap();
        assert_eq!(report.program_start, day(10));
        assert!(report.wellness.breakdown.is_none());
        assert!((0.0..=100.0).contains(&report.readiness()));
    }

    #[test]
    fn test_target_before_start_is_rejected() {
        let store =
            InMemoryRecordStore::with_sessions([Session::new(day(5), 60.0, 7.0)]).unwrap();
        let service = ReadinessService::new(Arc::new(store), EngineConfig::default());
        assert!(service.report(day(3)).is_err());
    }

    #[test]
    fn test_series_covers_every_day() {
        let store = InMemoryRecordStore::with_sessions([
            Session::new(day(1), 60.0, 7.0),
            Session::new(day(4), 45.0, 6.0),
        ])
        .unwrap();
        let service = ReadinessService::new(Arc::new(store), EngineConfig::default());
        let series = service.series(day(7)).unwrap();
        assert_eq!(series.len(), 7);
        assert!(series[1].daily_load.abs() < f64::EPSILON);
    }
}
