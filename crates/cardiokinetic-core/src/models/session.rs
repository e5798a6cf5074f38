// ABOUTME: Workout session records and per-day aggregates built from them
// ABOUTME: Same-day sessions fold into duration-weighted averages of power and RPE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::load::{RPE_MAX, RPE_MIN};

/// A completed workout session, the source of all training load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Calendar date the session was performed
    pub date: NaiveDate,
    /// Session duration in minutes
    pub duration_minutes: f64,
    /// Average power in watts, if a power meter was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// Rating of perceived exertion, 1-10 in 0.5 steps
    pub rpe: f64,
}

impl Session {
    /// Create a session without power data
    #[must_use]
    pub const fn new(date: NaiveDate, duration_minutes: f64, rpe: f64) -> Self {
        Self {
            date,
            duration_minutes,
            power: None,
            rpe,
        }
    }

    /// Attach average power to the session
    #[must_use]
    pub fn with_power(mut self, watts: f64) -> Self {
        self.power = Some(watts);
        self
    }

    /// Power in watts when present and positive
    #[must_use]
    pub fn effective_power(&self) -> Option<f64> {
        self.power.filter(|watts| *watts > 0.0)
    }

    /// RPE snapped to the 0.5-step scale and clamped to 1-10
    #[must_use]
    pub fn normalized_rpe(&self) -> f64 {
        ((self.rpe * 2.0).round() / 2.0).clamp(RPE_MIN, RPE_MAX)
    }
}

/// One calendar day of training, folded from every session on that date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    /// Calendar date
    pub date: NaiveDate,
    /// Sum of session durations (minutes)
    pub total_duration_minutes: f64,
    /// Duration-weighted average power over sessions that reported power; 0 when none did
    pub avg_power: f64,
    /// Duration-weighted average RPE
    pub avg_rpe: f64,
    /// Number of sessions folded into this day
    pub session_count: u32,
    /// Minutes that carried power data (weighting denominator for `avg_power`)
    #[serde(default)]
    pub powered_minutes: f64,
}

impl DailyAggregate {
    /// Start an aggregate from the first session of the day
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        let mut aggregate = Self::empty(session.date);
        aggregate.add_session(session);
        aggregate
    }

    /// An aggregate for a day with no training
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_duration_minutes: 0.0,
            avg_power: 0.0,
            avg_rpe: 0.0,
            session_count: 0,
            powered_minutes: 0.0,
        }
    }

    /// Fold another same-day session into the running duration-weighted averages
    pub fn add_session(&mut self, session: &Session) {
        let minutes = session.duration_minutes.max(0.0);
        let new_total = self.total_duration_minutes + minutes;

        if new_total > 0.0 {
            self.avg_rpe = self
                .avg_rpe
                .mul_add(self.total_duration_minutes, session.normalized_rpe() * minutes)
                / new_total;
        }

        if let Some(watts) = session.effective_power() {
            let new_powered = self.powered_minutes + minutes;
            if new_powered > 0.0 {
                self.avg_power = self
                    .avg_power
                    .mul_add(self.powered_minutes, watts * minutes)
                    / new_powered;
            }
            self.powered_minutes = new_powered;
        }

        self.total_duration_minutes = new_total;
        self.session_count += 1;
    }

    /// Whether any session on this day reported power
    #[must_use]
    pub fn has_power(&self) -> bool {
        self.avg_power > 0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_same_day_sessions_are_duration_weighted() {
        let mut aggregate =
            DailyAggregate::from_session(&Session::new(day(), 30.0, 6.0).with_power(200.0));
        aggregate.add_session(&Session::new(day(), 90.0, 8.0).with_power(100.0));

        assert_eq!(aggregate.session_count, 2);
        assert!((aggregate.total_duration_minutes - 120.0).abs() < 1e-9);
        assert!((aggregate.avg_power - 125.0).abs() < 1e-9);
        assert!((aggregate.avg_rpe - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_power_average_ignores_sessions_without_power() {
        let mut aggregate = DailyAggregate::from_session(&Session::new(day(), 60.0, 5.0));
        aggregate.add_session(&Session::new(day(), 30.0, 7.0).with_power(180.0));

        assert!((aggregate.avg_power - 180.0).abs() < 1e-9);
        assert!((aggregate.powered_minutes - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_rpe_is_snapped_to_half_steps() {
        let session = Session::new(day(), 30.0, 6.7);
        assert!((session.normalized_rpe() - 6.5).abs() < 1e-9);
        assert!((Session::new(day(), 30.0, 14.0).normalized_rpe() - 10.0).abs() < 1e-9);
    }
}
