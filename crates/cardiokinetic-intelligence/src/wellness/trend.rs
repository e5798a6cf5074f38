// ABOUTME: Compares today's weighted questionnaire average with the trailing history
// ABOUTME: A sharp decline amplifies the adjustment; a sharp improvement dampens it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use cardiokinetic_core::models::QuestionnaireResponse;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::questions::weighted_average;
use crate::config::WellnessConfig;

/// Direction of today's answers against recent history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Today is markedly worse than the trailing average
    Declining,
    /// Today is markedly better than the trailing average
    Improving,
    /// Within the trend threshold
    Stable,
    /// Fewer prior responses than the minimum history
    InsufficientHistory,
}

/// Outcome of trend analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Multiplier applied to the amplified impact
    pub multiplier: f64,
    /// Detected direction
    pub direction: TrendDirection,
    /// Today's weighted average rating
    pub today_average: Option<f64>,
    /// Mean weighted average of the prior responses used
    pub historical_average: Option<f64>,
    /// Number of prior responses used
    pub history_days: usize,
}

/// First day of the trailing history window ending before `date`
#[must_use]
pub fn history_window_start(date: NaiveDate, history_days: usize) -> NaiveDate {
    date.checked_sub_days(Days::new(history_days as u64))
        .unwrap_or(NaiveDate::MIN)
}

/// Compare today's response with the responses of the previous
/// `trend_history_days` calendar days
///
/// The window is `today - trend_history_days <= date < today`; older
/// responses never count as recent history.
#[must_use]
pub fn analyze_trend(
    today: &QuestionnaireResponse,
    history: &[QuestionnaireResponse],
    config: &WellnessConfig,
) -> TrendResult {
    let today_average = weighted_average(today);

    let window_start = history_window_start(today.date, config.trend_history_days);
    let averages: Vec<f64> = history
        .iter()
        .filter(|response| response.date >= window_start && response.date < today.date)
        .filter_map(weighted_average)
        .collect();

    let history_days = averages.len();
    let historical_average =
        (history_days > 0).then(|| averages.iter().sum::<f64>() / history_days as f64);

    let (multiplier, direction) = match (today_average, historical_average) {
        (Some(current), Some(past)) if history_days >= config.trend_min_history => {
            let delta = current - past;
            if delta <= -config.trend_threshold {
                (config.trend_declining_multiplier, TrendDirection::Declining)
            } else if delta >= config.trend_threshold {
                (config.trend_improving_multiplier, TrendDirection::Improving)
            } else {
                (1.0, TrendDirection::Stable)
            }
        }
        _ => (1.0, TrendDirection::InsufficientHistory),
    };

    TrendResult {
        multiplier,
        direction,
        today_average,
        historical_average,
        history_days,
    }
}
