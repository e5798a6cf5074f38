// ABOUTME: Wellness layer that perturbs live fatigue/readiness with questionnaire answers
// ABOUTME: Composes non-linear scaling, synergy, trend, cascades, and athlete profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Wellness Adjustment Layer
//!
//! Each answered question contributes a signed base impact proportional to its
//! deviation from neutral. The layers combine as
//!
//! ```text
//! amplified = sum(base_q x amplifier_q) x synergy x trend x profile
//! biased    = amplified x 1.2 when the adjustment is worse than neutral
//! capped    = biased limited to 2.5 x sum(|base_q|)
//! change    = capped + capped cascade boosts
//! ```
//!
//! and the final scores are clamped to `[0, 100]`. Without a response the
//! scores pass through unchanged.

pub mod cascade;
pub mod profile;
pub mod questions;
pub mod trend;

pub use cascade::{apply_cascades, CascadeResult, CascadeRule, CASCADE_RULES};
pub use profile::AthleteProfile;
pub use questions::{
    detect_synergy, question_weighting, weighted_average, Cluster, Direction, QuestionWeighting,
    SynergyResult, CATALOG,
};
pub use trend::{analyze_trend, history_window_start, TrendDirection, TrendResult};

use cardiokinetic_core::models::QuestionnaireResponse;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WellnessConfig;
use crate::scoring::clamp_score;
use questions::{amplifier, normalized_deviation};

/// Per-layer contributions behind an adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessBreakdown {
    /// Sum of unamplified readiness impacts
    pub base_readiness: f64,
    /// Sum of unamplified fatigue impacts
    pub base_fatigue: f64,
    /// Readiness impact after per-question amplification
    pub nonlinear_readiness: f64,
    /// Fatigue impact after per-question amplification
    pub nonlinear_fatigue: f64,
    /// Cross-cluster synergy
    pub synergy: SynergyResult,
    /// Trend against recent history
    pub trend: TrendResult,
    /// Matched athlete profile
    pub profile: AthleteProfile,
    /// Whether the risk bias amplified either score
    pub risk_bias_applied: bool,
    /// Whether the multiplier cap limited either score
    pub capped: bool,
    /// Cascade boosts
    pub cascade: CascadeResult,
}

/// Adjusted scores and the changes applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessAdjustment {
    /// Adjusted fatigue score, 0-100
    pub fatigue: f64,
    /// Adjusted readiness score, 0-100
    pub readiness: f64,
    /// Signed fatigue change before clamping
    pub fatigue_change: f64,
    /// Signed readiness change before clamping
    pub readiness_change: f64,
    /// Layer breakdown; absent when no response was given
    pub breakdown: Option<WellnessBreakdown>,
}

impl WellnessAdjustment {
    /// Scores passed through without adjustment
    #[must_use]
    pub const fn unchanged(fatigue: f64, readiness: f64) -> Self {
        Self {
            fatigue,
            readiness,
            fatigue_change: 0.0,
            readiness_change: 0.0,
            breakdown: None,
        }
    }
}

#[derive(Debug, Default)]
struct ImpactTotals {
    base: f64,
    amplified: f64,
    magnitude: f64,
}

/// Applies questionnaire answers to live scores
#[derive(Debug, Clone, Default)]
pub struct WellnessAdjuster {
    config: WellnessConfig,
}

impl WellnessAdjuster {
    /// Create an adjuster with the given parameters
    #[must_use]
    pub const fn new(config: WellnessConfig) -> Self {
        Self { config }
    }

    /// Adjust `(fatigue, readiness)` with today's response and prior history
    ///
    /// `history` may contain any responses; only those dated before today's
    /// response are used for trend analysis.
    #[must_use]
    pub fn adjust(
        &self,
        fatigue: f64,
        readiness: f64,
        today: Option<&QuestionnaireResponse>,
        history: &[QuestionnaireResponse],
    ) -> WellnessAdjustment {
        let Some(response) = today else {
            return WellnessAdjustment::unchanged(fatigue, readiness);
        };

        let mut readiness_totals = ImpactTotals::default();
        let mut fatigue_totals = ImpactTotals::default();
        for (id, rating) in &response.responses {
            let item = question_weighting(*id);
            let deviation = normalized_deviation(*rating);
            let amp = amplifier(*rating, self.config.amplifier_exponent);

            let readiness_impact = deviation * item.readiness_impact;
            readiness_totals.base += readiness_impact;
            readiness_totals.amplified += readiness_impact * amp;
            readiness_totals.magnitude += readiness_impact.abs();

            // Favourable answers lower fatigue
            let fatigue_impact = -deviation * item.fatigue_impact;
            fatigue_totals.base += fatigue_impact;
            fatigue_totals.amplified += fatigue_impact * amp;
            fatigue_totals.magnitude += fatigue_impact.abs();
        }

        let synergy = detect_synergy(response, &self.config);
        let trend = analyze_trend(response, history, &self.config);
        let profile = AthleteProfile::detect(response);
        let layered = synergy.multiplier * trend.multiplier * profile.multiplier();

        let mut readiness_change = readiness_totals.amplified * layered;
        let mut fatigue_change = fatigue_totals.amplified * layered;

        let mut risk_bias_applied = false;
        if readiness_change < 0.0 {
            readiness_change *= self.config.risk_bias;
            risk_bias_applied = true;
        }
        if fatigue_change > 0.0 {
            fatigue_change *= self.config.risk_bias;
            risk_bias_applied = true;
        }

        let readiness_limit = self.config.multiplier_cap * readiness_totals.magnitude;
        let fatigue_limit = self.config.multiplier_cap * fatigue_totals.magnitude;
        let capped =
            readiness_change.abs() > readiness_limit || fatigue_change.abs() > fatigue_limit;
        readiness_change = readiness_change.clamp(-readiness_limit, readiness_limit);
        fatigue_change = fatigue_change.clamp(-fatigue_limit, fatigue_limit);

        let cascade = apply_cascades(response, &self.config);
        readiness_change += cascade.readiness;
        fatigue_change += cascade.fatigue;

        debug!(
            date = %response.date,
            profile = profile.as_str(),
            synergy = synergy.multiplier,
            trend = trend.multiplier,
            cascades = cascade.triggered.len(),
            readiness_change,
            fatigue_change,
            "Applied wellness adjustment"
        );

        WellnessAdjustment {
            fatigue: clamp_score(fatigue + fatigue_change),
            readiness: clamp_score(readiness + readiness_change),
            fatigue_change,
            readiness_change,
            breakdown: Some(WellnessBreakdown {
                base_readiness: readiness_totals.base,
                base_fatigue: fatigue_totals.base,
                nonlinear_readiness: readiness_totals.amplified,
                nonlinear_fatigue: fatigue_totals.amplified,
                synergy,
                trend,
                profile,
                risk_bias_applied,
                capped,
                cascade,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cardiokinetic_core::models::QuestionId;
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeMap;

    fn uniform(rating: u8) -> QuestionnaireResponse {
        let responses: BTreeMap<_, _> = QuestionId::ALL.iter().map(|id| (*id, rating)).collect();
        QuestionnaireResponse::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            responses,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_no_response_passes_through() {
        let adjusted = WellnessAdjuster::default().adjust(42.0, 61.0, None, &[]);
        assert!((adjusted.fatigue - 42.0).abs() < f64::EPSILON);
        assert!((adjusted.readiness - 61.0).abs() < f64::EPSILON);
        assert!(adjusted.breakdown.is_none());
    }

    #[test]
    fn test_all_positive_is_calibrated() {
        let adjusted = WellnessAdjuster::default().adjust(50.0, 50.0, Some(&uniform(5)), &[]);
        assert!(adjusted.readiness_change > 8.0 && adjusted.readiness_change < 25.0);
        assert!(adjusted.fatigue_change < 0.0);
        let breakdown = adjusted.breakdown.unwrap();
        assert!(breakdown.capped);
        assert!(!breakdown.risk_bias_applied);
    }

    #[test]
    fn test_scores_stay_clamped() {
        let adjusted = WellnessAdjuster::default().adjust(98.0, 3.0, Some(&uniform(1)), &[]);
        assert!((adjusted.fatigue - 100.0).abs() < f64::EPSILON);
        assert!(adjusted.readiness.abs() < f64::EPSILON);
    }
}
