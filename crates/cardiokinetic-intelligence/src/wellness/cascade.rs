// ABOUTME: Fixed-point cascade rules fired by single extreme questionnaire answers
// ABOUTME: Triggered boosts sum and are capped before being added to the weighted adjustment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use cardiokinetic_core::models::{QuestionId, QuestionnaireResponse};
use serde::{Deserialize, Serialize};

use crate::config::WellnessConfig;

/// One cascade rule: an exact rating on one question adds fixed points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeRule {
    /// Question that triggers the rule
    pub question: QuestionId,
    /// Rating that triggers the rule
    pub rating: u8,
    /// Fatigue points added
    pub fatigue: f64,
    /// Readiness points added
    pub readiness: f64,
    /// Stable rule name
    pub name: &'static str,
}

const fn rule(
    question: QuestionId,
    rating: u8,
    fatigue: f64,
    readiness: f64,
    name: &'static str,
) -> CascadeRule {
    CascadeRule {
        question,
        rating,
        fatigue,
        readiness,
        name,
    }
}

/// Cascade rule table
pub const CASCADE_RULES: [CascadeRule; 10] = [
    rule(QuestionId::SleepHours, 1, 3.0, -2.0, "sleep_deprivation"),
    rule(QuestionId::SleepQuality, 1, 2.0, -2.0, "broken_sleep"),
    rule(QuestionId::Energy, 1, 3.0, -2.0, "exhaustion"),
    rule(QuestionId::Soreness, 1, 3.0, -1.0, "severe_soreness"),
    rule(QuestionId::Stress, 1, 2.0, -2.0, "acute_stress"),
    rule(QuestionId::Motivation, 1, 1.0, -2.0, "no_drive"),
    rule(QuestionId::Motivation, 5, -2.0, 2.0, "high_drive"),
    rule(QuestionId::Energy, 5, -2.0, 2.0, "peak_energy"),
    rule(QuestionId::SleepQuality, 5, -1.0, 1.0, "deep_sleep"),
    rule(QuestionId::Soreness, 5, -2.0, 1.0, "fully_recovered"),
];

/// Summed cascade boosts after capping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Capped fatigue boost
    pub fatigue: f64,
    /// Capped readiness boost
    pub readiness: f64,
    /// Fatigue boost before capping
    pub raw_fatigue: f64,
    /// Readiness boost before capping
    pub raw_readiness: f64,
    /// Names of the rules that fired
    pub triggered: Vec<String>,
}

/// Fire every matching rule, sum the boosts, and cap each total symmetrically
#[must_use]
pub fn apply_cascades(response: &QuestionnaireResponse, config: &WellnessConfig) -> CascadeResult {
    let mut result = CascadeResult::default();
    for cascade in CASCADE_RULES
        .iter()
        .filter(|cascade| response.answered(cascade.question, cascade.rating))
    {
        result.raw_fatigue += cascade.fatigue;
        result.raw_readiness += cascade.readiness;
        result.triggered.push(cascade.name.to_owned());
    }

    let fatigue_cap = config.cascade_fatigue_cap;
    let readiness_cap = config.cascade_readiness_cap;
    result.fatigue = result.raw_fatigue.clamp(-fatigue_cap, fatigue_cap);
    result.readiness = result.raw_readiness.clamp(-readiness_cap, readiness_cap);
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeMap;

    #[test]
    fn test_stacked_triggers_clamp_to_cap() {
        let responses = BTreeMap::from([
            (QuestionId::SleepHours, 1),
            (QuestionId::SleepQuality, 1),
            (QuestionId::Energy, 1),
            (QuestionId::Soreness, 1),
        ]);
        let response = QuestionnaireResponse::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            responses,
            Utc::now(),
        )
        .unwrap();

        let result = apply_cascades(&response, &WellnessConfig::default());
        assert!((result.raw_fatigue - 11.0).abs() < f64::EPSILON);
        assert!((result.fatigue - 8.0).abs() < f64::EPSILON);
        assert!((result.readiness + 5.0).abs() < f64::EPSILON);
        assert_eq!(result.triggered.len(), 4);
    }
}
