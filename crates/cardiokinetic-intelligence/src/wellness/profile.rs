// ABOUTME: Athlete response-pattern profiles that scale the wellness adjustment
// ABOUTME: Detection order is fixed so overlapping patterns resolve deterministically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use cardiokinetic_core::models::{QuestionId, QuestionnaireResponse};
use serde::{Deserialize, Serialize};

/// Rating at or below which an answer counts as low
const LOW_RATING: u8 = 2;

/// Rating at or above which an answer counts as high
const HIGH_RATING: u8 = 4;

/// Low answers needed for the honest-tired profile
const HONEST_TIRED_MIN_LOW: usize = 3;

/// Named response pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AthleteProfile {
    /// High motivation hiding low energy
    MaskedFatigue,
    /// Short sleep but high energy
    Resilient,
    /// High stress but high energy
    StressImmune,
    /// Several low answers reported plainly
    HonestTired,
    /// No pattern
    Normal,
}

impl AthleteProfile {
    /// Match a response against the profiles in precedence order
    #[must_use]
    pub fn detect(response: &QuestionnaireResponse) -> Self {
        let is_low = |id| response.rating(id).is_some_and(|r| r <= LOW_RATING);
        let is_high = |id| response.rating(id).is_some_and(|r| r >= HIGH_RATING);

        if is_high(QuestionId::Motivation) && is_low(QuestionId::Energy) {
            return Self::MaskedFatigue;
        }
        if is_low(QuestionId::SleepHours) && is_high(QuestionId::Energy) {
            return Self::Resilient;
        }
        if is_low(QuestionId::Stress) && is_high(QuestionId::Energy) {
            return Self::StressImmune;
        }
        let low_answers = response
            .responses
            .values()
            .filter(|rating| **rating <= LOW_RATING)
            .count();
        if low_answers >= HONEST_TIRED_MIN_LOW {
            return Self::HonestTired;
        }
        Self::Normal
    }

    /// Multiplier applied to the amplified impact
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        match self {
            Self::MaskedFatigue => 1.4,
            Self::Resilient => 0.8,
            Self::HonestTired => 1.2,
            Self::StressImmune | Self::Normal => 1.0,
        }
    }

    /// Stable profile name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MaskedFatigue => "masked_fatigue",
            Self::Resilient => "resilient",
            Self::StressImmune => "stress_immune",
            Self::HonestTired => "honest_tired",
            Self::Normal => "normal",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeMap;

    fn response(pairs: &[(QuestionId, u8)]) -> QuestionnaireResponse {
        QuestionnaireResponse::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            pairs.iter().copied().collect::<BTreeMap<_, _>>(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_masked_fatigue_wins_over_honest_tired() {
        let profile = AthleteProfile::detect(&response(&[
            (QuestionId::Motivation, 5),
            (QuestionId::Energy, 1),
            (QuestionId::SleepHours, 1),
            (QuestionId::Soreness, 2),
        ]));
        assert_eq!(profile, AthleteProfile::MaskedFatigue);
    }

    #[test]
    fn test_resilient_short_sleeper() {
        let profile = AthleteProfile::detect(&response(&[
            (QuestionId::SleepHours, 2),
            (QuestionId::Energy, 4),
        ]));
        assert_eq!(profile, AthleteProfile::Resilient);
        assert!((profile.multiplier() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unanswered_questions_never_match() {
        let profile = AthleteProfile::detect(&response(&[(QuestionId::Motivation, 5)]));
        assert_eq!(profile, AthleteProfile::Normal);
    }
}
