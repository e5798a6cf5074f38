// ABOUTME: Questionnaire catalog with per-question weights, impacts, and physiological clusters
// ABOUTME: Also detects cross-cluster synergy when several clusters agree on an extreme direction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;

use cardiokinetic_core::constants::wellness::RATING_NEUTRAL;
use cardiokinetic_core::models::{QuestionId, QuestionnaireResponse};
use serde::{Deserialize, Serialize};

use crate::config::WellnessConfig;

/// Physiological grouping of questionnaire items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cluster {
    /// Sleep duration and quality
    Sleep,
    /// Energy and soreness
    Physical,
    /// Stress, mood, and motivation
    Mental,
    /// Fuelling
    Nutrition,
}

impl Cluster {
    /// All clusters
    pub const ALL: [Self; 4] = [Self::Sleep, Self::Physical, Self::Mental, Self::Nutrition];
}

/// Fixed scoring parameters of one questionnaire item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionWeighting {
    /// Item
    pub id: QuestionId,
    /// Weight in the daily weighted average (weights sum to 1)
    pub weight: f64,
    /// Readiness points per unit of normalized deviation
    pub readiness_impact: f64,
    /// Fatigue points per unit of normalized deviation
    pub fatigue_impact: f64,
    /// Physiological cluster
    pub cluster: Cluster,
}

const fn weighting(
    id: QuestionId,
    weight: f64,
    readiness_impact: f64,
    fatigue_impact: f64,
    cluster: Cluster,
) -> QuestionWeighting {
    QuestionWeighting {
        id,
        weight,
        readiness_impact,
        fatigue_impact,
        cluster,
    }
}

/// Scoring catalog, one entry per [`QuestionId`]
pub const CATALOG: [QuestionWeighting; 8] = [
    weighting(QuestionId::SleepHours, 0.15, 1.0, 0.8, Cluster::Sleep),
    weighting(QuestionId::SleepQuality, 0.15, 1.0, 0.7, Cluster::Sleep),
    weighting(QuestionId::Energy, 0.15, 1.0, 1.0, Cluster::Physical),
    weighting(QuestionId::Soreness, 0.15, 0.7, 1.0, Cluster::Physical),
    weighting(QuestionId::Stress, 0.10, 0.7, 0.4, Cluster::Mental),
    weighting(QuestionId::Mood, 0.10, 0.6, 0.3, Cluster::Mental),
    weighting(QuestionId::Motivation, 0.10, 0.6, 0.4, Cluster::Mental),
    weighting(QuestionId::Nutrition, 0.10, 0.4, 0.4, Cluster::Nutrition),
];

/// Catalog entry for a question
#[must_use]
pub fn question_weighting(id: QuestionId) -> &'static QuestionWeighting {
    // CATALOG is declared in QuestionId::ALL order
    &CATALOG[id as usize]
}

/// Deviation from neutral scaled to `[-1, 1]`; positive is favourable
#[must_use]
pub fn normalized_deviation(rating: u8) -> f64 {
    (f64::from(rating) - RATING_NEUTRAL) / 2.0
}

/// Superlinear amplification of a deviation, `1 + (|v - 3| / 2)^k`
#[must_use]
pub fn amplifier(rating: u8, exponent: f64) -> f64 {
    1.0 + normalized_deviation(rating).abs().powf(exponent)
}

/// Catalog-weighted average rating over the answered questions
#[must_use]
pub fn weighted_average(response: &QuestionnaireResponse) -> Option<f64> {
    let (sum, weight) = response
        .responses
        .iter()
        .fold((0.0, 0.0), |(sum, weight), (id, rating)| {
            let item = question_weighting(*id);
            (item.weight.mul_add(f64::from(*rating), sum), weight + item.weight)
        });
    (weight > 0.0).then(|| sum / weight)
}

/// Sign of an adjustment relative to neutral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Worse than neutral
    Negative,
    /// Better than neutral
    Positive,
}

/// Outcome of cross-cluster synergy detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynergyResult {
    /// Multiplier applied to the amplified impact
    pub multiplier: f64,
    /// Net number of clusters agreeing on an extreme direction
    pub aligned_clusters: u32,
    /// Direction the aligned clusters agree on
    pub direction: Option<Direction>,
}

/// Count clusters whose mean rating is extreme and compound when they agree
///
/// Extremes in opposite directions cancel one for one.
#[must_use]
pub fn detect_synergy(response: &QuestionnaireResponse, config: &WellnessConfig) -> SynergyResult {
    let mut negative = 0_u32;
    let mut positive = 0_u32;

    for cluster in Cluster::ALL {
        let ratings: Vec<f64> = response
            .responses
            .iter()
            .filter(|(id, _)| question_weighting(**id).cluster == cluster)
            .map(|(_, rating)| f64::from(*rating))
            .collect();
        if ratings.is_empty() {
            continue;
        }
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        if mean <= config.cluster_extreme_low {
            negative += 1;
        } else if mean >= config.cluster_extreme_high {
            positive += 1;
        }
    }

    let (aligned_clusters, direction) = match negative.cmp(&positive) {
        Ordering::Greater => (negative - positive, Some(Direction::Negative)),
        Ordering::Less => (positive - negative, Some(Direction::Positive)),
        Ordering::Equal => (0, None),
    };

    let multiplier = if aligned_clusters >= 3 {
        config.synergy_three_clusters
    } else if aligned_clusters >= 2 {
        config.synergy_two_clusters
    } else {
        1.0
    };

    SynergyResult {
        multiplier,
        aligned_clusters,
        direction,
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
    fn test_catalog_order_matches_question_ids() {
        for id in QuestionId::ALL {
            assert_eq!(question_weighting(id).id, id);
        }
        let weights: f64 = CATALOG.iter().map(|item| item.weight).sum();
        assert!((weights - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_amplifier_shape() {
        assert!((amplifier(3, 1.5) - 1.0).abs() < f64::EPSILON);
        assert!((amplifier(1, 1.5) - 2.0).abs() < f64::EPSILON);
        assert!((amplifier(4, 1.5) - 1.353_553).abs() < 1e-6);
    }

    #[test]
    fn test_conflicting_extremes_do_not_compound() {
        let config = WellnessConfig::default();
        let mixed = response(&[
            (QuestionId::SleepHours, 1),
            (QuestionId::SleepQuality, 1),
            (QuestionId::Energy, 5),
            (QuestionId::Soreness, 5),
        ]);
        let synergy = detect_synergy(&mixed, &config);
        assert_eq!(synergy.aligned_clusters, 0);
        assert!((synergy.multiplier - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_two_aligned_clusters() {
        let config = WellnessConfig::default();
        let tired = response(&[
            (QuestionId::SleepHours, 1),
            (QuestionId::SleepQuality, 2),
            (QuestionId::Energy, 1),
            (QuestionId::Soreness, 1),
            (QuestionId::Mood, 3),
        ]);
        let synergy = detect_synergy(&tired, &config);
        assert_eq!(synergy.aligned_clusters, 2);
        assert_eq!(synergy.direction, Some(Direction::Negative));
        assert!((synergy.multiplier - 1.25).abs() < f64::EPSILON);
    }
}
