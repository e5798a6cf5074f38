// ABOUTME: Integration tests for the questionnaire-driven wellness adjustment layer
// ABOUTME: Covers neutral and extreme answers, cascade caps, trends, profiles, and clamping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::BTreeMap;

use cardiokinetic::intelligence::config::WellnessConfig;
use cardiokinetic::intelligence::wellness::{
    apply_cascades, AthleteProfile, TrendDirection,
};
use cardiokinetic::intelligence::WellnessAdjuster;
use cardiokinetic::models::{QuestionId, QuestionnaireResponse};
use chrono::{NaiveDate, Utc};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn uniform(d: u32, rating: u8) -> QuestionnaireResponse {
    let responses: BTreeMap<_, _> = QuestionId::ALL.iter().map(|id| (*id, rating)).collect();
    QuestionnaireResponse::new(date(d), responses, Utc::now()).unwrap()
}

#[test]
fn test_neutral_answers_change_nothing() {
    let adjusted = WellnessAdjuster::default().adjust(47.0, 63.0, Some(&uniform(10, 3)), &[]);
    assert!((adjusted.fatigue - 47.0).abs() < f64::EPSILON);
    assert!((adjusted.readiness - 63.0).abs() < f64::EPSILON);
    let breakdown = adjusted.breakdown.unwrap();
    assert_eq!(breakdown.profile, AthleteProfile::Normal);
    assert!(breakdown.cascade.triggered.is_empty());
}

#[test]
fn test_all_lowest_answers_lower_readiness_and_raise_fatigue() {
    let adjusted = WellnessAdjuster::default().adjust(50.0, 50.0, Some(&uniform(10, 1)), &[]);
    assert!(
        adjusted.readiness_change < -15.0,
        "readiness change {}",
        adjusted.readiness_change
    );
    assert!(adjusted.fatigue_change > 0.0);
    assert!(adjusted.readiness < 50.0);
    assert!(adjusted.fatigue > 50.0);
    assert!(adjusted.breakdown.unwrap().risk_bias_applied);
}

#[test]
fn test_all_highest_answers_raise_readiness() {
    let adjusted = WellnessAdjuster::default().adjust(50.0, 50.0, Some(&uniform(10, 5)), &[]);
    assert!(
        adjusted.readiness_change > 8.0 && adjusted.readiness_change < 25.0,
        "readiness change {}",
        adjusted.readiness_change
    );
    assert!(adjusted.fatigue_change < 0.0);
    assert!(adjusted.readiness > 50.0);
}

#[test]
fn test_negative_answers_weigh_more_than_positive() {
    let adjuster = WellnessAdjuster::default();
    let worse = adjuster.adjust(50.0, 50.0, Some(&uniform(10, 1)), &[]);
    let better = adjuster.adjust(50.0, 50.0, Some(&uniform(10, 5)), &[]);
    assert!(worse.readiness_change.abs() >= better.readiness_change.abs());
}

#[test]
fn test_cascade_totals_cap_at_eight_and_five() {
    let result = apply_cascades(&uniform(10, 1), &WellnessConfig::default());
    assert!(result.raw_fatigue > 8.0);
    assert!((result.fatigue - 8.0).abs() < f64::EPSILON);
    assert!((result.readiness + 5.0).abs() < f64::EPSILON);
    assert_eq!(result.triggered.len(), 6);
}

#[test]
fn test_declining_trend_amplifies() {
    let history: Vec<_> = (1..=5).map(|d| uniform(d, 4)).collect();
    let today = uniform(8, 2);
    let adjuster = WellnessAdjuster::default();

    let with_history = adjuster.adjust(50.0, 50.0, Some(&today), &history);
    let without_history = adjuster.adjust(50.0, 50.0, Some(&today), &[]);

    let trend = with_history.breakdown.as_ref().unwrap().trend;
    assert_eq!(trend.direction, TrendDirection::Declining);
    assert!(with_history.readiness_change <= without_history.readiness_change);
}

#[test]
fn test_short_history_has_no_trend() {
    let history = vec![uniform(6, 5), uniform(7, 5)];
    let adjusted = WellnessAdjuster::default().adjust(50.0, 50.0, Some(&uniform(8, 1)), &history);
    let trend = adjusted.breakdown.unwrap().trend;
    assert_eq!(trend.direction, TrendDirection::InsufficientHistory);
    assert!((trend.multiplier - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_stale_history_has_no_trend() {
    let history: Vec<_> = [(1, 2), (1, 10), (1, 20)]
        .into_iter()
        .map(|(month, day)| {
            let responses: BTreeMap<_, _> = QuestionId::ALL.iter().map(|id| (*id, 5)).collect();
            let on = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
            QuestionnaireResponse::new(on, responses, Utc::now()).unwrap()
        })
        .collect();
    let adjuster = WellnessAdjuster::default();

    let with_history = adjuster.adjust(50.0, 50.0, Some(&uniform(1, 2)), &history);
    let without_history = adjuster.adjust(50.0, 50.0, Some(&uniform(1, 2)), &[]);

    let trend = with_history.breakdown.as_ref().unwrap().trend;
    assert_eq!(trend.direction, TrendDirection::InsufficientHistory);
    assert!((trend.multiplier - 1.0).abs() < f64::EPSILON);
    assert!((with_history.readiness_change - without_history.readiness_change).abs() < 1e-9);
}

#[test]
fn test_masked_fatigue_profile_detected() {
    let response = QuestionnaireResponse::new(
        date(10),
        BTreeMap::from([(QuestionId::Motivation, 5), (QuestionId::Energy, 1)]),
        Utc::now(),
    )
    .unwrap();
    let adjusted = WellnessAdjuster::default().adjust(40.0, 70.0, Some(&response), &[]);
    assert_eq!(
        adjusted.breakdown.unwrap().profile,
        AthleteProfile::MaskedFatigue
    );
}

#[test]
fn test_scores_never_leave_range() {
    let adjuster = WellnessAdjuster::default();
    let low = adjuster.adjust(99.0, 2.0, Some(&uniform(10, 1)), &[]);
    let high = adjuster.adjust(1.0, 99.0, Some(&uniform(10, 5)), &[]);
    for score in [low.fatigue, low.readiness, high.fatigue, high.readiness] {
        assert!((0.0..=100.0).contains(&score));
    }
}

#[test]
fn test_out_of_scale_rating_rejected() {
    let result = QuestionnaireResponse::parse("2024-06-10", [("energy", 6)], Utc::now());
    assert!(result.is_err());
    let result = QuestionnaireResponse::parse("10/06/2024", [("energy", 3)], Utc::now());
    assert!(result.is_err());
}
