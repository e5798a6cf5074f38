// ABOUTME: Integration tests for the hybrid power/RPE daily load model
// ABOUTME: Covers the reference day, component fallbacks, aggregation, and baseline ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use cardiokinetic::intelligence::load::aggregate_sessions;
use cardiokinetic::intelligence::LoadCalculator;
use cardiokinetic::models::Session;
use chrono::NaiveDate;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
}

#[test]
fn test_reference_day_at_baseline_power() {
    // 60 min at baseline power: power load 100, RPE load 7 x 60 / 4 = 105
    let calculator = LoadCalculator::default();
    let aggregates = aggregate_sessions(&[Session::new(day(1), 60.0, 7.0).with_power(150.0)]);
    let loads = calculator.daily_loads(&aggregates, Some(150.0));

    assert_eq!(loads.len(), 1);
    assert!((loads[0].power_load - 100.0).abs() < 1e-9);
    assert!((loads[0].rpe_load - 105.0).abs() < 1e-9);
    assert!((loads[0].load - 102.0).abs() < 1e-9);
}

#[test]
fn test_zero_duration_is_zero_load() {
    let calculator = LoadCalculator::default();
    assert!(calculator.session_load(0.0, 200.0, 200.0, 8.0).abs() < f64::EPSILON);
    assert!(calculator.blend(0.0, 0.0).abs() < f64::EPSILON);
}

#[test]
fn test_rpe_only_day_uses_rpe_load() {
    let calculator = LoadCalculator::default();
    let aggregates = aggregate_sessions(&[Session::new(day(3), 40.0, 6.0)]);
    let loads = calculator.daily_loads(&aggregates, None);

    assert!(loads[0].power_load.abs() < f64::EPSILON);
    assert!((loads[0].load - 60.0).abs() < 1e-9);
}

#[test]
fn test_harder_power_costs_more() {
    let calculator = LoadCalculator::default();
    let easy = calculator.power_load(60.0, 150.0, 200.0);
    let hard = calculator.power_load(60.0, 250.0, 200.0);
    assert!(hard > easy);
    // Quadratic in the power ratio
    assert!((calculator.power_load(60.0, 400.0, 200.0) - 400.0).abs() < 1e-9);
}

#[test]
fn test_sessions_fold_into_one_aggregate_per_day() {
    let sessions = [
        Session::new(day(5), 30.0, 6.0),
        Session::new(day(2), 45.0, 5.0).with_power(180.0),
        Session::new(day(5), 30.0, 8.0).with_power(220.0),
    ];
    let aggregates = aggregate_sessions(&sessions);

    assert_eq!(aggregates.len(), 2);
    assert_eq!(aggregates[0].date, day(2));
    assert_eq!(aggregates[1].session_count, 2);
    assert!((aggregates[1].total_duration_minutes - 60.0).abs() < 1e-9);
}

#[test]
fn test_first_powered_day_is_scored_against_itself() {
    let calculator = LoadCalculator::default();
    let aggregates = aggregate_sessions(&[
        Session::new(day(1), 60.0, 7.0).with_power(200.0),
        Session::new(day(2), 60.0, 7.0).with_power(200.0),
    ]);
    let loads = calculator.daily_loads(&aggregates, None);

    assert!((loads[0].power_load - 100.0).abs() < 1e-9);
    assert!((loads[1].power_load - 100.0).abs() < 1e-9);
}
