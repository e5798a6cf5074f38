// ABOUTME: Integration tests for fatigue modifier generation from simulated cycle analysis
// ABOUTME: Checks priority ordering, recovery-phase restraint, and runtime selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use cardiokinetic::intelligence::{
    select_modifier, CycleAnalysis, CycleAnalyzer, ModifierGenerator, MonteCarloSimulator,
};
use cardiokinetic::models::{
    CyclePhase, FatigueModifier, ModifierContext, SessionStyle, WeekPosition,
};

use common::{periodized_plan, seeded_config};

fn generated() -> (CycleAnalysis, Vec<FatigueModifier>) {
    let config = seeded_config(300, 31);
    let plan = periodized_plan();
    let result = MonteCarloSimulator::new(&config).simulate(&plan).unwrap();
    let analysis = CycleAnalyzer::new(config.cycles)
        .analyze(&plan, &result)
        .unwrap();
    let modifiers = ModifierGenerator::generate(&analysis);
    (analysis, modifiers)
}

#[test]
fn test_priorities_are_sequential() {
    let (_, modifiers) = generated();
    assert!(modifiers.len() >= 5);
    for (index, modifier) in modifiers.iter().enumerate() {
        assert_eq!(modifier.priority, index as u32 + 1);
        assert!(!modifier.adjustments.message.is_empty());
    }
}

#[test]
fn test_recovery_phases_never_push() {
    let (_, modifiers) = generated();
    let recovery = modifiers.iter().filter(|modifier| {
        matches!(
            modifier.cycle_phase,
            Some(CyclePhase::Descending | CyclePhase::Trough)
        )
    });
    for modifier in recovery {
        assert!(modifier.adjustments.power_multiplier.unwrap_or(1.0) <= 1.0);
    }
}

#[test]
fn test_fresh_athlete_is_not_pushed_in_recovery_weeks() {
    let (_, modifiers) = generated();
    for phase in [CyclePhase::Descending, CyclePhase::Trough] {
        for style in [SessionStyle::SteadyState, SessionStyle::Interval] {
            let mut context = ModifierContext::scores(30.0, 75.0);
            context.cycle_phase = Some(phase);
            context.phase_name = Some("Base".to_owned());
            context.session_type = Some(style);
            context.week_position = Some(WeekPosition::Late);

            if let Some(selected) = select_modifier(&modifiers, &context) {
                assert!(
                    selected.adjustments.power_multiplier.unwrap_or(1.0) <= 1.0,
                    "{phase} week pushed by: {}",
                    selected.adjustments.message
                );
                assert!(selected.adjustments.rpe_delta.unwrap_or(0.0) <= 0.0);
            }
        }
    }
}

#[test]
fn test_fresh_athlete_is_pushed_while_building() {
    let (_, modifiers) = generated();
    let mut context = ModifierContext::scores(30.0, 75.0);
    context.cycle_phase = Some(CyclePhase::Ascending);
    let selected = select_modifier(&modifiers, &context).unwrap();
    assert!(selected.progression_only);
    assert!(selected.adjustments.power_multiplier.unwrap_or(1.0) > 1.0);
}

#[test]
fn test_safety_net_wins_when_overreached() {
    let (_, modifiers) = generated();
    let mut context = ModifierContext::scores(92.0, 20.0);
    context.cycle_phase = Some(CyclePhase::Peak);
    context.phase_name = Some("Peak".to_owned());

    let selected = select_modifier(&modifiers, &context).unwrap();
    assert_eq!(selected.priority, 1);
    assert_eq!(selected.adjustments.power_multiplier, Some(0.75));
}

#[test]
fn test_low_readiness_net_reduces_volume() {
    let (_, modifiers) = generated();
    let selected = select_modifier(&modifiers, &ModifierContext::scores(50.0, 15.0)).unwrap();
    assert_eq!(selected.priority, 2);
    assert_eq!(selected.adjustments.volume_multiplier, Some(0.7));
}

#[test]
fn test_selection_returns_lowest_matching_priority() {
    let (_, modifiers) = generated();
    let context = ModifierContext::scores(80.0, 30.0);
    let selected = select_modifier(&modifiers, &context).unwrap();
    let lowest = modifiers
        .iter()
        .filter(|modifier| modifier.matches(&context))
        .map(|modifier| modifier.priority)
        .min();
    assert_eq!(Some(selected.priority), lowest);
}

#[test]
fn test_phase_scoped_modifiers_use_observed_phases() {
    let (analysis, modifiers) = generated();
    for modifier in &modifiers {
        if let Some(phase) = modifier.cycle_phase {
            assert!(analysis.phase_bands.contains_key(&phase));
        }
        if let Some(name) = &modifier.phase_name {
            assert!(analysis
                .named_phase_bands
                .iter()
                .any(|(observed, _)| observed == name));
        }
    }
}
