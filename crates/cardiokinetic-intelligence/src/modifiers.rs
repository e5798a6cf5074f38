// ABOUTME: Generates prioritized fatigue modifiers from a plan's cycle analysis
// ABOUTME: Safety nets, compound tiers, per-phase percentile tiers, trend, and session-style rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Modifier Generator
//!
//! Priorities are assigned from an ascending counter starting at 1, so the
//! order of generation is the order of precedence:
//!
//! 1. Absolute safety nets (fatigue above 85 or readiness below 25)
//! 2. Compound fatigue/readiness tiers
//! 3. Per cycle phase, extreme (P85/P15) then standard (P70/P30) bands
//! 4. Per named block when the plan has more than one
//! 5. Strong whole-plan adaptation trend
//! 6. Per session style
//!
//! Push-harder modifiers are never generated for descending or trough weeks,
//! and every push that is not scoped to a cycle phase is flagged
//! `progression_only` so it stays silent in those weeks.

use cardiokinetic_core::models::{
    Comparator, ConditionLogic, CyclePhase, FatigueModifier, ModifierAdjustments,
    ModifierCondition, ModifierContext, SessionStyle, WeekPosition,
};
use tracing::info;

use crate::cycles::{AdaptationDirection, CycleAnalysis, PhaseBand};

/// Fatigue above which the first safety net applies
const SAFETY_FATIGUE: f64 = 85.0;

/// Readiness below which the second safety net applies
const SAFETY_READINESS: f64 = 25.0;

/// Percentile tier of a band-relative modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    /// P85 / P15 thresholds
    Extreme,
    /// P70 / P30 thresholds
    Standard,
}

impl Tier {
    const fn label(self) -> &'static str {
        match self {
            Self::Extreme => "very",
            Self::Standard => "moderately",
        }
    }
}

/// Adjustment values without a message
#[derive(Debug, Clone, Copy, Default)]
struct Bundle {
    power: Option<f64>,
    volume: Option<f64>,
    rest: Option<f64>,
    duration: Option<f64>,
    rpe: Option<f64>,
}

impl Bundle {
    const fn power(value: f64) -> Self {
        Self {
            power: Some(value),
            volume: None,
            rest: None,
            duration: None,
            rpe: None,
        }
    }

    const fn volume(mut self, value: f64) -> Self {
        self.volume = Some(value);
        self
    }

    const fn rest(mut self, value: f64) -> Self {
        self.rest = Some(value);
        self
    }

    const fn duration(mut self, value: f64) -> Self {
        self.duration = Some(value);
        self
    }

    const fn rpe(mut self, value: f64) -> Self {
        self.rpe = Some(value);
        self
    }

    /// Plain-language directive such as "Target power at 92%, volume at 90%"
    fn directive(&self) -> String {
        let percent = |value: f64| (value * 100.0).round();
        let mut parts: Vec<String> = Vec::new();
        if let Some(power) = self.power {
            parts.push(format!("target power at {}%", percent(power)));
        }
        if let Some(volume) = self.volume {
            parts.push(format!("volume at {}%", percent(volume)));
        }
        if let Some(rest) = self.rest {
            parts.push(format!("rest periods at {}%", percent(rest)));
        }
        if let Some(duration) = self.duration {
            parts.push(format!("session duration at {}%", percent(duration)));
        }
        if let Some(rpe) = self.rpe {
            parts.push(format!("target RPE {rpe:+.1}"));
        }
        let text = parts.join(", ");
        let mut chars = text.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    fn into_adjustments(self, context: &str) -> ModifierAdjustments {
        ModifierAdjustments {
            power_multiplier: self.power,
            volume_multiplier: self.volume,
            rest_multiplier: self.rest,
            duration_multiplier: self.duration,
            rpe_delta: self.rpe,
            message: format!("{context}: {}", self.directive()),
        }
    }
}

/// Reduction bundle for a cycle phase
const fn backoff_bundle(phase: CyclePhase, tier: Tier) -> Bundle {
    match (phase, tier) {
        (CyclePhase::Ascending, Tier::Standard) => Bundle::power(0.95).rpe(-0.5),
        (CyclePhase::Ascending, Tier::Extreme) => Bundle::power(0.90).rpe(-1.0),
        (CyclePhase::Peak, Tier::Standard) => Bundle::power(0.92).volume(0.9),
        (CyclePhase::Peak, Tier::Extreme) => Bundle::power(0.85).volume(0.8),
        (CyclePhase::Descending, Tier::Standard) => Bundle::power(0.95).rest(1.2),
        (CyclePhase::Descending, Tier::Extreme) => Bundle::power(0.90).rest(1.4),
        (CyclePhase::Trough, Tier::Standard) => Bundle::power(0.95).volume(0.85),
        (CyclePhase::Trough, Tier::Extreme) => Bundle::power(0.90).volume(0.7),
    }
}

/// Progression bundle for a cycle phase; `None` where pushing is not allowed
const fn push_bundle(phase: CyclePhase, tier: Tier) -> Option<Bundle> {
    match (phase, tier) {
        (CyclePhase::Ascending, Tier::Standard) => Some(Bundle::power(1.03).rpe(0.5)),
        (CyclePhase::Ascending, Tier::Extreme) => Some(Bundle::power(1.05).rpe(0.5)),
        (CyclePhase::Peak, Tier::Standard) => Some(Bundle::power(1.02)),
        (CyclePhase::Peak, Tier::Extreme) => Some(Bundle::power(1.04)),
        (CyclePhase::Descending | CyclePhase::Trough, _) => None,
    }
}

/// High-fatigue or low-readiness condition relative to a band
fn high_condition(band: &PhaseBand, tier: Tier) -> ModifierCondition {
    let (fatigue, readiness) = match tier {
        Tier::Extreme => (band.fatigue.p85, band.readiness.p15),
        Tier::Standard => (band.fatigue.p70, band.readiness.p30),
    };
    ModifierCondition::both(
        Comparator::gt(fatigue.round()),
        Comparator::lt(readiness.round()),
        ConditionLogic::Or,
    )
}

/// Low-fatigue and high-readiness condition relative to a band
fn low_condition(band: &PhaseBand, tier: Tier) -> ModifierCondition {
    let (fatigue, readiness) = match tier {
        Tier::Extreme => (band.fatigue.p15, band.readiness.p85),
        Tier::Standard => (band.fatigue.p30, band.readiness.p70),
    };
    ModifierCondition::both(
        Comparator::lt(fatigue.round()),
        Comparator::gt(readiness.round()),
        ConditionLogic::And,
    )
}

/// Builds modifiers with ascending priorities
#[derive(Debug, Default)]
struct ModifierSet {
    modifiers: Vec<FatigueModifier>,
}

impl ModifierSet {
    fn push(
        &mut self,
        condition: ModifierCondition,
        bundle: Bundle,
        context: &str,
    ) -> &mut FatigueModifier {
        let priority = self.modifiers.len() as u32 + 1;
        self.modifiers.push(FatigueModifier {
            condition,
            adjustments: bundle.into_adjustments(context),
            priority,
            cycle_phase: None,
            phase_name: None,
            session_type: None,
            week_position: None,
            progression_only: false,
        });
        let last = self.modifiers.len() - 1;
        &mut self.modifiers[last]
    }

    /// Push-harder modifier that never matches in descending or trough weeks
    fn push_progression(
        &mut self,
        condition: ModifierCondition,
        bundle: Bundle,
        context: &str,
    ) -> &mut FatigueModifier {
        let modifier = self.push(condition, bundle, context);
        modifier.progression_only = true;
        modifier
    }
}

/// Generates fatigue modifiers from a cycle analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierGenerator;

impl ModifierGenerator {
    /// Generate the full prioritized modifier list
    #[must_use]
    pub fn generate(analysis: &CycleAnalysis) -> Vec<FatigueModifier> {
        let mut set = ModifierSet::default();

        Self::safety_nets(&mut set);
        Self::compound_tiers(&mut set);
        Self::cycle_phase_tiers(&mut set, analysis);
        Self::named_phase_tiers(&mut set, analysis);
        Self::trend_modifiers(&mut set, analysis);
        Self::session_style_modifiers(&mut set, analysis);

        info!(
            modifiers = set.modifiers.len(),
            phases = analysis.phase_bands.len(),
            named_phases = analysis.named_phase_bands.len(),
            "Generated fatigue modifiers"
        );
        set.modifiers
    }

    fn safety_nets(set: &mut ModifierSet) {
        set.push(
            ModifierCondition::fatigue(Comparator::gt(SAFETY_FATIGUE)),
            Bundle::power(0.75).volume(0.6).rpe(-1.5),
            "Critical fatigue",
        );
        set.push(
            ModifierCondition::readiness(Comparator::lt(SAFETY_READINESS)),
            Bundle::power(0.8).volume(0.7).rest(1.5),
            "Critical readiness",
        );
    }

    fn compound_tiers(set: &mut ModifierSet) {
        set.push(
            ModifierCondition::both(
                Comparator::gt(75.0),
                Comparator::lt(35.0),
                ConditionLogic::And,
            ),
            Bundle::power(0.85).volume(0.75).rest(1.3),
            "High fatigue with low readiness",
        );
        set.push(
            ModifierCondition::both(
                Comparator::gt(65.0),
                Comparator::lt(45.0),
                ConditionLogic::And,
            ),
            Bundle::power(0.9).volume(0.85),
            "Elevated fatigue with reduced readiness",
        );
        set.push_progression(
            ModifierCondition::both(
                Comparator::lt(35.0),
                Comparator::gt(70.0),
                ConditionLogic::And,
            ),
            Bundle::power(1.05).rpe(0.5),
            "Fresh and ready",
        );
    }

    fn cycle_phase_tiers(set: &mut ModifierSet, analysis: &CycleAnalysis) {
        for phase in CyclePhase::ALL {
            let Some(band) = analysis.phase_bands.get(&phase) else {
                continue;
            };
            for tier in [Tier::Extreme, Tier::Standard] {
                let context = format!("{} fatigued for a {phase} week", tier.label());
                set.push(high_condition(band, tier), backoff_bundle(phase, tier), &context)
                    .cycle_phase = Some(phase);

                if let Some(bundle) = push_bundle(phase, tier) {
                    let context = format!("{} fresh for a {phase} week", tier.label());
                    set.push_progression(low_condition(band, tier), bundle, &context)
                        .cycle_phase = Some(phase);
                }
            }
        }
    }

    fn named_phase_tiers(set: &mut ModifierSet, analysis: &CycleAnalysis) {
        if analysis.named_phase_bands.len() < 2 {
            return;
        }
        for (name, band) in &analysis.named_phase_bands {
            let allows_push = Self::dominant_phase(analysis, name)
                .is_some_and(|phase| phase.allows_progression());
            for tier in [Tier::Extreme, Tier::Standard] {
                let (backoff, push) = match tier {
                    Tier::Extreme => (Bundle::power(0.9).volume(0.8), Bundle::power(1.05)),
                    Tier::Standard => (Bundle::power(0.95).volume(0.9), Bundle::power(1.03)),
                };
                let context = format!("{} fatigued for {name}", tier.label());
                set.push(high_condition(band, tier), backoff, &context).phase_name =
                    Some(name.clone());

                if allows_push {
                    let context = format!("{} fresh for {name}", tier.label());
                    set.push_progression(low_condition(band, tier), push, &context)
                        .phase_name = Some(name.clone());
                }
            }
        }
    }

    /// Most frequent cycle phase among a named block's weeks
    fn dominant_phase(analysis: &CycleAnalysis, name: &str) -> Option<CyclePhase> {
        let mut counts = [0_usize; 4];
        for week in analysis.weeks.iter().filter(|w| w.phase_name == name) {
            counts[week.phase as usize] += 1;
        }
        CyclePhase::ALL
            .into_iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .max_by_key(|(_, count)| *count)
            .map(|(phase, _)| phase)
    }

    fn trend_modifiers(set: &mut ModifierSet, analysis: &CycleAnalysis) {
        if !analysis.trend.strong {
            return;
        }
        let fatigue_p30 = analysis.mean_of(|w| w.fatigue.p30).round();
        let fatigue_p70 = analysis.mean_of(|w| w.fatigue.p70).round();
        let readiness_p30 = analysis.mean_of(|w| w.readiness.p30).round();
        let readiness_p70 = analysis.mean_of(|w| w.readiness.p70).round();

        match analysis.trend.direction {
            AdaptationDirection::Improving => {
                set.push_progression(
                    ModifierCondition::both(
                        Comparator::lt(fatigue_p30),
                        Comparator::gt(readiness_p70),
                        ConditionLogic::And,
                    ),
                    Bundle::power(1.03),
                    "Adapting well across the plan",
                );
            }
            AdaptationDirection::Declining => {
                set.push(
                    ModifierCondition::both(
                        Comparator::gt(fatigue_p70),
                        Comparator::lt(readiness_p30),
                        ConditionLogic::Or,
                    ),
                    Bundle::default().volume(0.9).rest(1.2),
                    "Accumulating fatigue late in the plan",
                )
                .week_position = Some(WeekPosition::Late);
            }
            AdaptationDirection::Stable => {}
        }
    }

    fn session_style_modifiers(set: &mut ModifierSet, analysis: &CycleAnalysis) {
        let mut styles: Vec<SessionStyle> = Vec::new();
        for week in &analysis.weeks {
            if !styles.contains(&week.session_style) {
                styles.push(week.session_style);
            }
        }

        let fatigue_p30 = analysis.mean_of(|w| w.fatigue.p30).round();
        let fatigue_p70 = analysis.mean_of(|w| w.fatigue.p70).round();
        let readiness_p70 = analysis.mean_of(|w| w.readiness.p70).round();

        for style in styles {
            let (high, low) = match style {
                SessionStyle::Interval => {
                    (Bundle::default().rest(1.3), Bundle::default().rest(0.85))
                }
                SessionStyle::SteadyState => (
                    Bundle::default().duration(0.85),
                    Bundle::default().duration(1.1),
                ),
                SessionStyle::Custom => (
                    Bundle::default().rest(1.3).duration(0.85),
                    Bundle::default().rest(0.85).duration(1.1),
                ),
            };
            let context = format!("Fatigued {} session", style.label());
            set.push(
                ModifierCondition::fatigue(Comparator::gt(fatigue_p70)),
                high,
                &context,
            )
            .session_type = Some(style);

            let context = format!("Fresh {} session", style.label());
            set.push_progression(
                ModifierCondition::both(
                    Comparator::lt(fatigue_p30),
                    Comparator::gt(readiness_p70),
                    ConditionLogic::And,
                ),
                low,
                &context,
            )
            .session_type = Some(style);
        }
    }
}

/// Highest-precedence modifier matching the context
///
/// Lower priority numbers win; ties keep the earlier modifier.
#[must_use]
pub fn select_modifier<'a>(
    modifiers: &'a [FatigueModifier],
    context: &ModifierContext,
) -> Option<&'a FatigueModifier> {
    modifiers
        .iter()
        .filter(|modifier| modifier.matches(context))
        .min_by_key(|modifier| modifier.priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_reads_as_percentages() {
        let bundle = Bundle::power(0.92).volume(0.9).rpe(-0.5);
        assert_eq!(
            bundle.directive(),
            "Target power at 92%, volume at 90%, target RPE -0.5"
        );
        assert_eq!(Bundle::default().rest(1.3).directive(), "Rest periods at 130%");
    }

    #[test]
    fn test_no_push_in_recovery_phases() {
        for tier in [Tier::Extreme, Tier::Standard] {
            assert!(push_bundle(CyclePhase::Descending, tier).is_none());
            assert!(push_bundle(CyclePhase::Trough, tier).is_none());
            assert!(push_bundle(CyclePhase::Ascending, tier).is_some());
        }
    }

    #[test]
    fn test_safety_nets_take_precedence() {
        let mut set = ModifierSet::default();
        ModifierGenerator::safety_nets(&mut set);
        ModifierGenerator::compound_tiers(&mut set);
        let selected = select_modifier(&set.modifiers, &ModifierContext::scores(90.0, 20.0));
        assert_eq!(selected.map(|m| m.priority), Some(1));

        let selected = select_modifier(&set.modifiers, &ModifierContext::scores(70.0, 40.0));
        assert_eq!(selected.map(|m| m.priority), Some(4));

        assert!(select_modifier(&set.modifiers, &ModifierContext::scores(50.0, 55.0)).is_none());
    }

    #[test]
    fn test_compound_fresh_tier_holds_back_in_recovery_weeks() {
        let mut set = ModifierSet::default();
        ModifierGenerator::safety_nets(&mut set);
        ModifierGenerator::compound_tiers(&mut set);

        let mut context = ModifierContext::scores(30.0, 75.0);
        let selected = select_modifier(&set.modifiers, &context);
        assert_eq!(selected.and_then(|m| m.adjustments.power_multiplier), Some(1.05));

        context.cycle_phase = Some(CyclePhase::Trough);
        assert!(select_modifier(&set.modifiers, &context).is_none());
    }
}
