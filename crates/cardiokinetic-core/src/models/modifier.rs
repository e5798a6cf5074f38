// ABOUTME: Conditional plan-adjustment rules (fatigue modifiers) and their matching context
// ABOUTME: Conditions are a single tagged variant: legacy named states or structured thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

use super::plan::SessionStyle;

/// Coarse position of a week inside a fatigue/power build-recovery cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// Load building
    Ascending,
    /// Top of the cycle
    Peak,
    /// Load coming off
    Descending,
    /// Bottom of the cycle / recovery
    Trough,
}

impl CyclePhase {
    /// All phases in cycle order
    pub const ALL: [Self; 4] = [Self::Ascending, Self::Peak, Self::Descending, Self::Trough];

    /// Whether "push harder" suggestions are allowed in this phase
    #[must_use]
    pub const fn allows_progression(&self) -> bool {
        matches!(self, Self::Ascending | Self::Peak)
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ascending => "ascending",
            Self::Peak => "peak",
            Self::Descending => "descending",
            Self::Trough => "trough",
        };
        f.write_str(label)
    }
}

/// Position of a week relative to the whole plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekPosition {
    /// First week
    First,
    /// First third
    Early,
    /// Middle third
    Middle,
    /// Last third
    Late,
    /// Final week
    Last,
}

impl WeekPosition {
    /// Classify a 1-based week number within a plan of `total_weeks`
    #[must_use]
    pub fn classify(week: u32, total_weeks: u32) -> Self {
        if week <= 1 {
            return Self::First;
        }
        if week >= total_weeks {
            return Self::Last;
        }
        let fraction = f64::from(week) / f64::from(total_weeks.max(1));
        if fraction <= 1.0 / 3.0 {
            Self::Early
        } else if fraction <= 2.0 / 3.0 {
            Self::Middle
        } else {
            Self::Late
        }
    }

    /// Whether a week at `actual` satisfies a filter for `self`
    ///
    /// `Early` also covers the first week and `Late` the last week.
    #[must_use]
    pub fn admits(&self, actual: Self) -> bool {
        *self == actual
            || matches!(
                (self, actual),
                (Self::Early, Self::First) | (Self::Late, Self::Last)
            )
    }
}

/// Comparison operator for a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Strictly greater
    Gt,
    /// Greater or equal
    Gte,
    /// Strictly less
    Lt,
    /// Less or equal
    Lte,
}

/// A single score threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparator {
    /// Operator
    pub op: CompareOp,
    /// Threshold value (score points)
    pub value: f64,
}

impl Comparator {
    /// `score > value`
    #[must_use]
    pub const fn gt(value: f64) -> Self {
        Self {
            op: CompareOp::Gt,
            value,
        }
    }

    /// `score < value`
    #[must_use]
    pub const fn lt(value: f64) -> Self {
        Self {
            op: CompareOp::Lt,
            value,
        }
    }

    /// Evaluate against a score
    #[must_use]
    pub fn test(&self, score: f64) -> bool {
        match self.op {
            CompareOp::Gt => score > self.value,
            CompareOp::Gte => score >= self.value,
            CompareOp::Lt => score < self.value,
            CompareOp::Lte => score <= self.value,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.op {
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        };
        write!(f, "{symbol} {:.0}", self.value)
    }
}

/// How fatigue and readiness thresholds combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionLogic {
    /// Both thresholds must hold
    #[default]
    And,
    /// Either threshold suffices
    Or,
}

/// Named states carried over from early modifier definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyCondition {
    /// Fatigue above 60 or readiness below 50
    Tired,
    /// Readiness above 65 and fatigue below 40
    Fresh,
    /// Fatigue above 80 and readiness below 35
    Overreached,
    /// Fatigue above 70
    HighFatigue,
    /// Readiness below 40
    LowReadiness,
}

impl LegacyCondition {
    /// Equivalent structured condition
    #[must_use]
    pub const fn to_threshold(self) -> ModifierCondition {
        let (fatigue, readiness, logic) = match self {
            Self::Tired => (
                Some(Comparator::gt(60.0)),
                Some(Comparator::lt(50.0)),
                ConditionLogic::Or,
            ),
            Self::Fresh => (
                Some(Comparator::lt(40.0)),
                Some(Comparator::gt(65.0)),
                ConditionLogic::And,
            ),
            Self::Overreached => (
                Some(Comparator::gt(80.0)),
                Some(Comparator::lt(35.0)),
                ConditionLogic::And,
            ),
            Self::HighFatigue => (Some(Comparator::gt(70.0)), None, ConditionLogic::And),
            Self::LowReadiness => (None, Some(Comparator::lt(40.0)), ConditionLogic::And),
        };
        ModifierCondition::Threshold {
            fatigue,
            readiness,
            logic,
        }
    }
}

/// When a modifier applies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModifierCondition {
    /// Named legacy state
    Legacy {
        /// The named state
        state: LegacyCondition,
    },
    /// Structured fatigue/readiness thresholds
    Threshold {
        /// Fatigue threshold, if any
        fatigue: Option<Comparator>,
        /// Readiness threshold, if any
        readiness: Option<Comparator>,
        /// How the two thresholds combine
        logic: ConditionLogic,
    },
}

impl ModifierCondition {
    /// Fatigue-only threshold
    #[must_use]
    pub const fn fatigue(comparator: Comparator) -> Self {
        Self::Threshold {
            fatigue: Some(comparator),
            readiness: None,
            logic: ConditionLogic::And,
        }
    }

    /// Readiness-only threshold
    #[must_use]
    pub const fn readiness(comparator: Comparator) -> Self {
        Self::Threshold {
            fatigue: None,
            readiness: Some(comparator),
            logic: ConditionLogic::And,
        }
    }

    /// Fatigue and readiness thresholds with explicit logic
    #[must_use]
    pub const fn both(fatigue: Comparator, readiness: Comparator, logic: ConditionLogic) -> Self {
        Self::Threshold {
            fatigue: Some(fatigue),
            readiness: Some(readiness),
            logic,
        }
    }

    /// Evaluate against current scores
    #[must_use]
    pub fn evaluate(&self, fatigue_score: f64, readiness_score: f64) -> bool {
        match *self {
            Self::Legacy { state } => state
                .to_threshold()
                .evaluate(fatigue_score, readiness_score),
            Self::Threshold {
                fatigue,
                readiness,
                logic,
            } => {
                let fatigue_hit = fatigue.map(|c| c.test(fatigue_score));
                let readiness_hit = readiness.map(|c| c.test(readiness_score));
                match (fatigue_hit, readiness_hit, logic) {
                    (None, None, _) => false,
                    (Some(f), None, _) => f,
                    (None, Some(r), _) => r,
                    (Some(f), Some(r), ConditionLogic::And) => f && r,
                    (Some(f), Some(r), ConditionLogic::Or) => f || r,
                }
            }
        }
    }
}

impl fmt::Display for ModifierCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy { state } => write!(f, "{state:?}"),
            Self::Threshold {
                fatigue,
                readiness,
                logic,
            } => {
                let joiner = match logic {
                    ConditionLogic::And => "and",
                    ConditionLogic::Or => "or",
                };
                match (fatigue, readiness) {
                    (Some(fc), Some(rc)) => write!(f, "fatigue {fc} {joiner} readiness {rc}"),
                    (Some(fc), None) => write!(f, "fatigue {fc}"),
                    (None, Some(rc)) => write!(f, "readiness {rc}"),
                    (None, None) => f.write_str("never"),
                }
            }
        }
    }
}

/// Adjustment bundle applied to a session when its modifier matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierAdjustments {
    /// Multiplier on target power
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_multiplier: Option<f64>,
    /// Multiplier on session volume (intervals / sets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_multiplier: Option<f64>,
    /// Multiplier on rest periods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_multiplier: Option<f64>,
    /// Multiplier on session duration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_multiplier: Option<f64>,
    /// Change in target RPE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpe_delta: Option<f64>,
    /// Plain-language directive for display
    pub message: String,
}

/// A generated conditional plan-adjustment rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueModifier {
    /// When the modifier applies
    pub condition: ModifierCondition,
    /// What it changes
    pub adjustments: ModifierAdjustments,
    /// Precedence; lower numbers win
    pub priority: u32,
    /// Restrict to weeks in this cycle phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_phase: Option<CyclePhase>,
    /// Restrict to weeks of this named block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_name: Option<String>,
    /// Restrict to sessions of this style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionStyle>,
    /// Restrict to weeks at this position in the plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_position: Option<WeekPosition>,
    /// Push-harder rule; never applies in descending or trough weeks
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub progression_only: bool,
}

impl FatigueModifier {
    /// Whether the modifier applies in the given context
    #[must_use]
    pub fn matches(&self, context: &ModifierContext) -> bool {
        if self.progression_only
            && context
                .cycle_phase
                .is_some_and(|phase| !phase.allows_progression())
        {
            return false;
        }
        if self
            .cycle_phase
            .is_some_and(|phase| context.cycle_phase != Some(phase))
        {
            return false;
        }
        if let Some(name) = &self.phase_name {
            if context.phase_name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        if self
            .session_type
            .is_some_and(|style| context.session_type != Some(style))
        {
            return false;
        }
        if let Some(position) = self.week_position {
            if !context
                .week_position
                .is_some_and(|actual| position.admits(actual))
            {
                return false;
            }
        }
        self.condition
            .evaluate(context.fatigue_score, context.readiness_score)
    }
}

/// Scores and plan position of the session being adjusted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierContext {
    /// Current fatigue score
    pub fatigue_score: f64,
    /// Current readiness score
    pub readiness_score: f64,
    /// Cycle phase of the current week
    pub cycle_phase: Option<CyclePhase>,
    /// Named block of the current week
    pub phase_name: Option<String>,
    /// Style of the session being adjusted
    pub session_type: Option<SessionStyle>,
    /// Position of the current week in the plan
    pub week_position: Option<WeekPosition>,
}

impl ModifierContext {
    /// Context carrying only scores
    #[must_use]
    pub const fn scores(fatigue_score: f64, readiness_score: f64) -> Self {
        Self {
            fatigue_score,
            readiness_score,
            cycle_phase: None,
            phase_name: None,
            session_type: None,
            week_position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_logic() {
        let and = ModifierCondition::both(
            Comparator::gt(70.0),
            Comparator::lt(40.0),
            ConditionLogic::And,
        );
        let or = ModifierCondition::both(
            Comparator::gt(70.0),
            Comparator::lt(40.0),
            ConditionLogic::Or,
        );
        assert!(!and.evaluate(75.0, 50.0));
        assert!(or.evaluate(75.0, 50.0));
        assert!(and.evaluate(75.0, 30.0));
    }

    #[test]
    fn test_legacy_condition_resolves_to_threshold() {
        let legacy = ModifierCondition::Legacy {
            state: LegacyCondition::Overreached,
        };
        assert!(legacy.evaluate(85.0, 30.0));
        assert!(!legacy.evaluate(85.0, 50.0));
    }

    #[test]
    fn test_week_position_classification() {
        assert_eq!(WeekPosition::classify(1, 12), WeekPosition::First);
        assert_eq!(WeekPosition::classify(3, 12), WeekPosition::Early);
        assert_eq!(WeekPosition::classify(6, 12), WeekPosition::Middle);
        assert_eq!(WeekPosition::classify(10, 12), WeekPosition::Late);
        assert_eq!(WeekPosition::classify(12, 12), WeekPosition::Last);
        assert!(WeekPosition::Late.admits(WeekPosition::Last));
    }

    #[test]
    fn test_filters_restrict_matching() {
        let modifier = FatigueModifier {
            condition: ModifierCondition::fatigue(Comparator::gt(50.0)),
            adjustments: ModifierAdjustments {
                power_multiplier: Some(0.9),
                volume_multiplier: None,
                rest_multiplier: None,
                duration_multiplier: None,
                rpe_delta: None,
                message: "Target power at 90%".into(),
            },
            priority: 4,
            cycle_phase: Some(CyclePhase::Peak),
            phase_name: None,
            session_type: None,
            week_position: None,
            progression_only: false,
        };
        let mut context = ModifierContext::scores(60.0, 50.0);
        assert!(!modifier.matches(&context));
        context.cycle_phase = Some(CyclePhase::Peak);
        assert!(modifier.matches(&context));
    }

    #[test]
    fn test_progression_rule_skips_recovery_weeks() {
        let modifier = FatigueModifier {
            condition: ModifierCondition::both(
                Comparator::lt(35.0),
                Comparator::gt(70.0),
                ConditionLogic::And,
            ),
            adjustments: ModifierAdjustments {
                power_multiplier: Some(1.05),
                volume_multiplier: None,
                rest_multiplier: None,
                duration_multiplier: None,
                rpe_delta: Some(0.5),
                message: "Target power at 105%".into(),
            },
            priority: 5,
            cycle_phase: None,
            phase_name: None,
            session_type: None,
            week_position: None,
            progression_only: true,
        };
        let mut context = ModifierContext::scores(30.0, 75.0);
        assert!(modifier.matches(&context));

        for phase in [CyclePhase::Descending, CyclePhase::Trough] {
            context.cycle_phase = Some(phase);
            assert!(!modifier.matches(&context), "{phase} week must not push");
        }
        for phase in [CyclePhase::Ascending, CyclePhase::Peak] {
            context.cycle_phase = Some(phase);
            assert!(modifier.matches(&context));
        }

        let json = serde_json::to_value(&modifier).unwrap();
        assert_eq!(json["progressionOnly"], true);
        let parsed: FatigueModifier = serde_json::from_value(serde_json::json!({
            "condition": { "type": "legacy", "state": "fresh" },
            "adjustments": { "message": "Hold" },
            "priority": 1
        }))
        .unwrap();
        assert!(!parsed.progression_only);
    }
}
