// ABOUTME: Week-by-week training plan definitions consumed by the Monte-Carlo simulator
// ABOUTME: Power micro-expressions ("80%", "power * 0.8") are decoded once into a closed sum type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};

/// Training emphasis of a week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeekFocus {
    /// Aerobic volume accumulation
    #[default]
    Volume,
    /// High-intensity emphasis
    Intensity,
    /// More work per unit time (shorter rests)
    Density,
    /// Deload / recovery week
    Recovery,
}

/// Structure of the sessions prescribed in a week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStyle {
    /// Work/rest interval sessions
    #[default]
    Interval,
    /// Continuous steady-state sessions
    SteadyState,
    /// Mixed custom block structure
    Custom,
}

impl SessionStyle {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::SteadyState => "steady-state",
            Self::Custom => "custom",
        }
    }
}

/// One fully resolved week of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDefinition {
    /// 1-based week number
    pub week: u32,
    /// Block or phase name ("Base", "Build", ...)
    pub phase_name: String,
    /// Training emphasis
    pub focus: WeekFocus,
    /// Planned power as a multiple of base power
    pub power_multiplier: f64,
    /// Planned session RPE
    pub target_rpe: f64,
    /// Planned session duration (minutes)
    pub duration_minutes: f64,
    /// Session structure
    pub session_style: SessionStyle,
}

/// An ordered multi-week plan with its base power
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    /// Plan name
    pub name: String,
    /// Reference power in watts for multiplier 1.0
    pub base_power: f64,
    /// Week definitions in order
    pub weeks: Vec<WeekDefinition>,
}

impl TrainingPlan {
    /// Look up a week by its 1-based number
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the plan has no definition for that week
    pub fn week(&self, week: u32) -> AppResult<&WeekDefinition> {
        self.weeks
            .iter()
            .find(|definition| definition.week == week)
            .ok_or_else(|| AppError::not_found(format!("Week {week} of plan '{}'", self.name)))
    }

    /// Number of weeks in the plan
    #[must_use]
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    /// Whether the plan has no weeks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Power multipliers in week order
    #[must_use]
    pub fn power_multipliers(&self) -> Vec<f64> {
        self.weeks.iter().map(|w| w.power_multiplier).collect()
    }
}

/// Arithmetic operator in a relative power expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprOp {
    /// `power * factor`
    Mul,
    /// `power / factor`
    Div,
    /// `power + watts`
    Add,
    /// `power - watts`
    Sub,
}

/// Planned power relative to a base power
///
/// Decoded once from template text; evaluation never re-parses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PowerExpression {
    /// Plain multiplier, e.g. `1.05`
    Multiplier {
        /// Multiple of base power
        value: f64,
    },
    /// Percentage of base power, e.g. `80%`
    Percent {
        /// Percentage points
        value: f64,
    },
    /// Arithmetic on base power, e.g. `power * 0.8` or `power + 10`
    RelativeExpr {
        /// Operator
        op: ExprOp,
        /// Right-hand operand
        factor: f64,
    },
}

impl PowerExpression {
    /// Planned power in watts for the given base power
    #[must_use]
    pub fn resolve(&self, base_power: f64) -> f64 {
        match *self {
            Self::Multiplier { value } => base_power * value,
            Self::Percent { value } => base_power * value / 100.0,
            Self::RelativeExpr { op, factor } => match op {
                ExprOp::Mul => base_power * factor,
                ExprOp::Div if factor.abs() > f64::EPSILON => base_power / factor,
                ExprOp::Div => base_power,
                ExprOp::Add => base_power + factor,
                ExprOp::Sub => base_power - factor,
            },
        }
    }

    /// Power as a multiple of the base power
    #[must_use]
    pub fn multiplier(&self, base_power: f64) -> f64 {
        match *self {
            Self::Multiplier { value } => value,
            Self::Percent { value } => value / 100.0,
            Self::RelativeExpr { .. } if base_power > 0.0 => self.resolve(base_power) / base_power,
            Self::RelativeExpr { .. } => 1.0,
        }
    }
}

impl Default for PowerExpression {
    fn default() -> Self {
        Self::Multiplier { value: 1.0 }
    }
}

impl FromStr for PowerExpression {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || AppError::invalid_format(format!("Unrecognised power expression '{s}'"));

        if let Some(percent) = text.strip_suffix('%') {
            let value = percent.trim().parse::<f64>().map_err(|_| invalid())?;
            return Ok(Self::Percent { value });
        }

        if let Some(rest) = text.strip_prefix("power") {
            let rest = rest.trim_start();
            let mut chars = rest.chars();
            let op = match chars.next() {
                Some('*') => ExprOp::Mul,
                Some('/') => ExprOp::Div,
                Some('+') => ExprOp::Add,
                Some('-') => ExprOp::Sub,
                _ => return Err(invalid()),
            };
            let factor = chars.as_str().trim().parse::<f64>().map_err(|_| invalid())?;
            return Ok(Self::RelativeExpr { op, factor });
        }

        text.parse::<f64>()
            .map(|value| Self::Multiplier { value })
            .map_err(|_| invalid())
    }
}

impl fmt::Display for PowerExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multiplier { value } => write!(f, "{value}"),
            Self::Percent { value } => write!(f, "{value}%"),
            Self::RelativeExpr { op, factor } => {
                let symbol = match op {
                    ExprOp::Mul => '*',
                    ExprOp::Div => '/',
                    ExprOp::Add => '+',
                    ExprOp::Sub => '-',
                };
                write!(f, "power {symbol} {factor}")
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_expression_forms() {
        assert_eq!(
            "80%".parse::<PowerExpression>().unwrap(),
            PowerExpression::Percent { value: 80.0 }
        );
        assert_eq!(
            "power * 0.8".parse::<PowerExpression>().unwrap(),
            PowerExpression::RelativeExpr {
                op: ExprOp::Mul,
                factor: 0.8
            }
        );
        assert_eq!(
            " 1.05 ".parse::<PowerExpression>().unwrap(),
            PowerExpression::Multiplier { value: 1.05 }
        );
    }

    #[test]
    fn test_resolve_against_base_power() {
        let base = 200.0;
        let parse = |text: &str| text.parse::<PowerExpression>().unwrap();
        assert!((parse("80%").resolve(base) - 160.0).abs() < 1e-9);
        assert!((parse("power + 10").resolve(base) - 210.0).abs() < 1e-9);
        assert!((parse("power - 20").multiplier(base) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_expression_is_rejected() {
        let err = "power ^ 2".parse::<PowerExpression>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_missing_week_is_not_found() {
        let plan = TrainingPlan {
            name: "Empty".into(),
            base_power: 200.0,
            weeks: Vec::new(),
        };
        assert_eq!(plan.week(3).unwrap_err().code, ErrorCode::ResourceNotFound);
    }
}
