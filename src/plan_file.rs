// ABOUTME: Decodes JSON training plan documents into validated TrainingPlan values
// ABOUTME: Power expressions are parsed once here so simulation never re-reads template text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Plan file decoding
//!
//! ```json
//! {
//!   "name": "Base build",
//!   "basePower": 220,
//!   "weeks": [
//!     { "phaseName": "Build", "focus": "Volume", "power": "80%",
//!       "targetRpe": 6, "durationMinutes": 45, "sessionStyle": "steady-state" }
//!   ]
//! }
//! ```
//!
//! `power` accepts a number (multiplier) or an expression string such as
//! `"1.05"`, `"80%"`, `"power * 0.8"` or `"power + 10"`. Week numbers default
//! to the 1-based position in the list.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::models::{PowerExpression, SessionStyle, TrainingPlan, WeekDefinition, WeekFocus};

/// Power field as written in a plan file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PowerField {
    Number(f64),
    Text(String),
}

impl PowerField {
    fn decode(&self) -> AppResult<PowerExpression> {
        match self {
            Self::Number(value) => Ok(PowerExpression::Multiplier { value: *value }),
            Self::Text(text) => text.parse(),
        }
    }
}

impl Default for PowerField {
    fn default() -> Self {
        Self::Number(1.0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekDocument {
    #[serde(default)]
    week: Option<u32>,
    #[serde(default)]
    phase_name: Option<String>,
    #[serde(default)]
    focus: WeekFocus,
    #[serde(default)]
    power: PowerField,
    target_rpe: f64,
    duration_minutes: f64,
    #[serde(default)]
    session_style: SessionStyle,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanDocument {
    name: String,
    base_power: f64,
    weeks: Vec<WeekDocument>,
}

/// Decode a plan from JSON text
///
/// # Errors
///
/// Returns `SerializationError` for malformed JSON, `InvalidFormat` for an
/// unrecognised power expression, and `InvalidInput` for an empty plan,
/// duplicate week numbers, or non-positive session durations
pub fn parse_plan(json: &str) -> AppResult<TrainingPlan> {
    parse_plan_with_base_power(json, None)
}

/// Decode a plan, resolving power expressions against `base_power` when given
///
/// # Errors
///
/// Same as [`parse_plan`]
pub fn parse_plan_with_base_power(json: &str, base_power: Option<f64>) -> AppResult<TrainingPlan> {
    let mut document: PlanDocument = serde_json::from_str(json)?;
    if let Some(watts) = base_power {
        document.base_power = watts;
    }
    decode(document)
}

/// Read and decode a plan file
///
/// # Errors
///
/// Returns `StorageError` if the file cannot be read, otherwise the errors of
/// [`parse_plan`]
pub fn load_plan(path: &Path) -> AppResult<TrainingPlan> {
    load_plan_with_base_power(path, None)
}

/// Read and decode a plan file with an optional base power override
///
/// # Errors
///
/// Same as [`load_plan`]
pub fn load_plan_with_base_power(path: &Path, base_power: Option<f64>) -> AppResult<TrainingPlan> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::storage(format!("Failed to read plan file {}", path.display())).with_source(e)
    })?;
    let plan = parse_plan_with_base_power(&text, base_power)?;
    info!(
        path = %path.display(),
        plan = %plan.name,
        weeks = plan.len(),
        "Loaded plan file"
    );
    Ok(plan)
}

fn decode(document: PlanDocument) -> AppResult<TrainingPlan> {
    if document.weeks.is_empty() {
        return Err(AppError::invalid_input(format!(
            "Plan '{}' has no weeks",
            document.name
        )));
    }
    if document.base_power <= 0.0 {
        warn!(
            plan = %document.name,
            base_power = document.base_power,
            "Plan base power is not positive; relative expressions resolve against 0 W"
        );
    }

    let mut seen = HashSet::new();
    let mut weeks = Vec::with_capacity(document.weeks.len());
    for (index, raw) in document.weeks.into_iter().enumerate() {
        let week = raw.week.unwrap_or(index as u32 + 1);
        if !seen.insert(week) {
            return Err(AppError::invalid_input(format!(
                "Plan '{}' defines week {week} more than once",
                document.name
            )));
        }
        if raw.duration_minutes <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "Week {week} of plan '{}' has non-positive duration",
                document.name
            )));
        }
        let expression = raw.power.decode()?;
        weeks.push(WeekDefinition {
            week,
            phase_name: raw.phase_name.unwrap_or_else(|| document.name.clone()),
            focus: raw.focus,
            power_multiplier: expression.multiplier(document.base_power),
            target_rpe: raw.target_rpe,
            duration_minutes: raw.duration_minutes,
            session_style: raw.session_style,
        });
    }
    weeks.sort_by_key(|definition| definition.week);

    Ok(TrainingPlan {
        name: document.name,
        base_power: document.base_power,
        weeks,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_expressions_resolve_to_multipliers() {
        let plan = parse_plan(
            r#"{"name":"p","basePower":200,"weeks":[
                {"power":"80%","targetRpe":6,"durationMinutes":40},
                {"power":"power + 20","targetRpe":7,"durationMinutes":40},
                {"power":1.1,"targetRpe":7,"durationMinutes":40}
            ]}"#,
        )
        .unwrap();
        let multipliers = plan.power_multipliers();
        assert!((multipliers[0] - 0.8).abs() < 1e-9);
        assert!((multipliers[1] - 1.1).abs() < 1e-9);
        assert!((multipliers[2] - 1.1).abs() < 1e-9);
        assert_eq!(plan.weeks[2].week, 3);
        assert_eq!(plan.weeks[0].phase_name, "p");
    }

    #[test]
    fn test_unknown_expression_is_invalid_format() {
        let err = parse_plan(
            r#"{"name":"p","basePower":200,"weeks":[
                {"power":"power ^ 2","targetRpe":6,"durationMinutes":40}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_duplicate_weeks_rejected() {
        let err = parse_plan(
            r#"{"name":"p","basePower":200,"weeks":[
                {"week":1,"targetRpe":6,"durationMinutes":40},
                {"week":1,"targetRpe":6,"durationMinutes":40}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
