// ABOUTME: Core data model for the CardioKinetic engine
// ABOUTME: Re-exports sessions, score state, questionnaires, plans, and fatigue modifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Plain data shared by every stage of the engine. Boundary text (dates,
//! question keys, power expressions) is parsed into these types once, so the
//! algorithms downstream never re-interpret strings.
//!
//! ## Core Models
//!
//! - `Session` / `DailyAggregate`: completed training and its per-day fold
//! - `ScoreState` / `DailyMetrics`: acute/chronic load and derived scores
//! - `QuestionnaireResponse`: one day of subjective wellness ratings
//! - `TrainingPlan` / `WeekDefinition`: a multi-week prescription
//! - `FatigueModifier`: a conditional plan adjustment

mod metrics;
mod modifier;
mod plan;
mod questionnaire;
mod session;

// Training records
pub use session::{DailyAggregate, Session};

// Score state
pub use metrics::{DailyMetrics, FatigueZone, ReadinessZone, ScoreState};

// Wellness
pub use questionnaire::{QuestionId, QuestionnaireResponse};

// Plans
pub use plan::{ExprOp, PowerExpression, SessionStyle, TrainingPlan, WeekDefinition, WeekFocus};

// Modifiers
pub use modifier::{
    CompareOp, Comparator, ConditionLogic, CyclePhase, FatigueModifier, LegacyCondition,
    ModifierAdjustments, ModifierCondition, ModifierContext, WeekPosition,
};
