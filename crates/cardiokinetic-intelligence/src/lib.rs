// ABOUTME: Numeric engine for CardioKinetic training load and adaptive readiness
// ABOUTME: Load, dual-EWMA scores, wellness, Monte-Carlo simulation, cycles, and modifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # CardioKinetic Intelligence
//!
//! The engine turns session history into daily training load, folds that load
//! through acute and chronic exponentially-weighted averages to produce
//! fatigue and readiness scores, perturbs them with daily wellness answers,
//! and projects a training plan forward with a seeded Monte-Carlo simulation.
//! The simulated trajectory is segmented into build/recovery cycles, and
//! percentile bands per phase drive the generated plan modifiers.
//!
//! ## Modules
//!
//! - **config**: Engine parameters with environment overrides
//! - **load**: Session aggregation and blended daily load
//! - **scoring**: ATL/CTL folding, fatigue and readiness scores
//! - **wellness**: Questionnaire-driven score adjustment
//! - **statistics**: Percentiles, smoothing, derivatives, and CUSUM
//! - **simulation**: Parallel seeded Monte-Carlo plan projection
//! - **cycles**: Trajectory segmentation and phase bands
//! - **modifiers**: Prioritized fatigue modifier generation and selection

/// Engine configuration
pub mod config;

/// Cycle phase analysis of simulated trajectories
pub mod cycles;

/// Daily training load
pub mod load;

/// Fatigue modifier generation
pub mod modifiers;

/// Dual-EWMA fatigue and readiness scores
pub mod scoring;

/// Monte-Carlo plan simulation
pub mod simulation;

/// Statistical helpers
pub mod statistics;

/// Wellness adjustment layer
pub mod wellness;

pub use config::EngineConfig;
pub use cycles::{CycleAnalysis, CycleAnalyzer};
pub use load::{DailyLoad, LoadCalculator};
pub use modifiers::{select_modifier, ModifierGenerator};
pub use scoring::ScoreEngine;
pub use simulation::{MonteCarloSimulator, SimulationResult};
pub use statistics::StatisticalAnalyzer;
pub use wellness::{WellnessAdjuster, WellnessAdjustment};
