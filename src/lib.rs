// ABOUTME: Main library entry point for the CardioKinetic training load and readiness engine
// ABOUTME: Re-exports the core and intelligence crates plus storage, service, and plan decoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # CardioKinetic
//!
//! A training load and adaptive readiness engine for structured endurance
//! training. Session history becomes daily load, load becomes fatigue and
//! readiness scores, and daily wellness answers adjust those scores. Training
//! plans are projected forward with a Monte-Carlo simulation whose trajectory
//! drives a prioritized set of plan modifiers.
//!
//! ## Architecture
//!
//! - **Core** (`cardiokinetic-core`): errors, constants, and the data model
//! - **Intelligence** (`cardiokinetic-intelligence`): the numeric engine
//! - **Store**: record-store contract with an in-memory implementation
//! - **Service**: the live readiness path over a store
//! - **Plan files**: JSON plan decoding
//! - **Logging**: structured `tracing` setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use cardiokinetic::errors::AppResult;
//! use cardiokinetic::intelligence::{CycleAnalyzer, EngineConfig, ModifierGenerator, MonteCarloSimulator};
//! use cardiokinetic::plan_file::load_plan;
//!
//! fn main() -> AppResult<()> {
//!     let config = EngineConfig::load()?;
//!     let plan = load_plan(Path::new("plan.json"))?;
//!     let result = MonteCarloSimulator::new(&config).simulate(&plan)?;
//!     let analysis = CycleAnalyzer::new(config.cycles.clone()).analyze(&plan, &result)?;
//!     let modifiers = ModifierGenerator::generate(&analysis);
//!     println!("{} modifiers", modifiers.len());
//!     Ok(())
//! }
//! ```

/// Unified error handling
pub use cardiokinetic_core::errors;

/// Model constants
pub use cardiokinetic_core::constants;

/// Core data models
pub use cardiokinetic_core::models;

/// Numeric engine
pub use cardiokinetic_intelligence as intelligence;

/// Structured logging setup
pub mod logging;

/// JSON plan file decoding
pub mod plan_file;

/// Live readiness service
pub mod service;

/// Training record storage
pub mod store;

pub use service::{ReadinessReport, ReadinessService};
pub use store::{InMemoryRecordStore, TrainingRecordStore};
