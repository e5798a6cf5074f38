// ABOUTME: Core types and constants for the CardioKinetic training load engine
// ABOUTME: Foundation crate with error handling, model constants, and the shared data model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # CardioKinetic Core
//!
//! Foundation crate providing shared types and constants for the CardioKinetic
//! training load and adaptive readiness engine. This crate is designed to
//! change infrequently, enabling incremental compilation benefits in the
//! workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Model constants for load, scores, zones, and wellness
//! - **models**: Sessions, score state, questionnaires, plans, and modifiers

/// Unified error handling system with standard error codes
pub mod errors;

/// Model constants organized by domain
pub mod constants;

/// Core data models
pub mod models;
