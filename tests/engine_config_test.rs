// ABOUTME: Integration tests for environment-driven engine and logging configuration
// ABOUTME: Serialized because the tests mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use cardiokinetic::errors::{AppError, ErrorCode};
use cardiokinetic::intelligence::EngineConfig;
use cardiokinetic::logging::{LogFormat, LoggingConfig};
use serial_test::serial;

const VARS: [&str; 6] = [
    "CK_SIMULATION_RUNS",
    "CK_SESSIONS_MIN",
    "CK_SESSIONS_MAX",
    "CK_CTL_FLOOR",
    "LOG_FORMAT",
    "LOG_INCLUDE_LOCATION",
];

fn clear_env() {
    for name in VARS {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_defaults_load_without_overrides() {
    clear_env();
    let config = EngineConfig::load().unwrap();
    assert!(config.simulation.runs > 0);
    assert!(config.scores.atl_days < config.scores.ctl_days);
}

#[test]
#[serial]
fn test_overrides_reach_engine_sections() {
    clear_env();
    env::set_var("CK_SIMULATION_RUNS", "64");
    env::set_var("CK_CTL_FLOOR", "12.5");

    let config = EngineConfig::load().unwrap();
    assert_eq!(config.simulation.runs, 64);
    assert!((config.scores.ctl_floor - 12.5).abs() < f64::EPSILON);

    clear_env();
}

#[test]
#[serial]
fn test_inverted_session_range_maps_to_config_invalid() {
    clear_env();
    env::set_var("CK_SESSIONS_MIN", "5");
    env::set_var("CK_SESSIONS_MAX", "3");

    let err: AppError = EngineConfig::load().unwrap_err().into();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    clear_env();
}

#[test]
#[serial]
fn test_logging_config_reads_environment() {
    clear_env();
    env::set_var("LOG_FORMAT", "json");
    env::set_var("LOG_INCLUDE_LOCATION", "1");

    let config = LoggingConfig::from_env();
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);

    clear_env();
    assert_eq!(LoggingConfig::from_env().format, LogFormat::Pretty);
}
