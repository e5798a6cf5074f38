// ABOUTME: Shared fixtures for integration tests
// ABOUTME: Builds periodized training plans and small, seeded engine configurations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(dead_code)]

use cardiokinetic::intelligence::EngineConfig;
use cardiokinetic::models::{SessionStyle, TrainingPlan, WeekDefinition, WeekFocus};

/// Three 4-week blocks, each ending in a recovery week
pub fn periodized_plan() -> TrainingPlan {
    let weeks = (1..=12)
        .map(|week| {
            let block = (week - 1) / 4;
            let position = (week - 1) % 4;
            let recovery = position == 3;
            WeekDefinition {
                week,
                phase_name: ["Base", "Build", "Peak"][block as usize].to_owned(),
                focus: if recovery {
                    WeekFocus::Recovery
                } else if block == 2 {
                    WeekFocus::Intensity
                } else {
                    WeekFocus::Volume
                },
                power_multiplier: if recovery {
                    0.7
                } else {
                    0.05f64.mul_add(f64::from(position + block), 0.9)
                },
                target_rpe: if recovery { 4.0 } else { 6.5 + f64::from(block) * 0.5 },
                duration_minutes: if recovery { 35.0 } else { 55.0 },
                session_style: if block == 2 {
                    SessionStyle::Interval
                } else {
                    SessionStyle::SteadyState
                },
            }
        })
        .collect();
    TrainingPlan {
        name: "Periodized".to_owned(),
        base_power: 220.0,
        weeks,
    }
}

/// Default configuration with a small, seeded simulation
pub fn seeded_config(runs: usize, seed: u64) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.simulation.runs = runs;
    config.simulation.batch_size = 50;
    config.simulation.seed = Some(seed);
    config
}
