// ABOUTME: Criterion benchmarks for the load, score, and simulation engines
// ABOUTME: Measures history folding throughput and Monte-Carlo plan projection latency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the numeric engine.
//!
//! Folds synthetic session histories of increasing length into daily metrics
//! and projects a 12-week plan through the seeded Monte-Carlo simulator.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use cardiokinetic::intelligence::load::aggregate_sessions;
use cardiokinetic::intelligence::{
    CycleAnalyzer, EngineConfig, LoadCalculator, ModifierGenerator, MonteCarloSimulator,
    ScoreEngine,
};
use cardiokinetic::models::{Session, SessionStyle, TrainingPlan, WeekDefinition, WeekFocus};
use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn history(days: u64) -> (NaiveDate, NaiveDate, Vec<Session>) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let sessions = (0..days)
        .filter(|offset| offset % 7 != 3)
        .map(|offset| {
            let date = start.checked_add_days(Days::new(offset)).unwrap();
            let step = (offset % 5) as f64;
            let session = Session::new(date, 40.0 + step * 5.0, 5.5 + step * 0.5);
            if offset % 3 == 0 {
                session
            } else {
                session.with_power(step.mul_add(10.0, 190.0))
            }
        })
        .collect();
    let end = start.checked_add_days(Days::new(days - 1)).unwrap();
    (start, end, sessions)
}

fn twelve_week_plan() -> TrainingPlan {
    let weeks = (1..=12)
        .map(|week| {
            let recovery = week % 4 == 0;
            WeekDefinition {
                week,
                phase_name: if week <= 6 { "Base" } else { "Build" }.to_owned(),
                focus: if recovery {
                    WeekFocus::Recovery
                } else {
                    WeekFocus::Volume
                },
                power_multiplier: if recovery {
                    0.7
                } else {
                    0.02f64.mul_add(f64::from(week), 0.9)
                },
                target_rpe: if recovery { 4.0 } else { 6.5 },
                duration_minutes: if recovery { 35.0 } else { 55.0 },
                session_style: SessionStyle::SteadyState,
            }
        })
        .collect();
    TrainingPlan {
        name: "Benchmark".to_owned(),
        base_power: 220.0,
        weeks,
    }
}

fn bench_metrics_series(c: &mut Criterion) {
    let config = EngineConfig::default();
    let load = LoadCalculator::new(config.load.clone());
    let scores = ScoreEngine::new(config.scores);

    let mut group = c.benchmark_group("metrics_series");
    for days in [30_u64, 180, 730] {
        let (start, end, sessions) = history(days);
        group.throughput(Throughput::Elements(days));
        group.bench_with_input(BenchmarkId::new("fold_history", days), &sessions, |b, sessions| {
            b.iter(|| {
                let aggregates = aggregate_sessions(black_box(sessions));
                let loads = load.daily_loads(&aggregates, Some(200.0));
                black_box(scores.compute_series(&loads, start, end))
            });
        });
    }
    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let plan = twelve_week_plan();
    let mut group = c.benchmark_group("simulation");
    group.sample_size(20);

    for runs in [500_usize, 2_000] {
        let mut config = EngineConfig::default();
        config.simulation.runs = runs;
        config.simulation.seed = Some(7);
        let simulator = MonteCarloSimulator::new(&config);

        group.throughput(Throughput::Elements(runs as u64));
        group.bench_with_input(BenchmarkId::new("simulate_plan", runs), &plan, |b, plan| {
            b.iter(|| black_box(simulator.simulate(plan).unwrap()));
        });
    }
    group.finish();
}

fn bench_planning_pipeline(c: &mut Criterion) {
    let plan = twelve_week_plan();
    let mut config = EngineConfig::default();
    config.simulation.runs = 1_000;
    config.simulation.seed = Some(11);
    let simulator = MonteCarloSimulator::new(&config);
    let analyzer = CycleAnalyzer::new(config.cycles.clone());

    let mut group = c.benchmark_group("planning_pipeline");
    group.sample_size(20);
    group.bench_function("simulate_analyze_generate", |b| {
        b.iter(|| {
            let result = simulator.simulate(&plan).unwrap();
            let analysis = analyzer.analyze(&plan, &result).unwrap();
            black_box(ModifierGenerator::generate(&analysis))
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_metrics_series,
    bench_simulation,
    bench_planning_pipeline,
);
criterion_main!(benches);
