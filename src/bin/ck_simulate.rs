// ABOUTME: Command-line plan simulator that projects a training plan and emits fatigue modifiers
// ABOUTME: Loads a JSON plan, runs the Monte-Carlo engine, analyzes cycles, and prints a report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! CardioKinetic plan simulator
//!
//! Usage:
//! ```bash
//! # Full JSON report
//! ck-simulate --plan plans/base_build.json
//!
//! # Reproducible run with a text summary
//! ck-simulate --plan plans/base_build.json --runs 2000 --seed 42 --summary
//!
//! # Resolve relative power expressions against a different base power
//! ck-simulate --plan plans/base_build.json --base-power 250
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use cardiokinetic::intelligence::cycles::CycleAnalysis;
use cardiokinetic::intelligence::simulation::SimulationProgress;
use cardiokinetic::intelligence::{
    CycleAnalyzer, EngineConfig, ModifierGenerator, MonteCarloSimulator, SimulationResult,
};
use cardiokinetic::logging::{AppLogger, LoggingConfig};
use cardiokinetic::models::{FatigueModifier, TrainingPlan};
use cardiokinetic::plan_file::load_plan_with_base_power;
use clap::Parser;
use serde::Serialize;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "ck-simulate",
    about = "CardioKinetic plan simulator",
    long_about = "Project a training plan with a Monte-Carlo simulation, segment the trajectory into cycles, and generate fatigue modifiers."
)]
struct Cli {
    /// Path to the JSON plan file
    #[arg(long)]
    plan: PathBuf,

    /// Number of simulated runs (overrides `CK_SIMULATION_RUNS`)
    #[arg(long)]
    runs: Option<usize>,

    /// Master seed for reproducible results (overrides `CK_SIMULATION_SEED`)
    #[arg(long)]
    seed: Option<u64>,

    /// Base power in watts used to resolve relative power expressions
    #[arg(long)]
    base_power: Option<f64>,

    /// Print a text summary instead of the JSON report
    #[arg(long)]
    summary: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    plan: &'a TrainingPlan,
    simulation: &'a SimulationResult,
    analysis: &'a CycleAnalysis,
    modifiers: &'a [FatigueModifier],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    let mut config = EngineConfig::load()?;
    if let Some(runs) = cli.runs {
        config.simulation.runs = runs;
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    config.validate()?;

    let plan = load_plan_with_base_power(&cli.plan, cli.base_power)?;
    let simulator = MonteCarloSimulator::new(&config);

    let started = Instant::now();
    let result = if cli.verbose {
        // Sequential batches so progress can be reported
        let mut batched = simulator.batched(&plan)?;
        for SimulationProgress { completed, total } in batched.by_ref() {
            debug!(completed, total, "Simulation progress");
        }
        batched.finish()?
    } else {
        simulator.simulate(&plan)?
    };
    AppLogger::log_simulation(
        &plan.name,
        plan.len(),
        result.runs,
        result.seed,
        started.elapsed().as_millis() as u64,
    );

    let analysis = CycleAnalyzer::new(config.cycles.clone()).analyze(&plan, &result)?;
    let modifiers = ModifierGenerator::generate(&analysis);

    if cli.summary {
        print_summary(&plan, &result, &analysis, &modifiers);
    } else {
        let report = Report {
            plan: &plan,
            simulation: &result,
            analysis: &analysis,
            modifiers: &modifiers,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn print_summary(
    plan: &TrainingPlan,
    result: &SimulationResult,
    analysis: &CycleAnalysis,
    modifiers: &[FatigueModifier],
) {
    println!(
        "{} ({} weeks, {} runs, seed {})",
        plan.name,
        plan.len(),
        result.runs,
        result.seed
    );
    println!();
    println!("week  phase        fatigue P15/P50/P85   readiness P15/P50/P85");
    for week in &analysis.weeks {
        println!(
            "{:>4}  {:<11}  {:>5.1} {:>5.1} {:>5.1}     {:>5.1} {:>5.1} {:>5.1}",
            week.week,
            week.phase.to_string(),
            week.fatigue.p15,
            week.fatigue.p50,
            week.fatigue.p85,
            week.readiness.p15,
            week.readiness.p50,
            week.readiness.p85,
        );
    }
    println!();
    println!(
        "trend: {:?} (score {:.2}{})",
        analysis.trend.direction,
        analysis.trend.score,
        if analysis.trend.strong { ", strong" } else { "" }
    );
    if let Some(week) = result.risk.peak_fatigue_week {
        println!("peak fatigue: week {week}");
    }
    if !result.risk.high_risk_weeks.is_empty() {
        println!("high-risk weeks: {:?}", result.risk.high_risk_weeks);
    }
    println!();
    println!("{} modifiers:", modifiers.len());
    for modifier in modifiers {
        println!(
            "  [{:>2}] when {}: {}",
            modifier.priority, modifier.condition, modifier.adjustments.message
        );
    }
}
