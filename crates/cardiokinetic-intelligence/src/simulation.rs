// ABOUTME: Monte-Carlo re-enactment of a multi-week plan through the load and score models
// ABOUTME: Runs are independent; batches fan out with rayon or step cooperatively with progress
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Simulation Engine
//!
//! Each run walks the plan week by week. A week draws a session count,
//! places each session on a distinct day, jitters planned power and RPE,
//! scores every day with the hybrid load model (instantaneous power ratio,
//! no rolling baseline), and advances a fresh `(atl = 0, ctl = 10)` state
//! through the dual-EWMA recursion. End-of-week scores are recorded.
//!
//! Runs are grouped into batches. Batch `b` draws from the `ChaCha8` stream
//! `b` of the master seed, so a seeded simulation produces identical samples
//! whether batches run in parallel or one at a time.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cardiokinetic_core::errors::{AppError, AppResult};
use cardiokinetic_core::models::{ScoreState, TrainingPlan};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, SimulationConfig};
use crate::load::LoadCalculator;
use crate::scoring::ScoreEngine;
use crate::statistics::{PercentileBand, StatisticalAnalyzer, SummaryStats};

const DAYS_PER_WEEK: usize = 7;

/// Median fatigue above which a week is flagged as elevated
const ELEVATED_FATIGUE: f64 = 60.0;

/// Median fatigue above which a week is flagged as high risk
const HIGH_RISK_FATIGUE: f64 = 80.0;

/// Median readiness below which a week is flagged as compromised
const LOW_READINESS: f64 = 50.0;

/// Cooperative cancellation flag checked between batches
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create an uncancelled token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress reported after each batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationProgress {
    /// Runs completed so far
    pub completed: usize,
    /// Runs requested
    pub total: usize,
}

/// Raw end-of-week samples, indexed by week position in the plan
#[derive(Debug, Clone, Default)]
pub struct WeekSamples {
    /// Fatigue samples per week
    pub fatigue: Vec<Vec<f64>>,
    /// Readiness samples per week
    pub readiness: Vec<Vec<f64>>,
}

impl WeekSamples {
    fn with_weeks(weeks: usize) -> Self {
        Self {
            fatigue: vec![Vec::new(); weeks],
            readiness: vec![Vec::new(); weeks],
        }
    }

    fn merge(mut self, other: Self) -> Self {
        if self.fatigue.is_empty() {
            return other;
        }
        for (mine, theirs) in self.fatigue.iter_mut().zip(other.fatigue) {
            mine.extend(theirs);
        }
        for (mine, theirs) in self.readiness.iter_mut().zip(other.readiness) {
            mine.extend(theirs);
        }
        self
    }

    /// Number of runs recorded
    #[must_use]
    pub fn runs(&self) -> usize {
        self.fatigue.first().map_or(0, Vec::len)
    }
}

/// Distribution of one week's end-of-week scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekStatistics {
    /// 1-based week number from the plan
    pub week: u32,
    /// Fatigue percentiles
    pub fatigue: PercentileBand,
    /// Readiness percentiles
    pub readiness: PercentileBand,
    /// Fatigue mean, spread, and range
    pub fatigue_summary: SummaryStats,
    /// Readiness mean, spread, and range
    pub readiness_summary: SummaryStats,
}

/// Weeks of concern derived from the median trajectory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Weeks with median fatigue above 60
    pub elevated_fatigue_weeks: Vec<u32>,
    /// Weeks with median fatigue above 80
    pub high_risk_weeks: Vec<u32>,
    /// Weeks with median readiness below 50
    pub low_readiness_weeks: Vec<u32>,
    /// Week with the highest median fatigue
    pub peak_fatigue_week: Option<u32>,
    /// Week with the lowest median readiness
    pub lowest_readiness_week: Option<u32>,
}

impl RiskAssessment {
    /// Assess a per-week statistics series
    #[must_use]
    pub fn from_weeks(weeks: &[WeekStatistics]) -> Self {
        let select = |predicate: &dyn Fn(&WeekStatistics) -> bool| -> Vec<u32> {
            weeks
                .iter()
                .filter(|w| predicate(w))
                .map(|w| w.week)
                .collect()
        };
        Self {
            elevated_fatigue_weeks: select(&|w| w.fatigue.p50 > ELEVATED_FATIGUE),
            high_risk_weeks: select(&|w| w.fatigue.p50 > HIGH_RISK_FATIGUE),
            low_readiness_weeks: select(&|w| w.readiness.p50 < LOW_READINESS),
            peak_fatigue_week: weeks
                .iter()
                .max_by(|a, b| a.fatigue.p50.total_cmp(&b.fatigue.p50))
                .map(|w| w.week),
            lowest_readiness_week: weeks
                .iter()
                .min_by(|a, b| a.readiness.p50.total_cmp(&b.readiness.p50))
                .map(|w| w.week),
        }
    }
}

/// Aggregated outcome of a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Runs that contributed samples
    pub runs: usize,
    /// Master seed the batches were derived from
    pub seed: u64,
    /// Per-week distributions in plan order
    pub weeks: Vec<WeekStatistics>,
    /// Weeks of concern
    pub risk: RiskAssessment,
    /// Raw per-week samples
    #[serde(skip)]
    pub samples: WeekSamples,
}

impl SimulationResult {
    fn from_samples(plan: &TrainingPlan, seed: u64, mut samples: WeekSamples) -> Self {
        let weeks: Vec<WeekStatistics> = plan
            .weeks
            .iter()
            .zip(samples.fatigue.iter_mut().zip(samples.readiness.iter_mut()))
            .map(|(definition, (fatigue, readiness))| {
                let fatigue_band = StatisticalAnalyzer::percentile_band(fatigue);
                let readiness_band = StatisticalAnalyzer::percentile_band(readiness);
                WeekStatistics {
                    week: definition.week,
                    fatigue: fatigue_band,
                    readiness: readiness_band,
                    fatigue_summary: StatisticalAnalyzer::summary(fatigue),
                    readiness_summary: StatisticalAnalyzer::summary(readiness),
                }
            })
            .collect();
        let risk = RiskAssessment::from_weeks(&weeks);
        Self {
            runs: samples.runs(),
            seed,
            weeks,
            risk,
            samples,
        }
    }

    /// Median fatigue per week
    #[must_use]
    pub fn median_fatigue(&self) -> Vec<f64> {
        self.weeks.iter().map(|w| w.fatigue.p50).collect()
    }

    /// Median readiness per week
    #[must_use]
    pub fn median_readiness(&self) -> Vec<f64> {
        self.weeks.iter().map(|w| w.readiness.p50).collect()
    }
}

/// Monte-Carlo simulator over training plans
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    load: LoadCalculator,
    scores: ScoreEngine,
    config: SimulationConfig,
}

impl Default for MonteCarloSimulator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl MonteCarloSimulator {
    /// Create a simulator from the engine configuration
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            load: LoadCalculator::new(config.load.clone()),
            scores: ScoreEngine::new(config.scores.clone()),
            config: config.simulation.clone(),
        }
    }

    /// Simulation parameters in use
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn validate(&self, plan: &TrainingPlan) -> AppResult<()> {
        if plan.is_empty() {
            return Err(AppError::invalid_input(format!(
                "Plan '{}' has no weeks to simulate",
                plan.name
            )));
        }
        if self.config.runs == 0 {
            return Err(AppError::invalid_input(
                "Simulation requires at least one run",
            ));
        }
        if self.config.sessions_min == 0
            || self.config.sessions_min > self.config.sessions_max
            || self.config.sessions_max as usize > DAYS_PER_WEEK
        {
            return Err(AppError::config(format!(
                "Invalid sessions-per-week range {}..={}",
                self.config.sessions_min, self.config.sessions_max
            )));
        }
        if !(self.config.power_jitter >= 0.0 && self.config.rpe_jitter >= 0.0) {
            return Err(AppError::config("Simulation jitter must be non-negative"));
        }
        if plan.base_power <= 0.0 {
            warn!(
                plan = %plan.name,
                base_power = plan.base_power,
                "Non-positive base power; simulated load will be RPE-only"
            );
        }
        Ok(())
    }

    fn master_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(rand::random)
    }

    fn batch_count(&self) -> usize {
        self.config.runs.div_ceil(self.config.batch_size.max(1))
    }

    fn batch_rng(seed: u64, batch: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(batch as u64);
        rng
    }

    fn batch_runs(&self, batch: usize) -> usize {
        let batch_size = self.config.batch_size.max(1);
        let start = batch * batch_size;
        self.config.runs.saturating_sub(start).min(batch_size)
    }

    /// Simulate one trajectory; returns end-of-week `(fatigue, readiness)` per week
    #[must_use]
    pub fn simulate_run<R: Rng>(
        &self,
        plan: &TrainingPlan,
        rng: &mut R,
    ) -> Vec<(f64, f64)> {
        let mut state: ScoreState = self.config.seed_state;
        let power_jitter = self.config.power_jitter;
        let rpe_jitter = self.config.rpe_jitter;

        plan.weeks
            .iter()
            .map(|week| {
                let mut day_loads = [0.0_f64; DAYS_PER_WEEK];
                let sessions =
                    rng.gen_range(self.config.sessions_min..=self.config.sessions_max) as usize;
                for day in index::sample(rng, DAYS_PER_WEEK, sessions.min(DAYS_PER_WEEK)) {
                    let power_ratio =
                        week.power_multiplier * (1.0 + rng.gen_range(-power_jitter..=power_jitter));
                    let rpe = (week.target_rpe + rng.gen_range(-rpe_jitter..=rpe_jitter))
                        .clamp(1.0, 10.0);
                    day_loads[day] = self.load.session_load(
                        week.duration_minutes,
                        plan.base_power * power_ratio,
                        plan.base_power,
                        rpe,
                    );
                }
                state = self.scores.fold_loads(state, &day_loads);
                (
                    self.scores.fatigue_score(state.atl, state.ctl),
                    self.scores.readiness_score(state.tsb()),
                )
            })
            .collect()
    }

    fn run_batch(&self, plan: &TrainingPlan, seed: u64, batch: usize) -> WeekSamples {
        let mut rng = Self::batch_rng(seed, batch);
        let mut samples = WeekSamples::with_weeks(plan.len());
        for _ in 0..self.batch_runs(batch) {
            for (week, (fatigue, readiness)) in
                self.simulate_run(plan, &mut rng).into_iter().enumerate()
            {
                samples.fatigue[week].push(fatigue);
                samples.readiness[week].push(readiness);
            }
        }
        debug!(batch, seed, runs = samples.runs(), "Simulated batch");
        samples
    }

    /// Run the full simulation with batches fanned out across the rayon pool
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty plan or zero runs
    pub fn simulate(&self, plan: &TrainingPlan) -> AppResult<SimulationResult> {
        self.validate(plan)?;
        let seed = self.master_seed();
        let batches = self.batch_count();
        info!(
            plan = %plan.name,
            weeks = plan.len(),
            runs = self.config.runs,
            batches,
            seed,
            "Starting Monte-Carlo simulation"
        );

        // Per-batch local buffers merged at the end
        let samples = (0..batches)
            .into_par_iter()
            .map(|batch| self.run_batch(plan, seed, batch))
            .collect::<Vec<_>>()
            .into_iter()
            .fold(WeekSamples::default(), WeekSamples::merge);

        let result = SimulationResult::from_samples(plan, seed, samples);
        info!(
            plan = %plan.name,
            runs = result.runs,
            peak_fatigue_week = ?result.risk.peak_fatigue_week,
            "Monte-Carlo simulation complete"
        );
        Ok(result)
    }

    /// Run the simulation sequentially with a caller-supplied random source
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty plan or zero runs
    pub fn simulate_with_rng<R: Rng>(
        &self,
        plan: &TrainingPlan,
        rng: &mut R,
    ) -> AppResult<SimulationResult> {
        self.validate(plan)?;
        let mut samples = WeekSamples::with_weeks(plan.len());
        for _ in 0..self.config.runs {
            for (week, (fatigue, readiness)) in self.simulate_run(plan, rng).into_iter().enumerate()
            {
                samples.fatigue[week].push(fatigue);
                samples.readiness[week].push(readiness);
            }
        }
        Ok(SimulationResult::from_samples(plan, 0, samples))
    }

    /// Start a cooperative simulation that advances one batch per iteration
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty plan or zero runs
    pub fn batched<'a>(&'a self, plan: &'a TrainingPlan) -> AppResult<BatchedSimulation<'a>> {
        self.validate(plan)?;
        let seed = self.master_seed();
        info!(
            plan = %plan.name,
            runs = self.config.runs,
            seed,
            "Starting batched Monte-Carlo simulation"
        );
        Ok(BatchedSimulation {
            simulator: self,
            plan,
            seed,
            next_batch: 0,
            batches: self.batch_count(),
            samples: WeekSamples::with_weeks(plan.len()),
            cancellation: None,
        })
    }
}

/// Incremental simulation yielding progress after each batch
pub struct BatchedSimulation<'a> {
    simulator: &'a MonteCarloSimulator,
    plan: &'a TrainingPlan,
    seed: u64,
    next_batch: usize,
    batches: usize,
    samples: WeekSamples,
    cancellation: Option<CancellationToken>,
}

impl BatchedSimulation<'_> {
    /// Stop between batches once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Whether the iteration stopped on a cancellation request
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Summarize the runs completed so far
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if no run completed before cancellation
    pub fn finish(self) -> AppResult<SimulationResult> {
        if self.samples.runs() == 0 {
            return Err(AppError::invalid_input(
                "Simulation was cancelled before any run completed",
            ));
        }
        Ok(SimulationResult::from_samples(
            self.plan,
            self.seed,
            self.samples,
        ))
    }
}

impl Iterator for BatchedSimulation<'_> {
    type Item = SimulationProgress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_batch >= self.batches || self.is_cancelled() {
            return None;
        }
        let batch = self
            .simulator
            .run_batch(self.plan, self.seed, self.next_batch);
        self.samples = mem::take(&mut self.samples).merge(batch);
        self.next_batch += 1;
        Some(SimulationProgress {
            completed: self.samples.runs(),
            total: self.simulator.config.runs,
        })
    }
}
