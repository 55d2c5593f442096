use crate::core::builder::line_builder::Line;
use crate::core::errors::SimulationError;
use crate::core::event::Event;
use crate::core::execution::config::{ConcurrencyMode, SimulationConfig};
use crate::core::execution::simulation_engine::SimulationEngine;
use crate::core::types::{RunId, Tick};
use log::{info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::time::{Duration, Instant};

/// Events of one completed run
#[derive(Debug, Clone)]
pub struct RunLog {
    pub run_id: RunId,
    pub ticks: Tick,
    pub events: Vec<Event>,
    /// Parts each machine pulled but could not push, in registration order
    pub idle_parts: Vec<(String, f64)>,
    pub elapsed: Duration,
}

impl RunLog {
    pub fn idle_parts_of(&self, machine: &str) -> Option<f64> {
        self.idle_parts
            .iter()
            .find(|(name, _)| name == machine)
            .map(|(_, parts)| *parts)
    }
}

/// A run aborted by an error; it contributes no events
#[derive(Debug)]
pub struct RunFailure {
    pub run_id: RunId,
    pub error: SimulationError,
}

/// Outcome of a batch, ordered by run id
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<RunLog>,
    pub failed: Vec<RunFailure>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Events of all completed runs, run after run
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.completed.iter().flat_map(|run| run.events.iter())
    }

    pub fn into_events(self) -> Vec<Event> {
        self.completed
            .into_iter()
            .flat_map(|run| run.events)
            .collect()
    }
}

/// Execute a single run of `line` up to the configured horizon
pub fn run_single(
    line: &Line,
    run_id: RunId,
    config: &SimulationConfig,
) -> Result<RunLog, SimulationError> {
    let started = Instant::now();
    let seed = config.run_seed(run_id);
    info!("Run {} started with seed {}", run_id, seed);
    let engine = line.instantiate(run_id, seed)?;
    let mut simulation = SimulationEngine::new(engine, config.tick_horizon);
    let ticks = simulation.run()?;
    let idle_parts = simulation
        .cycle_engine()
        .machines()
        .iter()
        .map(|machine| (machine.name().to_string(), machine.idle_parts()))
        .collect();
    let events = simulation.into_events();
    let elapsed = started.elapsed();

    info!(
        "Run {} finished: {} ticks, {} events in {:?}",
        run_id,
        ticks,
        events.len(),
        elapsed
    );
    Ok(RunLog {
        run_id,
        ticks,
        events,
        idle_parts,
        elapsed,
    })
}

/// Execute `config.run_count` independent runs, numbered from 1.
///
/// With `ConcurrencyMode::Rayon` the runs are spread over a thread pool; the
/// report is identical to a sequential batch because every run owns its own
/// seed, buffers and event log. A failed run is reported and does not affect
/// the others.
pub fn run_batch(line: &Line, config: &SimulationConfig) -> Result<BatchReport, SimulationError> {
    let started = Instant::now();
    let run_ids: Vec<RunId> = (1..=config.run_count).collect();

    let outcomes: Vec<(RunId, Result<RunLog, SimulationError>)> = match config.concurrency_mode {
        ConcurrencyMode::Sequential => run_ids
            .iter()
            .map(|&run_id| (run_id, run_single(line, run_id, config)))
            .collect(),
        ConcurrencyMode::Rayon => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.thread_pool_size.unwrap_or(0))
                .build()?;
            pool.install(|| {
                run_ids
                    .par_iter()
                    .map(|&run_id| (run_id, run_single(line, run_id, config)))
                    .collect()
            })
        }
    };

    let mut report = BatchReport::default();
    for (run_id, outcome) in outcomes {
        match outcome {
            Ok(log) => report.completed.push(log),
            Err(error) => {
                warn!("Run {} aborted: {}", run_id, error);
                report.failed.push(RunFailure { run_id, error });
            }
        }
    }
    report.elapsed = started.elapsed();

    info!(
        "Batch finished: {} of {} runs completed in {:?}",
        report.completed.len(),
        config.run_count,
        report.elapsed
    );
    Ok(report)
}
