//! Configuration for running a batch of simulations
//!
//! This module provides configuration types for controlling how many runs are
//! executed, for how long, from which seed, and whether independent runs are
//! spread over a thread pool.

use crate::core::types::Tick;
use serde::{Deserialize, Serialize};

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Runs are executed one after another on the calling thread
    Sequential,
    /// Independent runs are executed concurrently using Rayon.
    /// The ticks of a single run are never parallelized.
    Rayon,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Sequential
    }
}

/// Configuration for batch execution
///
/// Defaults match the packaging-line study: ten runs of 481 ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// The concurrency mode to use across runs
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
    /// Number of independent runs
    pub run_count: u32,
    /// Ticks per run; a run executes ticks `0..tick_horizon`
    pub tick_horizon: Tick,
    /// Base seed; run `n` is seeded with `seed + n`
    pub seed: u64,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    pub fn new() -> Self {
        Self {
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
            run_count: 10,
            tick_horizon: 481,
            seed: 42,
        }
    }

    /// Set the concurrency mode for the batch
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_run_count(mut self, runs: u32) -> Self {
        self.run_count = runs;
        self
    }

    pub fn with_tick_horizon(mut self, ticks: Tick) -> Self {
        self.tick_horizon = ticks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Seed used by the run with the given 1-based id
    pub fn run_seed(&self, run_id: u32) -> u64 {
        self.seed.wrapping_add(run_id as u64)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
