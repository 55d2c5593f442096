use crate::core::errors::SimulationError;
use crate::core::event::Event;
use crate::core::execution::cycle_engine::CycleEngine;
use crate::core::types::Tick;

/// Drives one run's tick loop up to a fixed horizon
pub struct SimulationEngine {
    cycle_engine: CycleEngine,
    max_ticks: Tick,
}

impl SimulationEngine {
    pub fn new(cycle_engine: CycleEngine, max_ticks: Tick) -> Self {
        Self {
            cycle_engine,
            max_ticks,
        }
    }

    /// Run until the horizon, returns the number of ticks executed
    pub fn run(&mut self) -> Result<Tick, SimulationError> {
        while self.current_tick() < self.max_ticks {
            self.step()?;
        }
        Ok(self.current_tick())
    }

    pub fn step(&mut self) -> Result<(), SimulationError> {
        self.cycle_engine.run_cycle()
    }

    pub fn current_tick(&self) -> Tick {
        self.cycle_engine.current_tick()
    }

    pub fn cycle_engine(&self) -> &CycleEngine {
        &self.cycle_engine
    }

    pub fn into_events(self) -> Vec<Event> {
        self.cycle_engine.into_events()
    }
}
