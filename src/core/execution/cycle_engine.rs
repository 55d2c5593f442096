use crate::core::buffer::Buffer;
use crate::core::errors::{ConfigError, SimulationError};
use crate::core::event::Event;
use crate::core::machine::Machine;
use crate::core::types::{BufferId, RunId, Tick};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Tick loop for one run of a line.
///
/// Machines execute in registration order, each exactly once per tick, and all
/// of them finish tick `t` before tick `t + 1` starts. Two machines draining the
/// same buffer therefore always see it in the same order, which together with
/// the seeded random stream makes a run reproducible.
pub struct CycleEngine {
    run_id: RunId,
    /// Buffer arena, indexed by `BufferId`
    buffers: Vec<Buffer>,
    /// Machines in execution order
    machines: Vec<Machine>,
    current_tick: Tick,
    rng: StdRng,
    events: Vec<Event>,
}

impl CycleEngine {
    /// Create an empty engine for one run
    pub fn new(run_id: RunId, seed: u64) -> Self {
        Self {
            run_id,
            buffers: Vec::new(),
            machines: Vec::new(),
            current_tick: 0,
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Register a buffer and get its arena id
    pub fn add_buffer(&mut self, buffer: Buffer) -> BufferId {
        self.buffers.push(buffer);
        BufferId(self.buffers.len() - 1)
    }

    /// Register a machine; it runs after every machine registered before it
    pub fn add_machine(&mut self, machine: Machine) -> Result<(), ConfigError> {
        for buffer_id in [machine.input(), machine.output()] {
            if buffer_id.0 >= self.buffers.len() {
                return Err(ConfigError::UnknownBuffer(buffer_id.to_string()));
            }
        }
        self.machines.push(machine);
        Ok(())
    }

    /// Execute one tick for every machine, then advance the clock
    pub fn cycle(&mut self) -> Result<(), SimulationError> {
        debug!("=== Run {} tick {} ===", self.run_id, self.current_tick);

        for machine in self.machines.iter_mut() {
            let event = machine
                .step(self.current_tick, self.run_id, &mut self.buffers, &mut self.rng)
                .map_err(|source| SimulationError::Configuration {
                    machine: machine.name().to_string(),
                    source,
                })?;
            self.events.push(event);
        }

        self.current_tick += 1;
        Ok(())
    }

    /// Alias for `cycle`
    pub fn run_cycle(&mut self) -> Result<(), SimulationError> {
        self.cycle()
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The tick the next `cycle` will execute
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(id.0)
    }

    pub fn buffer_by_name(&self, name: &str) -> Option<&Buffer> {
        self.buffers.iter().find(|buffer| buffer.id() == name)
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn machine(&self, name: &str) -> Option<&Machine> {
        self.machines.iter().find(|machine| machine.name() == name)
    }

    /// Events emitted so far, in execution order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
