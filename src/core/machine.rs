use super::buffer::Buffer;
use super::errors::ConfigError;
use super::event::Event;
use super::machine_config::MachineConfig;
use super::types::{BufferId, RunId, StateId, Tick};
use log::debug;
use rand::RngCore;
use std::sync::Arc;

/// A machine on the line.
///
/// Every tick it pulls parts from its input buffer, pushes them to its output
/// buffer, records whether it was starved (`lack`) or blocked (`tailback`),
/// and moves through its machine type's Markov chain.
#[derive(Debug, Clone)]
pub struct Machine {
    name: String,
    config: Arc<MachineConfig>,
    /// Position of the current state inside `config`
    state: usize,
    input: BufferId,
    output: BufferId,
    count: f64,
    idle_parts: f64,
    tailback: bool,
    lack: bool,
    /// Tick at which the current state was entered
    entered_at: Tick,
    /// Dwell drawn on entering the current state, unset until the first tick
    dwell: Option<Tick>,
}

impl Machine {
    pub fn new(
        name: impl Into<String>,
        config: Arc<MachineConfig>,
        initial_state: StateId,
        input: BufferId,
        output: BufferId,
    ) -> Result<Self, ConfigError> {
        let state = config.position(initial_state)?;
        Ok(Self {
            name: name.into(),
            config,
            state,
            input,
            output,
            count: 0.0,
            idle_parts: 0.0,
            tailback: false,
            lack: false,
            entered_at: 0,
            dwell: None,
        })
    }

    /// Run one tick of production and return its event.
    ///
    /// Parts pulled from the input but refused by the output are counted as
    /// idle and are not returned upstream.
    pub fn step(
        &mut self,
        tick: Tick,
        run: RunId,
        buffers: &mut [Buffer],
        rng: &mut dyn RngCore,
    ) -> Result<Event, ConfigError> {
        let dwell = match self.dwell {
            Some(dwell) => dwell,
            None => {
                let dwell = self.config.state_at(self.state).sample_duration(rng);
                self.entered_at = tick;
                self.dwell = Some(dwell);
                dwell
            }
        };

        let mut requested = if self.tailback || self.lack {
            0.0
        } else {
            self.config.state_at(self.state).sample_speed(rng)
        };

        let pulled = buffers[self.input.0].get(requested);
        self.lack = pulled < requested && requested != 0.0;

        let pushed = buffers[self.output.0].put(pulled);
        // a starved machine is never also flagged as blocked
        self.tailback = pushed < pulled && !self.lack;
        if self.tailback {
            requested = 0.0;
            self.idle_parts += pulled - pushed;
        }

        self.count += pushed;

        if tick.saturating_sub(self.entered_at) == dwell {
            self.transition(tick, rng)?;
        }

        Ok(Event {
            tick,
            machine: self.name.clone(),
            state: self.state_id(),
            requested_speed: requested,
            actual_speed: pushed,
            count: self.count,
            tailback: self.tailback,
            lack: self.lack,
            run,
        })
    }

    // The error arm cannot fire for configs built with `MachineConfig::new`,
    // which rejects dangling transitions. The failed-run path of `run_batch`
    // is therefore not exercised by any built line or test.
    fn transition(&mut self, tick: Tick, rng: &mut dyn RngCore) -> Result<(), ConfigError> {
        let current = self.config.state_at(self.state);
        let next_id = current.sample_next_state_id(rng);
        let next = self.config.position(next_id)?;
        let dwell = self.config.state_at(next).sample_duration(rng);
        debug!(
            "[{}] tick {}: state {} -> {} for {} ticks",
            self.name,
            tick,
            current.id(),
            next_id,
            dwell
        );
        self.state = next;
        self.entered_at = tick;
        self.dwell = Some(dwell);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn state_id(&self) -> StateId {
        self.config.state_at(self.state).id()
    }

    pub fn input(&self) -> BufferId {
        self.input
    }

    pub fn output(&self) -> BufferId {
        self.output
    }

    pub fn count(&self) -> f64 {
        self.count
    }

    pub fn idle_parts(&self) -> f64 {
        self.idle_parts
    }

    pub fn tailback(&self) -> bool {
        self.tailback
    }

    pub fn lack(&self) -> bool {
        self.lack
    }
}
