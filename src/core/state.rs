use super::errors::ConfigError;
use super::sampler::Sampler;
use super::types::{StateId, Tick};
use rand::distributions::WeightedIndex;
use rand::RngCore;
use rand_distr::Distribution;

/// One node of a machine type's Markov chain.
///
/// Owns the speed and duration samplers for the state and the relative
/// weights of moving to each destination state. Immutable once built.
#[derive(Debug)]
pub struct MachineState {
    id: StateId,
    destinations: Vec<StateId>,
    chooser: WeightedIndex<f64>,
    speed: Box<dyn Sampler>,
    duration: Box<dyn Sampler>,
}

impl MachineState {
    /// Create a state from `(destination, weight)` pairs.
    ///
    /// Weights are relative and need not sum to 1. Destinations are resolved
    /// later by the owning `MachineConfig`.
    pub fn new(
        id: StateId,
        transitions: &[(StateId, f64)],
        speed: Box<dyn Sampler>,
        duration: Box<dyn Sampler>,
    ) -> Result<Self, ConfigError> {
        let chooser = WeightedIndex::new(transitions.iter().map(|(_, weight)| *weight))
            .map_err(|e| ConfigError::InvalidTransitionWeights {
                state_id: id,
                reason: e.to_string(),
            })?;
        Ok(Self {
            id,
            destinations: transitions.iter().map(|(to, _)| *to).collect(),
            chooser,
            speed,
            duration,
        })
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Destination states this state can move to
    pub fn destinations(&self) -> &[StateId] {
        &self.destinations
    }

    /// Draw the next state id, proportionally to the transition weights
    pub fn sample_next_state_id(&self, rng: &mut dyn RngCore) -> StateId {
        self.destinations[self.chooser.sample(rng)]
    }

    /// Draw the parts per tick a machine in this state tries to produce
    pub fn sample_speed(&self, rng: &mut dyn RngCore) -> f64 {
        self.speed.sample(rng).max(0.0)
    }

    /// Draw how many ticks a machine stays in this state, at least 1
    pub fn sample_duration(&self, rng: &mut dyn RngCore) -> Tick {
        let raw = self.duration.sample(rng).trunc();
        // `as` saturates: NaN and negatives become 0, +inf becomes u64::MAX
        (raw as Tick).max(1)
    }
}
