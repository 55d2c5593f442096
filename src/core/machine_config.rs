use super::errors::ConfigError;
use super::state::MachineState;
use super::types::StateId;
use std::collections::HashMap;

/// Registry of the states of one machine type.
///
/// Built once, then shared read-only by every machine of that type.
#[derive(Debug)]
pub struct MachineConfig {
    name: String,
    states: Vec<MachineState>,
    positions: HashMap<StateId, usize>,
}

impl MachineConfig {
    /// Create a config, checking that ids are unique and that every
    /// transition lands on a defined state
    pub fn new(name: impl Into<String>, states: Vec<MachineState>) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut positions = HashMap::with_capacity(states.len());
        for (position, state) in states.iter().enumerate() {
            if positions.insert(state.id(), position).is_some() {
                return Err(ConfigError::DuplicateState {
                    machine_type: name,
                    state_id: state.id(),
                });
            }
        }

        for state in &states {
            if let Some(to) = state
                .destinations()
                .iter()
                .find(|to| !positions.contains_key(*to))
            {
                return Err(ConfigError::UnresolvedTransition {
                    machine_type: name,
                    from: state.id(),
                    to: *to,
                });
            }
        }

        Ok(Self {
            name,
            states,
            positions,
        })
    }

    /// Look up a state by id
    pub fn resolve(&self, state_id: StateId) -> Result<&MachineState, ConfigError> {
        self.position(state_id).map(|position| &self.states[position])
    }

    pub(crate) fn position(&self, state_id: StateId) -> Result<usize, ConfigError> {
        self.positions
            .get(&state_id)
            .copied()
            .ok_or_else(|| ConfigError::UnknownState {
                machine_type: self.name.clone(),
                state_id,
            })
    }

    pub(crate) fn state_at(&self, position: usize) -> &MachineState {
        &self.states[position]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &[MachineState] {
        &self.states
    }
}
