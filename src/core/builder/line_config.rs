//! Serializable description of a production line.
//!
//! A `LineConfig` is pure data: machine types with their state tables,
//! buffers with their capacities, and machines wired between buffers by id.
//! `Line::from_config` validates and compiles it.

use crate::core::buffer::Buffer;
use crate::core::errors::ConfigError;
use crate::core::machine_config::MachineConfig;
use crate::core::sampler::SamplerSpec;
use crate::core::state::MachineState;
use crate::core::types::{Capacity, StateId, Stock};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    pub machine_types: Vec<MachineTypeSpec>,
    pub buffers: Vec<BufferSpec>,
    /// Listed in execution order
    pub machines: Vec<MachineSpec>,
}

impl LineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineTypeSpec {
    pub name: String,
    pub states: Vec<StateSpec>,
}

impl MachineTypeSpec {
    pub fn new(name: impl Into<String>, states: Vec<StateSpec>) -> Self {
        Self {
            name: name.into(),
            states,
        }
    }

    pub fn build(&self) -> Result<MachineConfig, ConfigError> {
        let states = self
            .states
            .iter()
            .map(StateSpec::build)
            .collect::<Result<Vec<_>, _>>()?;
        MachineConfig::new(self.name.clone(), states)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    pub id: StateId,
    /// `(destination, relative weight)` pairs
    pub transitions: Vec<(StateId, f64)>,
    pub speed: SamplerSpec,
    pub duration: SamplerSpec,
}

impl StateSpec {
    pub fn new(
        id: StateId,
        transitions: &[(StateId, f64)],
        speed: SamplerSpec,
        duration: SamplerSpec,
    ) -> Self {
        Self {
            id,
            transitions: transitions.to_vec(),
            speed,
            duration,
        }
    }

    pub fn build(&self) -> Result<MachineState, ConfigError> {
        MachineState::new(
            self.id,
            &self.transitions,
            self.speed.build()?,
            self.duration.build()?,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferSpec {
    pub id: String,
    #[serde(default)]
    pub capacity: Capacity,
    #[serde(default)]
    pub stock: Stock,
}

impl BufferSpec {
    pub fn bounded(id: impl Into<String>, capacity: f64) -> Self {
        Self {
            id: id.into(),
            capacity: Capacity::Bounded(capacity),
            stock: Stock::default(),
        }
    }

    pub fn unbounded(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capacity: Capacity::Unbounded,
            stock: Stock::default(),
        }
    }

    /// Unbounded buffer that never runs dry
    pub fn source(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capacity: Capacity::Unbounded,
            stock: Stock::Inexhaustible,
        }
    }

    pub fn with_stock(mut self, stock: Stock) -> Self {
        self.stock = stock;
        self
    }

    pub fn build(&self) -> Result<Buffer, ConfigError> {
        Buffer::with_stock(self.id.clone(), self.capacity, self.stock)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSpec {
    pub name: String,
    pub machine_type: String,
    pub initial_state: StateId,
    /// Buffer id the machine pulls from
    pub input: String,
    /// Buffer id the machine pushes to
    pub output: String,
}

impl MachineSpec {
    pub fn new(
        name: impl Into<String>,
        machine_type: impl Into<String>,
        initial_state: StateId,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            machine_type: machine_type.into(),
            initial_state,
            input: input.into(),
            output: output.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE_JSON: &str = r#"{
        "machine_types": [
            {
                "name": "Capper",
                "states": [
                    {
                        "id": 0,
                        "transitions": [[128, 1.0]],
                        "speed": {"family": "constant", "value": 0.0},
                        "duration": {"family": "exponential", "loc": 1.0, "scale": 4.078}
                    },
                    {
                        "id": 128,
                        "transitions": [[0, 1.0]],
                        "speed": {"family": "discrete", "table": [[420.0, 0.13], [840.0, 0.46]]},
                        "duration": {
                            "family": "log_normal", "s": 1.406, "loc": -0.0136, "scale": 8.66
                        }
                    }
                ]
            }
        ],
        "buffers": [
            {"id": "in", "stock": "inexhaustible"},
            {"id": "out", "capacity": {"bounded": 3530.0}}
        ],
        "machines": [
            {
                "name": "Capper", "machine_type": "Capper", "initial_state": 128,
                "input": "in", "output": "out"
            }
        ]
    }"#;

    #[test]
    fn test_parse_line_json() {
        let config = LineConfig::from_json(LINE_JSON).unwrap();
        assert_eq!(config.machine_types.len(), 1);
        assert_eq!(config.machine_types[0].states[1].transitions, vec![(0, 1.0)]);
        assert_eq!(config.buffers[0], BufferSpec::source("in"));
        assert_eq!(config.buffers[1], BufferSpec::bounded("out", 3530.0));
        assert_eq!(config.machines[0].initial_state, 128);
    }

    #[test]
    fn test_json_round_trip_preserves_line() {
        let config = LineConfig::from_json(LINE_JSON).unwrap();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(LineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = LineConfig::from_json("{\"buffers\": 3}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_machine_type_build_validates_transitions() {
        let spec = MachineTypeSpec::new(
            "Depalletizer",
            vec![StateSpec::new(
                0,
                &[(128, 1.0)],
                SamplerSpec::constant(0.0),
                SamplerSpec::constant(1.0),
            )],
        );
        assert!(matches!(
            spec.build(),
            Err(ConfigError::UnresolvedTransition { from: 0, to: 128, .. })
        ));
    }
}
