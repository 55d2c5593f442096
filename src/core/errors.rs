use super::types::StateId;
use thiserror::Error;

/// Defects in line or machine configuration. Never transient, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("state {state_id} is not found in machine '{machine_type}'")]
    UnknownState { machine_type: String, state_id: StateId },

    #[error("state {from} of machine '{machine_type}' transitions to undefined state {to}")]
    UnresolvedTransition {
        machine_type: String,
        from: StateId,
        to: StateId,
    },

    #[error("state {state_id} is defined more than once in machine '{machine_type}'")]
    DuplicateState { machine_type: String, state_id: StateId },

    #[error("invalid transition weights for state {state_id}: {reason}")]
    InvalidTransitionWeights { state_id: StateId, reason: String },

    #[error("invalid {family} distribution: {reason}")]
    InvalidDistribution { family: &'static str, reason: String },

    #[error("machine type '{0}' is not registered")]
    UnknownMachineType(String),

    #[error("machine type '{0}' is registered more than once")]
    DuplicateMachineType(String),

    #[error("buffer '{0}' is not registered")]
    UnknownBuffer(String),

    #[error("buffer '{0}' is registered more than once")]
    DuplicateBuffer(String),

    #[error("machine '{0}' is registered more than once")]
    DuplicateMachine(String),

    #[error("invalid buffer '{buffer}': {reason}")]
    InvalidBuffer { buffer: String, reason: String },

    #[error("failed to parse line configuration: {0}")]
    Parse(String),
}

/// Errors that abort a run or a batch
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("machine '{machine}' hit a configuration error: {source}")]
    Configuration {
        machine: String,
        #[source]
        source: ConfigError,
    },

    #[error("invalid line: {0}")]
    Line(#[from] ConfigError),

    #[error("failed to build run thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
