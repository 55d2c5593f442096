pub mod core;
pub mod lines;
pub mod report;

// Re-export commonly used types
pub use crate::core::buffer::Buffer;
pub use crate::core::builder::{BufferSpec, Line, LineBuilder, LineConfig, MachineSpec};
pub use crate::core::errors::{ConfigError, SimulationError};
pub use crate::core::event::Event;
pub use crate::core::execution::{
    run_batch, BatchReport, ConcurrencyMode, CycleEngine, SimulationConfig, SimulationEngine,
};
pub use crate::core::machine::Machine;
pub use crate::core::machine_config::MachineConfig;
pub use crate::core::sampler::{Sampler, SamplerSpec};
pub use crate::core::state::MachineState;
pub use crate::core::types::{BufferId, Capacity, RunId, StateId, Stock, Tick};
