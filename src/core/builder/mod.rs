pub mod line_builder;
pub mod line_config;

pub use line_builder::{Line, LineBuilder};
pub use line_config::{BufferSpec, LineConfig, MachineSpec, MachineTypeSpec, StateSpec};
