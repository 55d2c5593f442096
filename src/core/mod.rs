pub mod buffer;
pub mod builder;
pub mod errors;
pub mod event;
pub mod execution;
pub mod machine;
pub mod machine_config;
pub mod sampler;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
