use crate::core::builder::line_config::{BufferSpec, LineConfig};
use crate::core::errors::ConfigError;
use crate::core::execution::cycle_engine::CycleEngine;
use crate::core::machine::Machine;
use crate::core::machine_config::MachineConfig;
use crate::core::types::{BufferId, RunId, StateId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Machine wiring with every reference already resolved
#[derive(Debug, Clone)]
struct MachinePlan {
    name: String,
    config: Arc<MachineConfig>,
    initial_state: StateId,
    input: BufferId,
    output: BufferId,
}

/// Imperative API for wiring a production line
///
/// Machine types, buffers and machines are registered by name and every
/// reference is checked as soon as it is added. Machines execute in the order
/// they are added.
#[derive(Default)]
pub struct LineBuilder {
    machine_types: HashMap<String, Arc<MachineConfig>>,
    buffers: Vec<BufferSpec>,
    buffer_ids: HashMap<String, BufferId>,
    machines: Vec<MachinePlan>,
    machine_names: HashSet<String>,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a machine type, shared by every machine that uses it
    pub fn add_machine_type(
        &mut self,
        config: MachineConfig,
    ) -> Result<Arc<MachineConfig>, ConfigError> {
        if self.machine_types.contains_key(config.name()) {
            return Err(ConfigError::DuplicateMachineType(config.name().to_string()));
        }
        let config = Arc::new(config);
        self.machine_types
            .insert(config.name().to_string(), Arc::clone(&config));
        Ok(config)
    }

    /// Register a buffer; capacity and initial stock are validated here
    pub fn add_buffer(&mut self, spec: BufferSpec) -> Result<BufferId, ConfigError> {
        if self.buffer_ids.contains_key(&spec.id) {
            return Err(ConfigError::DuplicateBuffer(spec.id));
        }
        spec.build()?;
        let id = BufferId(self.buffers.len());
        self.buffer_ids.insert(spec.id.clone(), id);
        self.buffers.push(spec);
        Ok(id)
    }

    /// Register a machine between two buffers.
    ///
    /// Several machines may share an input or output buffer.
    pub fn add_machine(
        &mut self,
        name: &str,
        machine_type: &str,
        initial_state: StateId,
        input: &str,
        output: &str,
    ) -> Result<(), ConfigError> {
        if self.machine_names.contains(name) {
            return Err(ConfigError::DuplicateMachine(name.to_string()));
        }
        let config = self
            .machine_types
            .get(machine_type)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownMachineType(machine_type.to_string()))?;
        config.resolve(initial_state)?;
        let input = self.buffer_id(input)?;
        let output = self.buffer_id(output)?;

        self.machine_names.insert(name.to_string());
        self.machines.push(MachinePlan {
            name: name.to_string(),
            config,
            initial_state,
            input,
            output,
        });
        Ok(())
    }

    fn buffer_id(&self, name: &str) -> Result<BufferId, ConfigError> {
        self.buffer_ids
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownBuffer(name.to_string()))
    }

    pub fn build(self) -> Line {
        Line {
            buffers: self.buffers,
            machines: self.machines,
        }
    }
}

/// Validated, immutable blueprint of a line.
///
/// Each run instantiates its own buffers and machines from the blueprint while
/// sharing the machine types read-only, so runs never observe each other.
#[derive(Debug, Clone)]
pub struct Line {
    buffers: Vec<BufferSpec>,
    machines: Vec<MachinePlan>,
}

impl Line {
    /// Compile a data configuration
    pub fn from_config(config: &LineConfig) -> Result<Self, ConfigError> {
        let mut builder = LineBuilder::new();
        for spec in &config.machine_types {
            builder.add_machine_type(spec.build()?)?;
        }
        for spec in &config.buffers {
            builder.add_buffer(spec.clone())?;
        }
        for spec in &config.machines {
            builder.add_machine(
                &spec.name,
                &spec.machine_type,
                spec.initial_state,
                &spec.input,
                &spec.output,
            )?;
        }
        Ok(builder.build())
    }

    /// Fresh engine for one run, with empty counters and initial stocks
    pub fn instantiate(&self, run_id: RunId, seed: u64) -> Result<CycleEngine, ConfigError> {
        let mut engine = CycleEngine::new(run_id, seed);
        for spec in &self.buffers {
            engine.add_buffer(spec.build()?);
        }
        for plan in &self.machines {
            let machine = Machine::new(
                plan.name.clone(),
                Arc::clone(&plan.config),
                plan.initial_state,
                plan.input,
                plan.output,
            )?;
            engine.add_machine(machine)?;
        }
        Ok(engine)
    }

    /// Machine names in execution order
    pub fn machine_names(&self) -> Vec<&str> {
        self.machines.iter().map(|plan| plan.name.as_str()).collect()
    }

    pub fn buffer_names(&self) -> Vec<&str> {
        self.buffers.iter().map(|spec| spec.id.as_str()).collect()
    }
}
