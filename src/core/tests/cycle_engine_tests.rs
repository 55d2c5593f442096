use crate::core::buffer::Buffer;
use crate::core::errors::ConfigError;
use crate::core::execution::cycle_engine::CycleEngine;
use crate::core::machine::Machine;
use crate::core::machine_config::MachineConfig;
use crate::core::sampler::Constant;
use crate::core::state::MachineState;
use crate::core::types::{BufferId, Capacity, Stock};
use std::sync::Arc;

// Machine type with a single state that never changes speed
fn steady(name: &str, speed: f64) -> Arc<MachineConfig> {
    let state = MachineState::new(
        128,
        &[(128, 1.0)],
        Box::new(Constant(speed)),
        Box::new(Constant(50.0)),
    )
    .unwrap();
    Arc::new(MachineConfig::new(name, vec![state]).unwrap())
}

#[test]
fn test_tick_advances_by_one_per_cycle() {
    let mut engine = CycleEngine::new(1, 0);
    let input = engine.add_buffer(Buffer::source("in"));
    let output = engine.add_buffer(Buffer::new("out", Capacity::Unbounded));
    engine
        .add_machine(Machine::new("A", steady("A", 10.0), 128, input, output).unwrap())
        .unwrap();

    assert_eq!(engine.current_tick(), 0);
    engine.cycle().unwrap();
    engine.cycle().unwrap();
    assert_eq!(engine.current_tick(), 2);

    let ticks: Vec<u64> = engine.events().iter().map(|event| event.tick).collect();
    assert_eq!(ticks, vec![0, 1]);
}

#[test]
fn test_every_machine_steps_once_per_tick_in_registration_order() {
    let mut engine = CycleEngine::new(3, 0);
    let b0 = engine.add_buffer(Buffer::source("b0"));
    let b1 = engine.add_buffer(Buffer::new("b1", Capacity::Bounded(1000.0)));
    let b2 = engine.add_buffer(Buffer::new("b2", Capacity::Unbounded));
    // registered downstream first: it must still execute first every tick
    engine
        .add_machine(Machine::new("Packer", steady("Packer", 5.0), 128, b1, b2).unwrap())
        .unwrap();
    engine
        .add_machine(Machine::new("Filler", steady("Filler", 5.0), 128, b0, b1).unwrap())
        .unwrap();

    for _ in 0..4 {
        engine.cycle().unwrap();
    }

    let order: Vec<(u64, &str)> = engine
        .events()
        .iter()
        .map(|event| (event.tick, event.machine.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (0, "Packer"),
            (0, "Filler"),
            (1, "Packer"),
            (1, "Filler"),
            (2, "Packer"),
            (2, "Filler"),
            (3, "Packer"),
            (3, "Filler"),
        ]
    );
    assert!(engine.events().iter().all(|event| event.run == 3));

    // Packer only sees parts Filler pushed on earlier ticks; starved on tick 0,
    // paused on tick 1, then keeps pace
    let packer = engine.machine("Packer").unwrap();
    assert!(engine.events()[0].lack);
    assert_eq!(engine.events()[2].requested_speed, 0.0);
    assert_eq!(packer.count(), 10.0);
}

#[test]
fn test_first_registered_machine_drains_shared_buffer_first() {
    let mut engine = CycleEngine::new(1, 0);
    let shared = engine.add_buffer(
        Buffer::with_stock("shared", Capacity::Bounded(100.0), Stock::Parts(100.0)).unwrap(),
    );
    let sink = engine.add_buffer(Buffer::new("sink", Capacity::Unbounded));
    engine
        .add_machine(Machine::new("Palletizer_1", steady("P1", 80.0), 128, shared, sink).unwrap())
        .unwrap();
    engine
        .add_machine(Machine::new("Palletizer_2", steady("P2", 80.0), 128, shared, sink).unwrap())
        .unwrap();

    engine.cycle().unwrap();

    let first = &engine.events()[0];
    let second = &engine.events()[1];
    assert_eq!(first.actual_speed, 80.0);
    assert!(!first.lack);
    assert_eq!(second.actual_speed, 20.0);
    assert!(second.lack);
    assert_eq!(engine.buffer(sink).unwrap().current_parts(), 100.0);
}

#[test]
fn test_starved_machine_end_to_end() {
    let mut engine = CycleEngine::new(1, 0);
    let input = engine.add_buffer(
        Buffer::with_stock("in", Capacity::Unbounded, Stock::Parts(200.0)).unwrap(),
    );
    let output = engine.add_buffer(Buffer::new("out", Capacity::Unbounded));
    engine
        .add_machine(Machine::new("Filler", steady("Filler", 500.0), 128, input, output).unwrap())
        .unwrap();

    engine.cycle().unwrap();

    let event = &engine.events()[0];
    assert!(event.lack && !event.tailback);
    assert_eq!(event.actual_speed, 200.0);
    assert_eq!(event.count, 200.0);
}

#[test]
fn test_blocked_machine_end_to_end() {
    let mut engine = CycleEngine::new(1, 0);
    let input = engine.add_buffer(Buffer::source("in"));
    let output = engine.add_buffer(
        Buffer::with_stock("out", Capacity::Bounded(50.0), Stock::Parts(50.0)).unwrap(),
    );
    engine
        .add_machine(Machine::new("Filler", steady("Filler", 500.0), 128, input, output).unwrap())
        .unwrap();

    engine.cycle().unwrap();

    let event = &engine.events()[0];
    assert!(event.tailback && !event.lack);
    assert_eq!(event.actual_speed, 0.0);
    assert_eq!(engine.machine("Filler").unwrap().idle_parts(), 500.0);
}

#[test]
fn test_machine_with_unregistered_buffer_rejected() {
    let mut engine = CycleEngine::new(1, 0);
    let input = engine.add_buffer(Buffer::source("in"));
    let machine = Machine::new("Filler", steady("Filler", 1.0), 128, input, BufferId(7)).unwrap();

    assert!(matches!(
        engine.add_machine(machine),
        Err(ConfigError::UnknownBuffer(_))
    ));
    assert!(engine.machines().is_empty());
}
