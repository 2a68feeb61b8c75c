#![allow(dead_code)]

use fixed_partition_sim::domain::memory_model::simulation::{PartitionSpec, ProcessSpec, SimulationInput};
use fixed_partition_sim::domain::memory_model::utils::id::{PartitionId, ProcessId};
use fixed_partition_sim::{DisciplineKind, RunReport, SimulationOptions, StatsCollector, simulate};

pub fn input(memory_size: u64, partitions: &[u64], processes: &[(u64, f64)]) -> SimulationInput {
    SimulationInput::new(
        memory_size,
        processes.iter().map(|(size, time_needed)| ProcessSpec { size: *size, time_needed: *time_needed }).collect(),
        partitions.iter().map(|size| PartitionSpec { size: *size }).collect(),
    )
}

pub fn run(input: &SimulationInput, kind: DisciplineKind) -> RunReport {
    run_with(input, kind, SimulationOptions::default())
}

pub fn run_with(input: &SimulationInput, kind: DisciplineKind, options: SimulationOptions) -> RunReport {
    let mut stats = StatsCollector::disabled();
    simulate(input, kind, options, &mut stats).expect("simulation should drain")
}

pub fn pids(ids: &[u32]) -> Vec<ProcessId> {
    ids.iter().map(|id| ProcessId::new(*id)).collect()
}

pub fn pid(id: u32) -> ProcessId {
    ProcessId::new(id)
}

pub fn part(id: u32) -> PartitionId {
    PartitionId::new(id)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
}

pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("fixed_partition_sim_{}_{}", std::process::id(), name))
}
