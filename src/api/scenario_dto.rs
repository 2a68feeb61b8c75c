use serde::{Deserialize, Serialize};

use crate::domain::memory_model::scheduler::PromotionPolicy;
use crate::domain::memory_model::simulation::{DisciplineChoice, SimulationInput};
use crate::domain::simulator::clock::ClockModel;

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDto {
    pub memory_size: u64,
    pub partitions: Vec<PartitionDto>,
    pub processes: Vec<ProcessDto>,
    #[serde(default)]
    pub options: ScenarioOptionsDto,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDto {
    pub size: u64,
    pub time_needed: f64,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionDto {
    pub size: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioOptionsDto {
    pub discipline: DisciplineChoice,
    pub clock: ClockModel,
    pub promotion: PromotionPolicy,
}

impl ScenarioDto {
    pub fn from_input(input: &SimulationInput, options: ScenarioOptionsDto) -> Self {
        Self {
            memory_size: input.memory_size,
            partitions: input.partitions.iter().map(|p| PartitionDto { size: p.size }).collect(),
            processes: input.processes.iter().map(|p| ProcessDto { size: p.size, time_needed: p.time_needed }).collect(),
            options,
        }
    }
}
