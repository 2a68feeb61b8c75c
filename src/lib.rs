use std::path::Path;

use crate::api::scenario_dto::ScenarioOptionsDto;
use crate::domain::memory_model::simulation::SimulationInput;
use crate::error::Result;
use crate::loader::parser::load_scenario;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

pub use domain::memory_model::discipline::DisciplineKind;
pub use domain::memory_model::scheduler::PromotionPolicy;
pub use domain::memory_model::simulation::{Comparison, RunReport, SimulationOptions, compare_disciplines, simulate};
pub use domain::memory_model::utils::statistics::StatsCollector;
pub use domain::simulator::clock::ClockModel;

/// Loads a scenario file and checks it can be simulated.
///
/// # Returns
/// Returns the validated input together with the run options stored in the file.
pub fn load_simulation_input(file_path: impl AsRef<Path>) -> Result<(SimulationInput, ScenarioOptionsDto)> {
    let scenario = load_scenario(file_path)?;

    let input = SimulationInput::from_dto(&scenario);
    input.validate()?;
    log::info!("Scenario validated: {} partition(s) within {} memory.", input.partitions.len(), input.memory_size);

    Ok((input, scenario.options))
}
