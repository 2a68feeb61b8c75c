use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::api::scenario_dto::ScenarioDto;
use crate::error::Result;

/// Parses a JSON file into a given type `T`.
///
/// Errors are automatically converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path)?;
    let parsed_data: T = serde_json::from_str(&data)?;
    Ok(parsed_data)
}

pub fn write_json_file<T: Serialize>(file_path: impl AsRef<Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(file_path, json)?;
    Ok(())
}

/// Loads a scenario file (memory size, partitions, processes and optional run options).
pub fn load_scenario(file_path: impl AsRef<Path>) -> Result<ScenarioDto> {
    let path = file_path.as_ref();
    log::info!("Loading scenario from path: '{}'...", path.display());

    let scenario: ScenarioDto = parse_json_file(path)?;
    log::info!(
        "Scenario parsed: memory size {}, {} partition(s), {} process(es).",
        scenario.memory_size,
        scenario.partitions.len(),
        scenario.processes.len()
    );

    Ok(scenario)
}
