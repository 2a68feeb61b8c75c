mod common;

use std::fs;

use common::temp_path;
use fixed_partition_sim::api::scenario_dto::ScenarioDto;
use fixed_partition_sim::domain::memory_model::simulation::DisciplineChoice;
use fixed_partition_sim::error::Error;
use fixed_partition_sim::loader::generator::RandomScenario;
use fixed_partition_sim::loader::parser::{parse_json_file, write_json_file};
use fixed_partition_sim::{ClockModel, PromotionPolicy, load_simulation_input};

#[test]
fn test_scenario_with_options_is_loaded() {
    let path = temp_path("with_options.json");
    fs::write(
        &path,
        r#"{
            "memorySize": 100,
            "partitions": [{ "size": 40 }, { "size": 60 }],
            "processes": [
                { "size": 30, "timeNeeded": 2.0 },
                { "size": 50, "timeNeeded": 3.5 }
            ],
            "options": { "discipline": "shared", "clock": "concurrent", "promotion": "best-fit-only" }
        }"#,
    )
    .unwrap();

    let (input, options) = load_simulation_input(&path).expect("scenario should load");
    fs::remove_file(&path).ok();

    assert_eq!(input.memory_size, 100);
    assert_eq!(input.partitions.len(), 2);
    assert_eq!(input.processes[1].size, 50);
    assert_eq!(input.processes[1].time_needed, 3.5);
    assert_eq!(options.discipline, DisciplineChoice::Shared);
    assert_eq!(options.clock, ClockModel::Concurrent);
    assert_eq!(options.promotion, PromotionPolicy::BestFitOnly);
}

#[test]
fn test_missing_options_fall_back_to_defaults() {
    let path = temp_path("defaults.json");
    fs::write(&path, r#"{ "memorySize": 10, "partitions": [{ "size": 10 }], "processes": [] }"#).unwrap();

    let (_, options) = load_simulation_input(&path).expect("scenario should load");
    fs::remove_file(&path).ok();

    assert_eq!(options.discipline, DisciplineChoice::Both);
    assert_eq!(options.clock, ClockModel::Sequential);
    assert_eq!(options.promotion, PromotionPolicy::AnyFree);
}

#[test]
fn test_oversized_partitioning_is_rejected_on_load() {
    let path = temp_path("oversized.json");
    fs::write(&path, r#"{ "memorySize": 50, "partitions": [{ "size": 60 }], "processes": [{ "size": 5, "timeNeeded": 1.0 }] }"#).unwrap();

    let result = load_simulation_input(&path);
    fs::remove_file(&path).ok();

    assert!(matches!(result, Err(Error::ConfigurationError { total_partition_size: 60, memory_size: 50 })));
}

#[test]
fn test_malformed_and_missing_files_map_to_distinct_errors() {
    let path = temp_path("malformed.json");
    fs::write(&path, "{ \"memorySize\": ").unwrap();

    assert!(matches!(load_simulation_input(&path), Err(Error::DeserializationError(_))));
    fs::remove_file(&path).ok();

    assert!(matches!(load_simulation_input(temp_path("does_not_exist.json")), Err(Error::IoError(_))));
}

#[test]
fn test_generated_scenario_can_be_saved_and_reloaded() {
    let input = RandomScenario::new(300, 3).with_process_count(6).with_seed(11).generate();
    let path = temp_path("generated.json");

    write_json_file(&path, &ScenarioDto::from_input(&input, Default::default())).expect("scenario should be written");
    let reloaded: ScenarioDto = parse_json_file(&path).expect("scenario should parse");
    fs::remove_file(&path).ok();

    assert_eq!(reloaded.memory_size, 300);
    assert_eq!(reloaded.processes.len(), 6);
    assert_eq!(reloaded.partitions.len(), input.partitions.len());
    assert_eq!(reloaded.processes[0].time_needed, input.processes[0].time_needed);
}
