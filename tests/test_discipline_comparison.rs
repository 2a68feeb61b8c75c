mod common;

use common::{assert_close, input};
use fixed_partition_sim::loader::generator::RandomScenario;
use fixed_partition_sim::error::Error;
use fixed_partition_sim::{DisciplineKind, SimulationOptions, StatsCollector, compare_disciplines};

#[test]
fn test_comparison_runs_both_disciplines_on_fresh_state() {
    let input = input(100, &[40, 60], &[(30, 2.0), (50, 3.0), (45, 1.0)]);
    let mut stats = StatsCollector::disabled();
    let comparison = compare_disciplines(&input, SimulationOptions::default(), &mut stats).expect("both runs should drain");

    let per_partition = comparison.per_partition.as_ref().expect("per-partition run should drain");
    let shared = comparison.shared.as_ref().expect("shared run should drain");
    assert_eq!(per_partition.discipline, DisciplineKind::PerPartition);
    assert_eq!(shared.discipline, DisciplineKind::Shared);

    assert!(per_partition.initial_layout.shared_queue.is_empty());
    assert_eq!(shared.initial_layout.shared_queue.len(), 1);

    let rows = comparison.rows();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].0, "Total Execution Time");
    assert_close(rows[0].1.expect("per-partition value"), 6.0);
    assert_close(rows[0].2.expect("shared value"), 6.0);
}

#[test]
fn test_comparison_csv_has_one_row_per_metric() {
    let input = input(50, &[50], &[(10, 2.0), (20, 3.0), (30, 4.0)]);
    let mut stats = StatsCollector::disabled();
    let comparison = compare_disciplines(&input, SimulationOptions::default(), &mut stats).expect("both runs should drain");

    let mut buffer = Vec::new();
    comparison.write_csv(&mut buffer).expect("writing to memory should not fail");
    let csv = String::from_utf8(buffer).expect("csv output should be utf-8");
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "Metric;per-partition;shared");
    assert_eq!(lines[1], "Total Execution Time;9.000;9.000");
    assert_eq!(lines[3], "Total Waiting Time;3.000;3.000");
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_stalled_shared_run_keeps_the_per_partition_report() {
    let input = input(10, &[10], &[(20, 1.0)]);
    let mut stats = StatsCollector::disabled();
    let comparison = compare_disciplines(&input, SimulationOptions::default(), &mut stats).expect("input is valid");

    let per_partition = comparison.per_partition.as_ref().expect("per-partition run should report the process as unplaceable");
    assert_eq!(per_partition.unplaceable(), vec![common::pid(1)]);
    assert!(per_partition.executions.is_empty());
    assert!(matches!(comparison.shared, Err(Error::StalledDrain { round: 1, waiting: 1 })));

    let rows = comparison.rows();
    assert_eq!(rows[0], ("Total Execution Time", Some(0.0), None));

    let mut buffer = Vec::new();
    comparison.write_csv(&mut buffer).expect("writing to memory should not fail");
    let csv = String::from_utf8(buffer).expect("csv output should be utf-8");
    assert_eq!(csv.lines().nth(1), Some("Total Execution Time;0.000;NA"));

    let json = serde_json::to_value(&comparison).expect("comparison should serialize");
    assert_eq!(json["per_partition"]["report"]["discipline"], "per-partition");
    assert_eq!(json["shared"]["failed"]["discipline"], "shared");
    assert!(json["shared"]["failed"]["error"].as_str().is_some_and(|e| e.contains("stalled")));
}

#[test]
fn test_comparison_rejects_invalid_input_up_front() {
    let input = input(50, &[60], &[(10, 1.0)]);
    let mut stats = StatsCollector::disabled();
    let result = compare_disciplines(&input, SimulationOptions::default(), &mut stats);
    assert!(matches!(result, Err(Error::ConfigurationError { total_partition_size: 60, memory_size: 50 })));
}

#[test]
fn test_random_scenarios_conserve_processes_under_per_partition_queues() {
    for seed in 0..20 {
        let input = RandomScenario::new(400, 4).with_seed(seed).generate();
        let mut stats = StatsCollector::disabled();
        let report = fixed_partition_sim::simulate(&input, DisciplineKind::PerPartition, SimulationOptions::default(), &mut stats)
            .unwrap_or_else(|e| panic!("seed {} failed: {}", seed, e));

        let stats = &report.statistics;
        assert_eq!(stats.executed_count + stats.unplaceable_count, input.processes.len(), "seed {}", seed);
        assert!(stats.time_utilization >= 0.0 && stats.time_utilization <= 100.0, "seed {}", seed);
        assert!(input.total_partition_size().is_some_and(|total| stats.memory_used <= total), "seed {}", seed);
        assert!(report.final_layout.is_empty(), "seed {}", seed);

        for round in &report.rounds {
            assert!(round.occupancy.iter().all(|o| o.occupied <= o.capacity), "seed {}", seed);
        }
    }
}
