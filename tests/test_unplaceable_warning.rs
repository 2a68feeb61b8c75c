mod common;

use common::input;
use fixed_partition_sim::{DisciplineKind, SimulationOptions, StatsCollector, simulate};
use logtest::Logger;

#[test]
fn test_unplaceable_process_is_logged_as_warning() {
    let mut logger = Logger::start();

    let input = input(10, &[10], &[(20, 1.0), (5, 1.0)]);
    let mut stats = StatsCollector::disabled();
    let report = simulate(&input, DisciplineKind::PerPartition, SimulationOptions::default(), &mut stats).expect("run should drain");

    assert_eq!(report.statistics.executed_count, 1);
    assert_eq!(report.statistics.unplaceable_count, 1);

    let warning = logger.find(|record| record.level() == log::Level::Warn && record.args().contains("UnplaceableProcess"));
    assert!(warning.is_some(), "expected an UnplaceableProcess warning in the log");
}
