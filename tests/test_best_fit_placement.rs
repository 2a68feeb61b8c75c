mod common;

use common::{input, part, pid, pids, run};
use fixed_partition_sim::DisciplineKind;
use fixed_partition_sim::domain::memory_model::simulation::SimulationWarning;

#[test]
fn test_processes_go_to_the_smallest_sufficient_partition() {
    let input = input(120, &[60, 20, 40], &[(15, 1.0), (35, 1.0), (55, 1.0), (18, 1.0)]);
    let report = run(&input, DisciplineKind::PerPartition);

    let layout = &report.initial_layout;
    let order: Vec<_> = layout.partitions.iter().map(|p| p.id).collect();
    assert_eq!(order, vec![part(2), part(3), part(1)], "partitions are scanned by ascending capacity");

    assert_eq!(layout.partitions[0].resident, Some(pid(1)));
    assert_eq!(layout.partitions[1].resident, Some(pid(2)));
    assert_eq!(layout.partitions[2].resident, Some(pid(3)));
    assert_eq!(layout.partitions[0].waiting, pids(&[4]));
    assert!(layout.shared_queue.is_empty());

    assert_eq!(report.statistics.memory_used, 15 + 35 + 55);
    assert_eq!(report.statistics.memory_remaining, 120 - 105);
}

#[test]
fn test_busy_best_fit_queues_instead_of_using_a_free_larger_partition() {
    let input = input(60, &[30, 30], &[(10, 1.0), (20, 1.0)]);

    let per_partition = run(&input, DisciplineKind::PerPartition);
    let layout = &per_partition.initial_layout;
    assert_eq!(layout.partitions[0].id, part(1));
    assert_eq!(layout.partitions[0].waiting, pids(&[2]));
    assert_eq!(layout.partitions[1].resident, None);

    let shared = run(&input, DisciplineKind::Shared);
    assert_eq!(shared.initial_layout.shared_queue, pids(&[2]));
    assert_eq!(shared.initial_layout.partitions[1].resident, None);
    assert!(shared.executions.iter().all(|record| record.partition_id == part(1)));
}

#[test]
fn test_occupancy_is_capped_by_capacity_when_promoting_an_oversized_process() {
    let input = input(10, &[10], &[(5, 1.0), (20, 1.0)]);
    let report = run(&input, DisciplineKind::Shared);

    assert_eq!(report.initial_layout.shared_queue, pids(&[2]));
    assert_eq!(report.initial_layout.partitions[0].occupied, 5);

    let first_round = &report.rounds[0];
    assert_eq!(first_round.promoted, pids(&[2]));
    assert_eq!(first_round.occupancy[0].occupied, 10);

    for round in &report.rounds {
        for occupancy in &round.occupancy {
            assert!(occupancy.occupied <= occupancy.capacity);
        }
    }
    assert_eq!(report.statistics.executed_count, 2);
}

#[test]
fn test_unplaceable_process_is_reported_under_per_partition_discipline() {
    let input = input(10, &[10], &[(20, 4.0)]);
    let report = run(&input, DisciplineKind::PerPartition);

    assert_eq!(report.warnings, vec![SimulationWarning::UnplaceableProcess { process_id: pid(1), size: 20, largest_partition: Some(10) }]);
    assert!(report.executions.is_empty());
    assert!(report.rounds.is_empty());
    assert_eq!(report.statistics.unplaceable_count, 1);
    assert_eq!(report.statistics.total_execution_time, 0.0);
    assert_eq!(report.statistics.time_utilization, 0.0);
}

#[test]
fn test_every_process_is_either_executed_or_unplaceable() {
    let input = input(200, &[20, 50, 80], &[(10, 2.0), (90, 1.0), (45, 3.0), (80, 2.5), (15, 1.0), (120, 1.0), (60, 4.0), (20, 0.5)]);
    let report = run(&input, DisciplineKind::PerPartition);

    let mut accounted = report.executed();
    accounted.extend(report.unplaceable());
    accounted.sort();

    assert_eq!(accounted, pids(&[1, 2, 3, 4, 5, 6, 7, 8]));
    assert_eq!(report.unplaceable(), pids(&[2, 6]));
    assert!(report.final_layout.is_empty());
}
