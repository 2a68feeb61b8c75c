use crate::domain::memory_model::discipline::QueueDiscipline;
use crate::domain::memory_model::partition::PartitionTable;
use crate::domain::memory_model::process::ProcessStore;
use crate::domain::memory_model::simulation::SimulationWarning;

/// What the allocator hands over to the scheduler besides the mutated partition/queue state.
#[derive(Debug, Clone, Default)]
pub struct PlacementOutcome {
    pub admitted: usize,
    pub queued: usize,
    pub warnings: Vec<SimulationWarning>,
    /// Sum of partition occupancy right after placement.
    pub memory_used: u64,
}

/// Best-fit placement over a capacity-sorted partition table.
///
/// Each process, in input order, goes to the first (smallest) partition whose capacity is at
/// least its size. An idle target takes it as resident; a busy target queues it through the
/// discipline, so the process waits behind the partition it best fits rather than the least
/// loaded one. A process no partition can hold is offered to the discipline as unfit: the
/// shared queue keeps it, the per-partition queues refuse it and it is reported unplaceable.
#[derive(Debug, Default)]
pub struct BestFitAllocator;

impl BestFitAllocator {
    pub fn new() -> Self {
        Self
    }

    pub fn place(&self, store: &mut ProcessStore, table: &mut PartitionTable, discipline: &mut dyn QueueDiscipline) -> PlacementOutcome {
        let mut outcome = PlacementOutcome::default();
        let order = store.input_order().to_vec();

        log::info!("Placing {} process(es) into {} partition(s) using the {} discipline.", order.len(), table.len(), discipline.kind());

        for key in order {
            let Some(process) = store.get_mut(key) else {
                continue;
            };

            match table.best_fit(process.size) {
                Some(slot) => {
                    let Some(partition) = table.get_mut(slot) else {
                        continue;
                    };

                    if partition.admit(key, process) {
                        log::debug!("{} (size {}) placed into {} (capacity {}).", process.id, process.size, partition.id, partition.capacity);
                        outcome.admitted += 1;
                    } else {
                        log::debug!("{} (size {}) queued behind busy {}.", process.id, process.size, partition.id);
                        process.mark_waiting();
                        discipline.enqueue(slot, key);
                        outcome.queued += 1;
                    }
                }
                None => {
                    if discipline.enqueue_unfit(key) {
                        log::debug!("{} (size {}) fits no partition, waiting in the shared queue.", process.id, process.size);
                        process.mark_waiting();
                        outcome.queued += 1;
                    } else {
                        let warning = SimulationWarning::UnplaceableProcess {
                            process_id: process.id,
                            size: process.size,
                            largest_partition: table.largest_capacity(),
                        };
                        log::warn!("{}", warning);
                        process.mark_unplaceable();
                        outcome.warnings.push(warning);
                    }
                }
            }
        }

        outcome.memory_used = table.memory_used();
        log::info!(
            "Placement done: {} resident, {} waiting, {} unplaceable, {} memory in use.",
            outcome.admitted,
            outcome.queued,
            outcome.warnings.len(),
            outcome.memory_used
        );

        outcome
    }
}
