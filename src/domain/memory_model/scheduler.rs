use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::memory_model::discipline::QueueDiscipline;
use crate::domain::memory_model::partition::{PartitionSlot, PartitionTable};
use crate::domain::memory_model::process::{ProcessState, ProcessStore};
use crate::domain::memory_model::utils::id::{PartitionId, ProcessId};
use crate::domain::memory_model::utils::statistics::{StatParameter, StatisticEvent, StatsCollector};
use crate::domain::simulator::clock::{ClockModel, SimulationClock};
use crate::error::{Error, Result};

/// Whether a freed partition re-checks fit before taking the queue front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromotionPolicy {
    /// Promote the front into the freed partition unconditionally; an oversized process is
    /// loaded up to the partition capacity.
    #[default]
    AnyFree,
    /// Promote the front only if it fits. Idle partitions retry the front at the end of every
    /// round, so a process that fits nowhere ends the run with `StalledDrain`.
    BestFitOnly,
}

impl fmt::Display for PromotionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionPolicy::AnyFree => f.write_str("any-free"),
            PromotionPolicy::BestFitOnly => f.write_str("best-fit-only"),
        }
    }
}

impl FromStr for PromotionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any-free" => Ok(PromotionPolicy::AnyFree),
            "best-fit-only" | "best-fit" => Ok(PromotionPolicy::BestFitOnly),
            other => Err(format!("unknown promotion policy '{}', expected 'any-free' or 'best-fit-only'", other)),
        }
    }
}

/// One finished execution. Replaces the process once it has been released.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRecord {
    pub process_id: ProcessId,
    pub partition_id: PartitionId,
    pub round: usize,
    pub size: u64,
    pub time_needed: f64,
    /// Waiting time accrued before the process started executing.
    pub waiting_time: f64,
    pub started_at: f64,
    pub finished_at: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionOccupancy {
    pub partition_id: PartitionId,
    pub occupied: u64,
    pub capacity: u64,
}

/// State of the system at the end of a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round: usize,
    pub executed: Vec<ProcessId>,
    pub promoted: Vec<ProcessId>,
    pub waiting: usize,
    pub occupancy: Vec<PartitionOccupancy>,
    pub clock: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DrainTotals {
    pub total_execution_time: f64,
    pub total_waiting_time: f64,
    pub total_running_time: f64,
    pub executions: Vec<ExecutionRecord>,
    pub rounds: Vec<RoundSummary>,
}

/// Checks the residency invariants at every round boundary and snapshots occupancy.
#[derive(Debug, Default)]
struct RoundObserver;

impl RoundObserver {
    fn observe(&self, store: &ProcessStore, table: &PartitionTable, discipline: &dyn QueueDiscipline) -> Vec<PartitionOccupancy> {
        for partition in table.iter() {
            debug_assert!(partition.occupied() <= partition.capacity, "{} occupies more than its capacity", partition.id);

            if let Some(key) = partition.resident() {
                let process = store.get(key);
                debug_assert!(process.is_some(), "{} holds a released process", partition.id);
                if let Some(process) = process {
                    debug_assert_eq!(process.state, ProcessState::Resident, "{} resident is not marked resident", process.id);
                    debug_assert_eq!(process.assigned_partition, Some(partition.id), "{} assignment mismatch", process.id);
                }
            }
        }

        for key in discipline.peek_all() {
            if let Some(process) = store.get(key) {
                debug_assert_eq!(process.state, ProcessState::Waiting, "{} is queued but not waiting", process.id);
            }
        }

        table.iter().map(|p| PartitionOccupancy { partition_id: p.id, occupied: p.occupied(), capacity: p.capacity }).collect()
    }
}

/// Round-based execution loop that drains partitions and waiting collections to empty.
///
/// A round executes every busy partition's resident for its full `time_needed`, releases it and
/// promotes the next waiting process into the freed partition. Afterwards every process still
/// waiting, anywhere in the system, accrues the `time_needed` of each partition's new resident.
#[derive(Debug)]
pub struct ExecutionScheduler {
    promotion: PromotionPolicy,
    clock: Box<dyn SimulationClock>,
    observer: RoundObserver,
}

impl ExecutionScheduler {
    pub fn new(promotion: PromotionPolicy, clock: ClockModel) -> Self {
        Self { promotion, clock: clock.build(), observer: RoundObserver }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn is_drained(table: &PartitionTable, discipline: &dyn QueueDiscipline) -> bool {
        table.all_idle() && discipline.is_empty()
    }

    /// Runs rounds until every partition is idle and every waiting collection is empty.
    ///
    /// # Returns
    /// Returns the run totals, or `Error::StalledDrain` as soon as a round starts with processes
    /// waiting but no partition busy.
    pub fn drain(
        &mut self,
        store: &mut ProcessStore,
        table: &mut PartitionTable,
        discipline: &mut dyn QueueDiscipline,
        stats: &mut StatsCollector,
    ) -> Result<DrainTotals> {
        let mut totals = DrainTotals::default();
        let mut round = 0;

        while !Self::is_drained(table, discipline) {
            round += 1;

            let busy = table.busy_slots();
            if busy.is_empty() {
                let waiting = discipline.len();
                log::error!("StalledDrain: round {} starts with {} waiting process(es) and no busy partition.", round, waiting);
                return Err(Error::StalledDrain { round, waiting });
            }

            let mut executed = Vec::new();
            let mut promoted = Vec::new();

            for slot in busy {
                if let Some(record) = self.execute(slot, round, store, table, discipline, stats) {
                    totals.total_execution_time += record.time_needed;
                    totals.total_waiting_time += record.waiting_time;
                    executed.push(record.process_id);
                    totals.executions.push(record);
                }

                if let Some(process_id) = self.promote(slot, store, table, discipline) {
                    promoted.push(process_id);
                }
            }

            if self.promotion == PromotionPolicy::BestFitOnly {
                for slot in table.idle_slots() {
                    if let Some(process_id) = self.promote(slot, store, table, discipline) {
                        promoted.push(process_id);
                    }
                }
            }

            self.accrue_waiting_time(store, table, discipline);
            self.clock.close_round();

            let occupancy = self.observer.observe(store, table, discipline);
            let summary = RoundSummary { round, executed, promoted, waiting: discipline.len(), occupancy, clock: self.clock.now() };
            self.record_round(&summary, table, discipline, stats);
            totals.rounds.push(summary);
        }

        totals.total_running_time = self.clock.now();
        log::info!(
            "Drained after {} round(s): execution {:.2}, running {:.2}, waiting {:.2}.",
            round,
            totals.total_execution_time,
            totals.total_running_time,
            totals.total_waiting_time
        );

        Ok(totals)
    }

    /// Runs the resident of `slot` to completion and releases it.
    fn execute(
        &mut self,
        slot: PartitionSlot,
        round: usize,
        store: &mut ProcessStore,
        table: &mut PartitionTable,
        discipline: &dyn QueueDiscipline,
        stats: &mut StatsCollector,
    ) -> Option<ExecutionRecord> {
        let partition = table.get_mut(slot)?;
        let (partition_id, capacity, occupied) = (partition.id, partition.capacity, partition.occupied());
        let key = partition.release()?;

        let Some(mut process) = store.remove(key) else {
            log::error!("ResidentNotFound: {} released a process that is missing from the ProcessStore.", partition_id);
            return None;
        };
        process.exit_from_partition();

        let (started_at, finished_at) = self.clock.run_for(process.time_needed);
        log::info!("Executing {} in {} for {:.2} time units.", process.id, partition_id, process.time_needed);

        let mut event = StatisticEvent::new();
        event
            .set(StatParameter::Time, started_at)
            .set(StatParameter::Round, round)
            .set(StatParameter::LogDescription, "execute")
            .set(StatParameter::Discipline, discipline.kind().as_str())
            .set(StatParameter::PartitionId, partition_id.id)
            .set(StatParameter::PartitionCapacity, capacity)
            .set(StatParameter::PartitionOccupied, occupied)
            .set(StatParameter::ProcessId, process.id.id)
            .set(StatParameter::ProcessSize, process.size)
            .set(StatParameter::TimeNeeded, process.time_needed)
            .set(StatParameter::WaitingTime, process.waiting_time);
        stats.add_event(&event);

        Some(ExecutionRecord {
            process_id: process.id,
            partition_id,
            round,
            size: process.size,
            time_needed: process.time_needed,
            waiting_time: process.waiting_time,
            started_at,
            finished_at,
        })
    }

    /// Moves the next waiting process of `slot` into that (idle) partition.
    fn promote(&self, slot: PartitionSlot, store: &mut ProcessStore, table: &mut PartitionTable, discipline: &mut dyn QueueDiscipline) -> Option<ProcessId> {
        let partition = table.get_mut(slot)?;
        if !partition.is_idle() {
            return None;
        }

        let front = discipline.front(slot)?;
        if self.promotion == PromotionPolicy::BestFitOnly {
            let size = store.get(front)?.size;
            if !partition.fits(size) {
                log::debug!("Queue front (size {}) does not fit {} (capacity {}), partition stays idle.", size, partition.id, partition.capacity);
                return None;
            }
        }

        let key = discipline.dequeue(slot)?;
        let process = store.get_mut(key)?;
        if !partition.admit(key, process) {
            return None;
        }

        log::debug!("{} promoted into {} after waiting {:.2}.", process.id, partition.id, process.waiting_time);
        Some(process.id)
    }

    /// Charges each busy partition's resident duration to every process still waiting.
    fn accrue_waiting_time(&self, store: &mut ProcessStore, table: &PartitionTable, discipline: &dyn QueueDiscipline) {
        let waiting = discipline.peek_all();
        if waiting.is_empty() {
            return;
        }

        for partition in table.iter() {
            let Some(time_needed) = partition.resident().and_then(|key| store.get(key)).map(|p| p.time_needed) else {
                continue;
            };

            for key in &waiting {
                if let Some(process) = store.get_mut(*key) {
                    process.waiting_time += time_needed;
                }
            }
            log::trace!("{} waiting process(es) accrue {:.2} behind {}.", waiting.len(), time_needed, partition.id);
        }
    }

    fn record_round(&self, summary: &RoundSummary, table: &PartitionTable, discipline: &dyn QueueDiscipline, stats: &mut StatsCollector) {
        let mut event = StatisticEvent::new();
        event
            .set(StatParameter::Time, summary.clock)
            .set(StatParameter::Round, summary.round)
            .set(StatParameter::LogDescription, "round")
            .set(StatParameter::Discipline, discipline.kind().as_str())
            .set(StatParameter::PartitionOccupied, table.memory_used())
            .set(StatParameter::WaitingProcesses, summary.waiting)
            .set(StatParameter::BusyPartitions, table.busy_slots().len());
        stats.add_event(&event);
    }
}
