use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

use crate::api::scenario_dto::ScenarioDto;
use crate::domain::memory_model::discipline::{DisciplineKind, QueueDiscipline};
use crate::domain::memory_model::partition::{Partition, PartitionTable};
use crate::domain::memory_model::placement::BestFitAllocator;
use crate::domain::memory_model::process::{Process, ProcessStore};
use crate::domain::memory_model::run_statistics::RunStatistics;
use crate::domain::memory_model::scheduler::{ExecutionRecord, ExecutionScheduler, PromotionPolicy, RoundSummary};
use crate::domain::memory_model::utils::id::{PartitionId, ProcessId};
use crate::domain::memory_model::utils::statistics::{StatParameter, StatisticEvent, StatsCollector};
use crate::domain::simulator::clock::ClockModel;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSpec {
    pub size: u64,
    pub time_needed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionSpec {
    pub size: u64,
}

/// Everything the input layer supplies for a run. Ids are assigned 1-based by position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationInput {
    pub memory_size: u64,
    pub processes: Vec<ProcessSpec>,
    pub partitions: Vec<PartitionSpec>,
}

impl SimulationInput {
    pub fn new(memory_size: u64, processes: Vec<ProcessSpec>, partitions: Vec<PartitionSpec>) -> Self {
        Self { memory_size, processes, partitions }
    }

    pub fn from_dto(dto: &ScenarioDto) -> Self {
        let processes = dto.processes.iter().map(|p| ProcessSpec { size: p.size, time_needed: p.time_needed }).collect();
        let partitions = dto.partitions.iter().map(|p| PartitionSpec { size: p.size }).collect();
        Self::new(dto.memory_size, processes, partitions)
    }

    /// Sum of all partition sizes, or None if it does not fit into a `u64`.
    pub fn total_partition_size(&self) -> Option<u64> {
        self.partitions.iter().try_fold(0u64, |total, p| total.checked_add(p.size))
    }

    /// Rejects inputs no run may start from.
    pub fn validate(&self) -> Result<()> {
        if u32::try_from(self.processes.len()).is_err() || u32::try_from(self.partitions.len()).is_err() {
            return Err(Error::InvalidInput(format!(
                "{} processes and {} partitions exceed the supported {} entries",
                self.processes.len(),
                self.partitions.len(),
                u32::MAX
            )));
        }

        for (i, partition) in self.partitions.iter().enumerate() {
            if partition.size == 0 {
                return Err(Error::InvalidInput(format!("partition #{} has size 0", i + 1)));
            }
        }

        for (i, process) in self.processes.iter().enumerate() {
            if process.size == 0 {
                return Err(Error::InvalidInput(format!("process #{} has size 0", i + 1)));
            }
            if !process.time_needed.is_finite() || process.time_needed <= 0.0 {
                return Err(Error::InvalidInput(format!("process #{} needs {} time units, expected a positive number", i + 1, process.time_needed)));
            }
        }

        let Some(total_partition_size) = self.total_partition_size() else {
            log::error!("InvalidInput: partition sizes add up to more than {}, memory size is {}.", u64::MAX, self.memory_size);
            return Err(Error::InvalidInput(format!("partition sizes add up to more than {}", u64::MAX)));
        };
        if total_partition_size > self.memory_size {
            log::error!("ConfigurationError: partitions add up to {} but memory size is {}.", total_partition_size, self.memory_size);
            return Err(Error::ConfigurationError { total_partition_size, memory_size: self.memory_size });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    pub clock: ClockModel,
    pub promotion: PromotionPolicy,
}

/// Which disciplines a scenario is run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisciplineChoice {
    PerPartition,
    Shared,
    #[default]
    Both,
}

impl DisciplineChoice {
    pub fn kinds(&self) -> Vec<DisciplineKind> {
        match self {
            DisciplineChoice::PerPartition => vec![DisciplineKind::PerPartition],
            DisciplineChoice::Shared => vec![DisciplineKind::Shared],
            DisciplineChoice::Both => DisciplineKind::ALL.to_vec(),
        }
    }
}

impl fmt::Display for DisciplineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisciplineChoice::PerPartition => f.write_str("per-partition"),
            DisciplineChoice::Shared => f.write_str("shared"),
            DisciplineChoice::Both => f.write_str("both"),
        }
    }
}

impl FromStr for DisciplineChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("both") {
            return Ok(DisciplineChoice::Both);
        }
        match s.parse::<DisciplineKind>()? {
            DisciplineKind::PerPartition => Ok(DisciplineChoice::PerPartition),
            DisciplineKind::Shared => Ok(DisciplineChoice::Shared),
        }
    }
}

/// Recoverable conditions surfaced in the run report.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum SimulationWarning {
    #[error("UnplaceableProcess: {process_id} (size {size}) does not fit into any partition and is skipped")]
    UnplaceableProcess { process_id: ProcessId, size: u64, largest_partition: Option<u64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionSnapshot {
    pub id: PartitionId,
    pub size: u64,
    pub occupied: u64,
    pub resident: Option<ProcessId>,
    /// Own queue under the per-partition discipline, always empty under the shared one.
    pub waiting: Vec<ProcessId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    /// In ascending-capacity order, the order placement scans them.
    pub partitions: Vec<PartitionSnapshot>,
    pub shared_queue: Vec<ProcessId>,
}

impl LayoutSnapshot {
    pub fn is_empty(&self) -> bool {
        self.shared_queue.is_empty() && self.partitions.iter().all(|p| p.resident.is_none() && p.waiting.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub discipline: DisciplineKind,
    pub options: SimulationOptions,
    pub statistics: RunStatistics,
    pub initial_layout: LayoutSnapshot,
    pub final_layout: LayoutSnapshot,
    pub executions: Vec<ExecutionRecord>,
    pub rounds: Vec<RoundSummary>,
    pub warnings: Vec<SimulationWarning>,
}

impl RunReport {
    pub fn unplaceable(&self) -> Vec<ProcessId> {
        self.warnings
            .iter()
            .map(|warning| match warning {
                SimulationWarning::UnplaceableProcess { process_id, .. } => *process_id,
            })
            .collect()
    }

    pub fn executed(&self) -> Vec<ProcessId> {
        self.executions.iter().map(|record| record.process_id).collect()
    }
}

/// One run of the engine: placement followed by a drain, under a single discipline.
///
/// All state (processes, partitions, the discipline object) is owned by the run, so repeated
/// runs over the same input never see each other's queues.
#[derive(Debug)]
pub struct Simulation {
    memory_size: u64,
    input_count: usize,
    options: SimulationOptions,
    store: ProcessStore,
    table: PartitionTable,
    discipline: Box<dyn QueueDiscipline>,
    allocator: BestFitAllocator,
    scheduler: ExecutionScheduler,
}

impl Simulation {
    pub fn new(input: &SimulationInput, discipline: DisciplineKind, options: SimulationOptions) -> Result<Self> {
        input.validate()?;

        let mut store = ProcessStore::new();
        for (i, spec) in input.processes.iter().enumerate() {
            let id = ProcessId::from_index(i).ok_or_else(|| Error::InvalidInput(format!("process #{} has no valid id", i + 1)))?;
            store.add(Process::new(id, spec.size, spec.time_needed));
        }

        let partitions = input
            .partitions
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let id = PartitionId::from_index(i).ok_or_else(|| Error::InvalidInput(format!("partition #{} has no valid id", i + 1)))?;
                Ok(Partition::new(id, spec.size))
            })
            .collect::<Result<Vec<_>>>()?;
        let table = PartitionTable::new(partitions);

        Ok(Self {
            memory_size: input.memory_size,
            input_count: input.processes.len(),
            options,
            store,
            discipline: discipline.build(table.len()),
            table,
            allocator: BestFitAllocator::new(),
            scheduler: ExecutionScheduler::new(options.promotion, options.clock),
        })
    }

    pub fn run(mut self, stats: &mut StatsCollector) -> Result<RunReport> {
        let kind = self.discipline.kind();
        log::info!("Starting simulation: discipline {}, clock {}, promotion {}.", kind, self.options.clock, self.options.promotion);

        let placement = self.allocator.place(&mut self.store, &mut self.table, self.discipline.as_mut());
        let initial_layout = self.snapshot();
        self.record_placement(stats);

        let totals = self.scheduler.drain(&mut self.store, &mut self.table, self.discipline.as_mut(), stats)?;
        let final_layout = self.snapshot();

        let statistics = RunStatistics::reduce(&totals, self.memory_size, placement.memory_used, placement.warnings.len());
        debug_assert_eq!(statistics.executed_count + statistics.unplaceable_count, self.input_count, "processes vanished during the run");

        Ok(RunReport {
            discipline: kind,
            options: self.options,
            statistics,
            initial_layout,
            final_layout,
            executions: totals.executions,
            rounds: totals.rounds,
            warnings: placement.warnings,
        })
    }

    fn snapshot(&self) -> LayoutSnapshot {
        let per_partition = self.discipline.kind() == DisciplineKind::PerPartition;

        let partitions = self
            .table
            .iter()
            .enumerate()
            .map(|(slot, partition)| PartitionSnapshot {
                id: partition.id,
                size: partition.capacity,
                occupied: partition.occupied(),
                resident: partition.resident().and_then(|key| self.store.id_of(key)),
                waiting: if per_partition { self.store.ids_of(&self.discipline.queue_for(slot)) } else { Vec::new() },
            })
            .collect();

        let shared_queue = if per_partition { Vec::new() } else { self.store.ids_of(&self.discipline.peek_all()) };

        LayoutSnapshot { partitions, shared_queue }
    }

    fn record_placement(&self, stats: &mut StatsCollector) {
        for partition in self.table.iter() {
            let mut event = StatisticEvent::new();
            event
                .set(StatParameter::Time, 0.0)
                .set(StatParameter::Round, 0usize)
                .set(StatParameter::LogDescription, "placement")
                .set(StatParameter::Discipline, self.discipline.kind().as_str())
                .set(StatParameter::PartitionId, partition.id.id)
                .set(StatParameter::PartitionCapacity, partition.capacity)
                .set(StatParameter::PartitionOccupied, partition.occupied())
                .set(StatParameter::WaitingProcesses, self.discipline.len());

            if let Some(process) = partition.resident().and_then(|key| self.store.get(key)) {
                event.set(StatParameter::ProcessId, process.id.id).set(StatParameter::ProcessSize, process.size).set(StatParameter::TimeNeeded, process.time_needed);
            }
            stats.add_event(&event);
        }
    }
}

/// Runs `input` under a single discipline.
pub fn simulate(input: &SimulationInput, discipline: DisciplineKind, options: SimulationOptions, stats: &mut StatsCollector) -> Result<RunReport> {
    Simulation::new(input, discipline, options)?.run(stats)
}

/// Both disciplines over the same input, each run on fresh state.
///
/// A run that fails, e.g. with `StalledDrain`, is kept as its error next to the other
/// discipline's report.
#[derive(Debug)]
pub struct Comparison {
    pub per_partition: Result<RunReport>,
    pub shared: Result<RunReport>,
}

/// Serialized form of one side of a [`Comparison`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum RunOutcome<'a> {
    Report(&'a RunReport),
    Failed { discipline: DisciplineKind, error: String },
}

impl<'a> RunOutcome<'a> {
    fn of(discipline: DisciplineKind, result: &'a Result<RunReport>) -> Self {
        match result {
            Ok(report) => RunOutcome::Report(report),
            Err(e) => RunOutcome::Failed { discipline, error: e.to_string() },
        }
    }
}

impl Serialize for Comparison {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Comparison", 2)?;
        state.serialize_field("per_partition", &RunOutcome::of(DisciplineKind::PerPartition, &self.per_partition))?;
        state.serialize_field("shared", &RunOutcome::of(DisciplineKind::Shared, &self.shared))?;
        state.end()
    }
}

impl Comparison {
    /// The compared metrics as `(label, per-partition value, shared value)`. A failed run has no values.
    pub fn rows(&self) -> Vec<(&'static str, Option<f64>, Option<f64>)> {
        let multi = self.per_partition.as_ref().ok().map(|report| &report.statistics);
        let single = self.shared.as_ref().ok().map(|report| &report.statistics);

        let metrics: [(&'static str, fn(&RunStatistics) -> f64); 4] = [
            ("Total Execution Time", |s: &RunStatistics| s.total_execution_time),
            ("Total Running Time", |s: &RunStatistics| s.total_running_time),
            ("Total Waiting Time", |s: &RunStatistics| s.total_waiting_time),
            ("Time Utilization", |s: &RunStatistics| s.time_utilization),
        ];

        metrics.into_iter().map(|(label, metric)| (label, multi.map(metric), single.map(metric))).collect()
    }

    /// Writes the metrics side by side, `NA` for the values of a failed run.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
        csv_wtr.write_record(["Metric", DisciplineKind::PerPartition.as_str(), DisciplineKind::Shared.as_str()])?;

        let cell = |value: Option<f64>| value.map_or_else(|| "NA".to_string(), |v| format!("{:.3}", v));
        for (label, multi, single) in self.rows() {
            csv_wtr.write_record([label.to_string(), cell(multi), cell(single)])?;
        }

        csv_wtr.flush()?;
        Ok(())
    }
}

/// Runs `input` under both disciplines.
///
/// # Returns
/// Returns an error only if the input itself is rejected. A run that fails on its own is
/// logged and kept in the comparison.
pub fn compare_disciplines(input: &SimulationInput, options: SimulationOptions, stats: &mut StatsCollector) -> Result<Comparison> {
    input.validate()?;

    let mut run = |kind: DisciplineKind| {
        let result = simulate(input, kind, options, stats);
        if let Err(e) = &result {
            log::error!("Run under the {} discipline failed: {}", kind, e);
        }
        result
    };

    Ok(Comparison { per_partition: run(DisciplineKind::PerPartition), shared: run(DisciplineKind::Shared) })
}
