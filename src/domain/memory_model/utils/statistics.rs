use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Each event consists of a set of key-value-pairs with the measured data or some meta data of the event.
/// This enum specifies all allowed key values and thus the columns in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatParameter {
    /// Simulated time at which the event happened.
    Time,

    /// Round of the execution loop, 0 for placement.
    Round,

    /// Description why this entry was made
    LogDescription,

    /// Queue discipline of the run
    Discipline,

    // Partition
    PartitionId,
    PartitionCapacity,
    PartitionOccupied,

    // Process
    ProcessId,
    ProcessSize,
    TimeNeeded,

    /// Waiting time a process had accrued when it started executing
    WaitingTime,

    // System
    /// Number of processes in any waiting collection
    WaitingProcesses,

    /// Number of busy partitions
    BusyPartitions,
}

impl StatParameter {
    /// Column order of the CSV output.
    pub const ALL: [StatParameter; 13] = [
        StatParameter::Time,
        StatParameter::Round,
        StatParameter::LogDescription,
        StatParameter::Discipline,
        StatParameter::PartitionId,
        StatParameter::PartitionCapacity,
        StatParameter::PartitionOccupied,
        StatParameter::ProcessId,
        StatParameter::ProcessSize,
        StatParameter::TimeNeeded,
        StatParameter::WaitingTime,
        StatParameter::WaitingProcesses,
        StatParameter::BusyPartitions,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            StatParameter::Time => "Time",
            StatParameter::Round => "Round",
            StatParameter::LogDescription => "LogDescription",
            StatParameter::Discipline => "Discipline",
            StatParameter::PartitionId => "PartitionId",
            StatParameter::PartitionCapacity => "PartitionCapacity",
            StatParameter::PartitionOccupied => "PartitionOccupied",
            StatParameter::ProcessId => "ProcessId",
            StatParameter::ProcessSize => "ProcessSize",
            StatParameter::TimeNeeded => "TimeNeeded",
            StatParameter::WaitingTime => "WaitingTime",
            StatParameter::WaitingProcesses => "WaitingProcesses",
            StatParameter::BusyPartitions => "BusyPartitions",
        }
    }

    pub fn headers() -> Vec<&'static str> {
        Self::ALL.iter().map(StatParameter::header).collect()
    }
}

/// store values in their native format, only format them when writing to the CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<u32> for StatValue {
    fn from(v: u32) -> Self {
        StatValue::Integer(i64::from(v))
    }
}

// Values past i64::MAX keep their exact digits as text.
impl From<u64> for StatValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or_else(|_| StatValue::Text(v.to_string()), StatValue::Integer)
    }
}

impl From<usize> for StatValue {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or_else(|_| StatValue::Text(v.to_string()), StatValue::Integer)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Float(v)
    }
}

impl From<String> for StatValue {
    fn from(v: String) -> Self {
        StatValue::Text(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        StatValue::Text(v.to_string())
    }
}

impl StatValue {
    fn to_cell(&self) -> String {
        match self {
            StatValue::Integer(i) => i.to_string(),
            StatValue::Float(f) => format!("{:.3}", f),
            StatValue::Text(t) => t.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatisticEvent {
    data: HashMap<StatParameter, StatValue>,
}

impl StatisticEvent {
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    pub fn set<V: Into<StatValue>>(&mut self, param: StatParameter, value: V) -> &mut Self {
        self.data.insert(param, value.into());
        self
    }

    pub fn get(&self, param: StatParameter) -> Option<&StatValue> {
        self.data.get(&param)
    }

    /// Row in header order; parameters that were never set become `NA`.
    fn to_row(&self) -> Vec<String> {
        StatParameter::ALL.iter().map(|param| self.data.get(param).map(StatValue::to_cell).unwrap_or_else(|| "NA".to_string())).collect()
    }
}

/// Writes statistic events of a run as `;`-separated CSV.
///
/// Owned by a single run and passed down explicitly. A disabled collector drops all events.
pub struct StatsCollector {
    writer: Option<csv::Writer<Box<dyn Write>>>,
    events_written: usize,
}

impl std::fmt::Debug for StatsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsCollector").field("enabled", &self.writer.is_some()).field("events_written", &self.events_written).finish()
    }
}

impl StatsCollector {
    pub fn disabled() -> Self {
        Self { writer: None, events_written: 0 }
    }

    /// Starts a CSV stream on `writer` and writes the header row.
    pub fn to_writer(writer: Box<dyn Write>) -> Result<Self> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
        csv_wtr.write_record(StatParameter::headers())?;
        Ok(Self { writer: Some(csv_wtr), events_written: 0 })
    }

    pub fn to_file(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        log::info!("Writing statistics events to '{}'.", path.display());
        Self::to_writer(Box::new(file))
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn events_written(&self) -> usize {
        self.events_written
    }

    /// Records an event. Write failures are logged and never abort the simulation.
    pub fn add_event(&mut self, event: &StatisticEvent) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };

        match writer.write_record(event.to_row()) {
            Ok(()) => self.events_written += 1,
            Err(e) => log::error!("Stats Error: Failed to write record: {}", e),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for StatsCollector {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::error!("Stats Error: Failed to flush statistics: {}", e);
        }
    }
}
