use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Simulated time source for a run. Durations are accounted, never slept.
pub trait SimulationClock: fmt::Debug {
    /// Current simulated time.
    fn now(&self) -> f64;

    /// Charges one execution of `duration` to the current round.
    ///
    /// # Returns
    /// Returns the simulated `(start, finish)` span of that execution.
    fn run_for(&mut self, duration: f64) -> (f64, f64);

    /// Ends the current round and moves the clock past it.
    fn close_round(&mut self);

    fn model(&self) -> ClockModel;
}

/// Executions of a round run one after another, as in a single-threaded batch system.
#[derive(Debug, Clone, Default)]
pub struct SequentialClock {
    now: f64,
}

impl SequentialClock {
    pub fn new() -> Self {
        Self { now: 0.0 }
    }
}

impl SimulationClock for SequentialClock {
    fn now(&self) -> f64 {
        self.now
    }

    fn run_for(&mut self, duration: f64) -> (f64, f64) {
        let start = self.now;
        self.now += duration;
        (start, self.now)
    }

    fn close_round(&mut self) {}

    fn model(&self) -> ClockModel {
        ClockModel::Sequential
    }
}

/// Every busy partition of a round runs side by side; the round lasts as long as its
/// longest execution.
#[derive(Debug, Clone, Default)]
pub struct ConcurrentClock {
    round_start: f64,
    round_length: f64,
}

impl ConcurrentClock {
    pub fn new() -> Self {
        Self { round_start: 0.0, round_length: 0.0 }
    }
}

impl SimulationClock for ConcurrentClock {
    fn now(&self) -> f64 {
        self.round_start + self.round_length
    }

    fn run_for(&mut self, duration: f64) -> (f64, f64) {
        self.round_length = self.round_length.max(duration);
        (self.round_start, self.round_start + duration)
    }

    fn close_round(&mut self) {
        self.round_start += self.round_length;
        self.round_length = 0.0;
    }

    fn model(&self) -> ClockModel {
        ClockModel::Concurrent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockModel {
    #[default]
    Sequential,
    Concurrent,
}

impl ClockModel {
    pub fn build(self) -> Box<dyn SimulationClock> {
        match self {
            ClockModel::Sequential => Box::new(SequentialClock::new()),
            ClockModel::Concurrent => Box::new(ConcurrentClock::new()),
        }
    }
}

impl fmt::Display for ClockModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockModel::Sequential => f.write_str("sequential"),
            ClockModel::Concurrent => f.write_str("concurrent"),
        }
    }
}

impl FromStr for ClockModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(ClockModel::Sequential),
            "concurrent" => Ok(ClockModel::Concurrent),
            other => Err(format!("unknown clock model '{}', expected 'sequential' or 'concurrent'", other)),
        }
    }
}
