use serde::Serialize;

use crate::domain::memory_model::scheduler::DrainTotals;

/// Aggregate metrics of one run. Built by [`RunStatistics::reduce`], never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatistics {
    pub total_execution_time: f64,
    pub total_running_time: f64,
    pub total_waiting_time: f64,

    /// `execution / (running + waiting) * 100`, clamped to [0, 100].
    pub time_utilization: f64,
    /// `execution / running * 100`. Above 100 under the concurrent clock, where it measures parallelism.
    pub busy_utilization: f64,

    pub memory_size: u64,
    /// Occupancy sampled right after placement, before any execution.
    pub memory_used: u64,
    pub memory_remaining: u64,
    pub memory_utilization: f64,

    pub rounds: usize,
    pub executed_count: usize,
    pub unplaceable_count: usize,
    pub average_waiting_time: f64,
}

impl RunStatistics {
    pub fn reduce(totals: &DrainTotals, memory_size: u64, memory_used: u64, unplaceable_count: usize) -> Self {
        let executed_count = totals.executions.len();

        Self {
            total_execution_time: totals.total_execution_time,
            total_running_time: totals.total_running_time,
            total_waiting_time: totals.total_waiting_time,
            time_utilization: time_utilization(totals.total_execution_time, totals.total_running_time, totals.total_waiting_time),
            busy_utilization: percentage(totals.total_execution_time, totals.total_running_time),
            memory_size,
            memory_used,
            memory_remaining: memory_size.saturating_sub(memory_used),
            memory_utilization: percentage(memory_used as f64, memory_size as f64),
            rounds: totals.rounds.len(),
            executed_count,
            unplaceable_count,
            average_waiting_time: if executed_count == 0 { 0.0 } else { totals.total_waiting_time / executed_count as f64 },
        }
    }
}

/// `part / whole * 100`, or 0 for an empty whole.
fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

pub fn time_utilization(execution: f64, running: f64, waiting: f64) -> f64 {
    percentage(execution, running + waiting).clamp(0.0, 100.0)
}
