pub mod per_partition;
pub mod shared;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::memory_model::partition::PartitionSlot;
use crate::domain::memory_model::process::ProcessKey;

pub use per_partition::PerPartitionQueues;
pub use shared::SharedQueue;

/// Waiting-room strategy used by both the allocator and the scheduler of one run.
///
/// Every implementation keeps FIFO order: a process enqueued before another one into the same
/// collection is dequeued no later than it, whichever partition performs the operation.
pub trait QueueDiscipline: fmt::Debug {
    fn kind(&self) -> DisciplineKind;

    /// Queues `process` behind the partition at `slot`.
    fn enqueue(&mut self, slot: PartitionSlot, process: ProcessKey);

    /// Offers a process that no partition can hold.
    ///
    /// # Returns
    /// Returns true if the discipline kept the process waiting, false if it refused it.
    fn enqueue_unfit(&mut self, process: ProcessKey) -> bool;

    /// The process the partition at `slot` would promote next.
    fn front(&self, slot: PartitionSlot) -> Option<ProcessKey>;

    /// Removes and returns the process the partition at `slot` promotes next.
    fn dequeue(&mut self, slot: PartitionSlot) -> Option<ProcessKey>;

    /// Every waiting process system-wide, in queue order.
    fn peek_all(&self) -> Vec<ProcessKey>;

    /// The waiting collection the partition at `slot` draws from.
    fn queue_for(&self, slot: PartitionSlot) -> Vec<ProcessKey>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisciplineKind {
    /// Each partition owns its own FIFO.
    PerPartition,
    /// One FIFO shared by all partitions.
    Shared,
}

impl DisciplineKind {
    pub const ALL: [DisciplineKind; 2] = [DisciplineKind::PerPartition, DisciplineKind::Shared];

    /// Creates a fresh, empty discipline object for a run over `partition_count` partitions.
    pub fn build(self, partition_count: usize) -> Box<dyn QueueDiscipline> {
        match self {
            DisciplineKind::PerPartition => Box::new(PerPartitionQueues::new(partition_count)),
            DisciplineKind::Shared => Box::new(SharedQueue::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisciplineKind::PerPartition => "per-partition",
            DisciplineKind::Shared => "shared",
        }
    }
}

impl fmt::Display for DisciplineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisciplineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "per-partition" | "multi" | "multi-queue" => Ok(DisciplineKind::PerPartition),
            "shared" | "single" | "single-queue" => Ok(DisciplineKind::Shared),
            other => Err(format!("unknown queue discipline '{}', expected 'per-partition' or 'shared'", other)),
        }
    }
}
