use std::collections::VecDeque;

use crate::domain::memory_model::discipline::{DisciplineKind, QueueDiscipline};
use crate::domain::memory_model::partition::PartitionSlot;
use crate::domain::memory_model::process::ProcessKey;

/// One FIFO per partition. A freed partition only ever promotes from its own queue.
#[derive(Debug, Clone)]
pub struct PerPartitionQueues {
    queues: Vec<VecDeque<ProcessKey>>,
}

impl PerPartitionQueues {
    pub fn new(partition_count: usize) -> Self {
        Self { queues: vec![VecDeque::new(); partition_count] }
    }
}

impl QueueDiscipline for PerPartitionQueues {
    fn kind(&self) -> DisciplineKind {
        DisciplineKind::PerPartition
    }

    fn enqueue(&mut self, slot: PartitionSlot, process: ProcessKey) {
        match self.queues.get_mut(slot) {
            Some(queue) => queue.push_back(process),
            None => log::error!("PerPartitionQueueMissing: no queue for partition slot {}, process dropped.", slot),
        }
    }

    /// A process no partition can hold has no queue to wait in.
    fn enqueue_unfit(&mut self, _process: ProcessKey) -> bool {
        false
    }

    fn front(&self, slot: PartitionSlot) -> Option<ProcessKey> {
        self.queues.get(slot)?.front().copied()
    }

    fn dequeue(&mut self, slot: PartitionSlot) -> Option<ProcessKey> {
        self.queues.get_mut(slot)?.pop_front()
    }

    fn peek_all(&self) -> Vec<ProcessKey> {
        self.queues.iter().flatten().copied().collect()
    }

    fn queue_for(&self, slot: PartitionSlot) -> Vec<ProcessKey> {
        self.queues.get(slot).map(|queue| queue.iter().copied().collect()).unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }
}
