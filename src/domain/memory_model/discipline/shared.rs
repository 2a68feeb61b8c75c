use std::collections::VecDeque;

use crate::domain::memory_model::discipline::{DisciplineKind, QueueDiscipline};
use crate::domain::memory_model::partition::PartitionSlot;
use crate::domain::memory_model::process::ProcessKey;

/// One FIFO for the whole memory. Whichever partition frees up takes the global front,
/// even if that process was best-fitted against a different partition.
#[derive(Debug, Clone, Default)]
pub struct SharedQueue {
    queue: VecDeque<ProcessKey>,
}

impl SharedQueue {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }
}

impl QueueDiscipline for SharedQueue {
    fn kind(&self) -> DisciplineKind {
        DisciplineKind::Shared
    }

    fn enqueue(&mut self, _slot: PartitionSlot, process: ProcessKey) {
        self.queue.push_back(process);
    }

    fn enqueue_unfit(&mut self, process: ProcessKey) -> bool {
        self.queue.push_back(process);
        true
    }

    fn front(&self, _slot: PartitionSlot) -> Option<ProcessKey> {
        self.queue.front().copied()
    }

    fn dequeue(&mut self, _slot: PartitionSlot) -> Option<ProcessKey> {
        self.queue.pop_front()
    }

    fn peek_all(&self) -> Vec<ProcessKey> {
        self.queue.iter().copied().collect()
    }

    fn queue_for(&self, _slot: PartitionSlot) -> Vec<ProcessKey> {
        self.peek_all()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
