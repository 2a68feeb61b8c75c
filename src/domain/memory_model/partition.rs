use serde::Serialize;

use crate::domain::memory_model::comparator::capacity_compare::CapacityCompare;
use crate::domain::memory_model::process::{Process, ProcessKey};
use crate::domain::memory_model::utils::id::PartitionId;

/// Position of a partition inside the capacity-sorted [`PartitionTable`].
pub type PartitionSlot = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartitionState {
    Idle,
    Busy,
}

/// A fixed-size memory partition holding at most one resident process.
#[derive(Debug, Clone)]
pub struct Partition {
    pub id: PartitionId,
    pub capacity: u64,
    /// 0-based position in the input, used as the tiebreak when sorting by capacity.
    pub input_index: usize,
    resident: Option<ProcessKey>,
    occupied: u64,
}

impl Partition {
    pub fn new(id: PartitionId, capacity: u64) -> Self {
        Self { id, capacity, input_index: id.id.saturating_sub(1) as usize, resident: None, occupied: 0 }
    }

    pub fn state(&self) -> PartitionState {
        match self.resident {
            Some(_) => PartitionState::Busy,
            None => PartitionState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.resident.is_none()
    }

    pub fn resident(&self) -> Option<ProcessKey> {
        self.resident
    }

    pub fn occupied(&self) -> u64 {
        self.occupied
    }

    pub fn fits(&self, size: u64) -> bool {
        size <= self.capacity
    }

    /// Makes `process` the resident of this partition.
    ///
    /// # Returns
    /// Returns false and leaves everything untouched if the partition is already busy.
    pub fn admit(&mut self, key: ProcessKey, process: &mut Process) -> bool {
        if self.resident.is_some() {
            return false;
        }

        self.resident = Some(key);
        self.occupied = process.size.min(self.capacity);
        process.enter_into_partition(self.id, self.capacity);
        true
    }

    /// Evicts the resident, leaving the partition idle.
    pub fn release(&mut self) -> Option<ProcessKey> {
        self.occupied = 0;
        self.resident.take()
    }
}

/// All partitions of a run, sorted once by ascending capacity.
#[derive(Debug, Clone)]
pub struct PartitionTable {
    partitions: Vec<Partition>,
}

impl PartitionTable {
    pub fn new(mut partitions: Vec<Partition>) -> Self {
        let compare = CapacityCompare::new();
        partitions.sort_by(|a, b| compare.compare(a, b));
        Self { partitions }
    }

    /// Returns the slot of the smallest partition able to hold `size`, busy or not.
    pub fn best_fit(&self, size: u64) -> Option<PartitionSlot> {
        self.partitions.iter().position(|partition| partition.fits(size))
    }

    pub fn get(&self, slot: PartitionSlot) -> Option<&Partition> {
        self.partitions.get(slot)
    }

    pub fn get_mut(&mut self, slot: PartitionSlot) -> Option<&mut Partition> {
        self.partitions.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn all_idle(&self) -> bool {
        self.partitions.iter().all(Partition::is_idle)
    }

    pub fn busy_slots(&self) -> Vec<PartitionSlot> {
        self.partitions.iter().enumerate().filter(|(_, p)| !p.is_idle()).map(|(slot, _)| slot).collect()
    }

    pub fn idle_slots(&self) -> Vec<PartitionSlot> {
        self.partitions.iter().enumerate().filter(|(_, p)| p.is_idle()).map(|(slot, _)| slot).collect()
    }

    pub fn memory_used(&self) -> u64 {
        self.partitions.iter().map(Partition::occupied).sum()
    }

    pub fn total_capacity(&self) -> u64 {
        self.partitions.iter().map(|p| p.capacity).sum()
    }

    pub fn largest_capacity(&self) -> Option<u64> {
        self.partitions.iter().map(|p| p.capacity).max()
    }
}
