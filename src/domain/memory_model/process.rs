use serde::Serialize;
use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;

use crate::domain::memory_model::utils::id::{PartitionId, ProcessId};

new_key_type! {
    pub struct ProcessKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    /// Created by the input layer, not yet seen by the allocator.
    Pending,
    /// Sitting in a waiting collection.
    Waiting,
    /// Sole resident of a partition.
    Resident,
    /// Executed and released.
    Finished,
    /// Larger than every partition under the per-partition discipline.
    Unplaceable,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub id: ProcessId,
    pub size: u64,
    pub time_needed: f64,
    pub waiting_time: f64,
    pub size_on_memory: u64,
    pub assigned_partition: Option<PartitionId>,
    pub state: ProcessState,
}

impl Process {
    pub fn new(id: ProcessId, size: u64, time_needed: f64) -> Self {
        Self { id, size, time_needed, waiting_time: 0.0, size_on_memory: 0, assigned_partition: None, state: ProcessState::Pending }
    }

    /// Loads the process into a partition. Only up to `capacity` is ever loaded.
    pub fn enter_into_partition(&mut self, partition_id: PartitionId, capacity: u64) {
        self.assigned_partition = Some(partition_id);
        self.size_on_memory = self.size.min(capacity);
        self.state = ProcessState::Resident;
    }

    pub fn exit_from_partition(&mut self) {
        self.assigned_partition = None;
        self.size_on_memory = 0;
        self.state = ProcessState::Finished;
    }

    pub fn mark_waiting(&mut self) {
        self.state = ProcessState::Waiting;
    }

    pub fn mark_unplaceable(&mut self) {
        self.state = ProcessState::Unplaceable;
    }
}

#[derive(Debug)]
pub struct ProcessStore {
    /// Live processes. Finished ones are removed.
    slots: SlotMap<ProcessKey, Process>,

    /// Index lookup of the internal key by the user-facing process id.
    id_index: HashMap<ProcessId, ProcessKey>,

    /// Keys in input order, as handed to the allocator.
    input_order: Vec<ProcessKey>,
}

impl ProcessStore {
    pub fn new() -> Self {
        Self { slots: SlotMap::with_key(), id_index: HashMap::new(), input_order: Vec::new() }
    }

    /// Adds a process to the store.
    ///
    /// # Returns
    /// Returns the ProcessKey (internal key for the ProcessStore).
    pub fn add(&mut self, process: Process) -> ProcessKey {
        let id = process.id;
        let key = self.slots.insert(process);
        self.id_index.insert(id, key);
        self.input_order.push(key);
        key
    }

    pub fn get(&self, key: ProcessKey) -> Option<&Process> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: ProcessKey) -> Option<&mut Process> {
        self.slots.get_mut(key)
    }

    pub fn get_by_id(&self, id: ProcessId) -> Option<&Process> {
        let key = self.id_index.get(&id)?;
        self.slots.get(*key)
    }

    /// Removes a process for good, once it has finished execution.
    pub fn remove(&mut self, key: ProcessKey) -> Option<Process> {
        let process = self.slots.remove(key)?;
        self.id_index.remove(&process.id);
        Some(process)
    }

    /// Returns the process id behind a key, if the process is still alive.
    pub fn id_of(&self, key: ProcessKey) -> Option<ProcessId> {
        self.slots.get(key).map(|p| p.id)
    }

    pub fn ids_of(&self, keys: &[ProcessKey]) -> Vec<ProcessId> {
        keys.iter().filter_map(|key| self.id_of(*key)).collect()
    }

    pub fn input_order(&self) -> &[ProcessKey] {
        &self.input_order
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for ProcessStore {
    fn default() -> Self {
        Self::new()
    }
}
