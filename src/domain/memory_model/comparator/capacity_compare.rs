use crate::domain::memory_model::partition::Partition;

use std::cmp::Ordering;

/// Compares partitions by capacity, the ordering the best-fit scan walks through.
pub struct CapacityCompare;

impl CapacityCompare {
    pub fn new() -> Self {
        Self
    }

    /// Compares the two provided partitions by their capacity.
    ///
    /// Returns `Ordering::Less`, if p1 has a lower capacity than p2
    ///         `Ordering::Greater`, if p1 has a higher capacity than p2
    ///
    /// Note: if both capacities are equal, the input index of both partitions is compared, so
    ///       equally sized partitions keep the order they were declared in.
    pub fn compare(&self, p1: &Partition, p2: &Partition) -> Ordering {
        match p1.capacity.cmp(&p2.capacity) {
            Ordering::Equal => p1.input_index.cmp(&p2.input_index),
            other => other,
        }
    }
}

impl Default for CapacityCompare {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::memory_model::utils::id::PartitionId;

    #[test]
    fn equal_capacities_fall_back_to_input_order() {
        let compare = CapacityCompare::new();
        let first = Partition::new(PartitionId::new(1), 30);
        let second = Partition::new(PartitionId::new(2), 30);
        let small = Partition::new(PartitionId::new(3), 10);

        assert_eq!(compare.compare(&first, &second), Ordering::Less);
        assert_eq!(compare.compare(&second, &first), Ordering::Greater);
        assert_eq!(compare.compare(&small, &first), Ordering::Less);
        assert_eq!(compare.compare(&first, &first), Ordering::Equal);
    }
}
