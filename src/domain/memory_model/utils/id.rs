use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Integer identity of a simulation entity, assigned 1-based by input order.
pub struct Id<T> {
    pub id: u32,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: u32) -> Self {
        Id { id, _marker: PhantomData }
    }

    /// Builds the identity for the entity at `index` (0-based) of an input list.
    ///
    /// # Returns
    /// Returns None if the 1-based id does not fit into a `u32`.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok()?.checked_add(1).map(Id::new)
    }
}

// Manual impls: deriving would put bounds on the tag type.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.id)
    }
}

impl<T: IdPrefix> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::PREFIX, self.id)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");

        write!(f, "{}: {}", display_name, self.id)
    }
}

/// Short label used when an id is printed for humans (`P3`, `Partition 2`).
pub trait IdPrefix {
    const PREFIX: &'static str;
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct ProcessTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct PartitionTag;

impl IdPrefix for ProcessTag {
    const PREFIX: &'static str = "P";
}

impl IdPrefix for PartitionTag {
    const PREFIX: &'static str = "Partition ";
}

pub type ProcessId = Id<ProcessTag>;
pub type PartitionId = Id<PartitionTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_based_by_input_index() {
        assert_eq!(ProcessId::from_index(0), Some(ProcessId::new(1)));
        assert_eq!(PartitionId::from_index(4).map(|p| p.id), Some(5));
    }

    #[test]
    fn index_beyond_u32_range_has_no_id() {
        assert_eq!(ProcessId::from_index(u32::MAX as usize - 1), Some(ProcessId::new(u32::MAX)));
        assert_eq!(ProcessId::from_index(u32::MAX as usize), None);
        assert_eq!(PartitionId::from_index(usize::MAX), None);
    }

    #[test]
    fn display_and_debug_use_the_tag() {
        assert_eq!(ProcessId::new(3).to_string(), "P3");
        assert_eq!(PartitionId::new(2).to_string(), "Partition 2");
        assert_eq!(format!("{:?}", ProcessId::new(7)), "ProcessId: 7");
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&vec![ProcessId::new(1), ProcessId::new(2)]).unwrap();
        assert_eq!(json, "[1,2]");
    }
}
