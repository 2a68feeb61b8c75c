pub mod capacity_compare;
