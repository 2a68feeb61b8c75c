pub mod comparator;
pub mod discipline;
pub mod partition;
pub mod placement;
pub mod process;
pub mod run_statistics;
pub mod scheduler;
pub mod simulation;
pub mod utils;
