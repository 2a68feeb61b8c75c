use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::memory_model::simulation::{PartitionSpec, ProcessSpec, SimulationInput};

pub const MIN_PROCESS_SIZE: u64 = 10;
pub const MAX_PROCESS_SIZE: u64 = 100;
pub const MIN_TIME_NEEDED: f64 = 1.0;
pub const MAX_TIME_NEEDED: f64 = 10.0;
pub const MIN_PARTITION_SIZE: u64 = 10;
pub const DEFAULT_PROCESS_COUNT: std::ops::RangeInclusive<usize> = 10..=20;

/// Random test data for a run: a batch of processes and a partitioning of `memory_size`.
#[derive(Debug, Clone)]
pub struct RandomScenario {
    pub memory_size: u64,
    pub partition_count: usize,
    /// Drawn from 10..=20 if not set.
    pub process_count: Option<usize>,
    /// Fixed seed for reproducible scenarios.
    pub seed: Option<u64>,
}

impl RandomScenario {
    pub fn new(memory_size: u64, partition_count: usize) -> Self {
        Self { memory_size, partition_count, process_count: None, seed: None }
    }

    pub fn with_process_count(mut self, process_count: usize) -> Self {
        self.process_count = Some(process_count);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn generate(&self) -> SimulationInput {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let process_count = self.process_count.unwrap_or_else(|| rng.random_range(DEFAULT_PROCESS_COUNT));
        let processes = Self::generate_processes(&mut rng, process_count);
        let partitions = self.generate_partitions(&mut rng);

        log::info!("Generated {} process(es) and {} partition(s) for memory size {}.", processes.len(), partitions.len(), self.memory_size);

        SimulationInput::new(self.memory_size, processes, partitions)
    }

    fn generate_processes(rng: &mut StdRng, count: usize) -> Vec<ProcessSpec> {
        (0..count)
            .map(|_| ProcessSpec {
                size: rng.random_range(MIN_PROCESS_SIZE..=MAX_PROCESS_SIZE),
                time_needed: rng.random_range(MIN_TIME_NEEDED..MAX_TIME_NEEDED),
            })
            .collect()
    }

    /// Each partition gets at most its even share of the memory still unassigned, so the
    /// sizes never add up to more than `memory_size`.
    fn generate_partitions(&self, rng: &mut StdRng) -> Vec<PartitionSpec> {
        let mut partitions = Vec::with_capacity(self.partition_count);
        let mut total_size = 0;

        for i in 0..self.partition_count {
            let remaining = self.memory_size.saturating_sub(total_size);
            if remaining == 0 {
                break;
            }

            let upper = remaining / (self.partition_count - i) as u64;
            if upper < MIN_PARTITION_SIZE {
                log::warn!(
                    "Memory size {} leaves room for only {} of {} requested partition(s) of at least {}.",
                    self.memory_size,
                    partitions.len(),
                    self.partition_count,
                    MIN_PARTITION_SIZE
                );
                break;
            }

            let size = rng.random_range(MIN_PARTITION_SIZE..=upper);
            total_size += size;
            partitions.push(PartitionSpec { size });
        }

        partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_scenario() {
        let scenario = RandomScenario::new(500, 4).with_seed(42);
        assert_eq!(scenario.generate(), scenario.generate());
    }

    #[test]
    fn generated_values_stay_in_range() {
        let input = RandomScenario::new(1000, 5).with_seed(7).generate();

        assert!(DEFAULT_PROCESS_COUNT.contains(&input.processes.len()));
        for process in &input.processes {
            assert!((MIN_PROCESS_SIZE..=MAX_PROCESS_SIZE).contains(&process.size));
            assert!(process.time_needed >= MIN_TIME_NEEDED && process.time_needed < MAX_TIME_NEEDED);
        }

        assert_eq!(input.partitions.len(), 5);
        assert!(input.total_partition_size().is_some_and(|total| total <= 1000));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn small_memory_yields_fewer_partitions() {
        let input = RandomScenario::new(25, 4).with_process_count(3).with_seed(1).generate();

        assert_eq!(input.processes.len(), 3);
        assert!(input.partitions.is_empty());
    }
}
