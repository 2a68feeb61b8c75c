use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse scenario JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write statistics CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Total size of partitions ({total_partition_size}) is bigger than the memory size ({memory_size})")]
    ConfigurationError { total_partition_size: u64, memory_size: u64 },

    #[error("Invalid simulation input: {0}")]
    InvalidInput(String),

    #[error("Simulation stalled in round {round}: {waiting} process(es) waiting but no partition can admit the queue front")]
    StalledDrain { round: usize, waiting: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
