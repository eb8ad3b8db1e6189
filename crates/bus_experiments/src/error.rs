use bus_core::error::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("simulation failed: {0}")]
    Sim(#[from] SimError),
    #[error("invalid batch configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no results to export")]
    EmptyResults,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type ExperimentResult<T> = Result<T, ExperimentError>;
