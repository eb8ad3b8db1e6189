//! Simulation error type.
//!
//! Every failure in a run is a deterministic logic violation (there is no I/O
//! inside the event loop), so errors surface immediately and are never retried.

use thiserror::Error;

use crate::clock::EventKind;
use crate::ecs::StopId;

#[derive(Debug, Error)]
pub enum SimError {
    /// The schedule drained before the horizon. Some entity stopped
    /// rescheduling itself; the run cannot continue.
    #[error("event schedule is empty at t={now:.3} before the horizon was reached")]
    EmptySchedule { now: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("world is missing resource {0}; build it with build_scenario")]
    MissingResource(&'static str),

    #[error("{0} is not registered in the stop directory")]
    UnknownStop(StopId),

    /// The event's subject is missing, of the wrong kind, or no longer in the world.
    #[error("{kind:?} event at t={timestamp:.3} has no entity to act on")]
    UnroutableEvent { kind: EventKind, timestamp: f64 },
}

pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while writing telemetry to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
