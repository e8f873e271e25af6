use std::io;
use thiserror::Error;

/// Errors surfaced to the caller of the simulator.
///
/// The simulation itself never fails; everything here is a rejected input or
/// an inconsistency between repeated runs.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Unknown algorithm: {0} (expected fifo, sjf, rr or mlfq)")]
    UnknownAlgorithm(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Invalid process {name:?}: {reason}")]
    InvalidProcess { name: String, reason: String },

    #[error("Duplicate process name: {0}")]
    DuplicateProcess(String),

    #[error("Run {run} does not match the first run at process {name:?}")]
    RunMismatch { run: usize, name: String },

    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
}
