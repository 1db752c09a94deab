//! Error types for the simulator

use thiserror::Error;

/// Simulator result type
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that can occur before or around a simulation run.
///
/// Every variant is detected before the first tick; a run that starts always
/// finishes.
#[derive(Error, Debug)]
pub enum SimError {
    /// A process record failed validation
    #[error("invalid process {id:?}: {reason}")]
    InvalidProcess { id: String, reason: String },

    /// Round Robin requested with a non-positive quantum
    #[error("invalid quantum {0}: must be a positive integer")]
    InvalidQuantum(i64),

    /// Round Robin requested without a quantum
    #[error("round robin requires a time quantum")]
    MissingQuantum,

    /// Unknown algorithm name
    #[error("unknown scheduling algorithm: {0}")]
    UnknownAlgorithm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Create an invalid-process error
    pub fn invalid_process(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProcess {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
