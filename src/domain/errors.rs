//! Domain errors for the traffic-signal control agents.

use thiserror::Error;

/// Domain-level errors that can occur while deciding or recording a phase.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The state snapshot is structurally invalid (missing lane group,
    /// negative or non-finite values).
    #[error("Malformed state: {0}")]
    MalformedState(String),

    /// A phase name that is not a member of the active catalog.
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    #[error("Unsupported phase count: {0}. Must be 4 or 8")]
    UnsupportedPhaseCount(usize),

    #[error("Traffic file {file} is not part of dataset {dataset}")]
    UnknownTrafficFile { dataset: String, file: String },

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// The state provider has nothing (more) to report for an intersection.
    #[error("State unavailable for intersection {0}")]
    StateUnavailable(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}
