//! Error types for youthplan.

use thiserror::Error;

/// Errors that can occur in youthplan operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Completion provider error: {0}")]
    Completion(String),

    #[error("AI features are unavailable: {0}")]
    CompletionUnavailable(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PlannerError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        PlannerError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Serialization(err.to_string())
    }
}

/// Result type alias for youthplan operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
