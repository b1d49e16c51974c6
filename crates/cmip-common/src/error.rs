//! Error types for catalogue operations.

use thiserror::Error;

/// Result type alias using CatalogueError.
pub type CatalogueResult<T> = Result<T, CatalogueError>;

/// Primary error type for catalogue operations.
///
/// Absence of data is never an error here: empty pattern matches resolve to
/// sentinel values. Variants fall into two groups, the per-coordinate
/// layout violation and the run-level configuration errors that abort a
/// whole catalogue build.
#[derive(Debug, Error)]
pub enum CatalogueError {
    // === Archive layout errors ===
    #[error("Table id is not the same for all ensemble members: expected '{expected}', found '{found}' in {path}")]
    LayoutViolation {
        expected: String,
        found: String,
        path: String,
    },

    // === Configuration errors ===
    #[error("Unrecognized backend for base location: {0}")]
    UnrecognizedBackend(String),

    #[error("Unrecognized experiment: {0}")]
    UnrecognizedExperiment(String),

    #[error("Unrecognized base location '{location}': {reason}")]
    UnrecognizedBaseLocation { location: String, reason: String },

    #[error("Unknown output column: {0}")]
    UnknownColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Infrastructure errors ===
    #[error("Store error: {0}")]
    Store(String),

    #[error("Failed to write catalogue: {0}")]
    Output(String),
}

impl CatalogueError {
    /// Whether this error invalidates the whole catalogue run.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CatalogueError::UnrecognizedBackend(_)
                | CatalogueError::UnrecognizedExperiment(_)
                | CatalogueError::UnrecognizedBaseLocation { .. }
                | CatalogueError::UnknownColumn(_)
                | CatalogueError::InvalidConfig(_)
        )
    }
}

impl From<std::io::Error> for CatalogueError {
    fn from(err: std::io::Error) -> Self {
        CatalogueError::Output(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogueError {
    fn from(err: serde_json::Error) -> Self {
        CatalogueError::Output(format!("JSON error: {}", err))
    }
}

impl From<csv::Error> for CatalogueError {
    fn from(err: csv::Error) -> Self {
        CatalogueError::Output(format!("CSV error: {}", err))
    }
}
