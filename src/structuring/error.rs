//! Error types for the structuring module

use thiserror::Error;

use crate::error::Error as CrateError;

/// A fragment could not be structured. Recovered per item.
#[derive(Debug, Error)]
pub enum ExtractionFailure {
    /// The oracle call itself failed
    #[error("Oracle error: {0}")]
    Oracle(#[source] CrateError),

    /// The cleaned reply was not a usable JSON event
    #[error("Reply is not a valid event: {source}")]
    Parse {
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
        /// Raw reply, kept for diagnostics
        reply: String,
    },
}

/// Error type for structuring
#[derive(Debug, Error)]
pub enum StructureError {
    /// Missing credential or similar; fatal for the whole run
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Per-item failure
    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),
}

impl From<StructureError> for CrateError {
    fn from(err: StructureError) -> Self {
        match err {
            StructureError::Configuration(message) => CrateError::Configuration(message),
            StructureError::Extraction(failure) => CrateError::Other(failure.to_string()),
        }
    }
}
