//! Error types for the gather crate

use thiserror::Error;

use crate::extractor::ExtractError;
use crate::fetcher::FetchError;

/// Result type for gather operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for gather operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Required configuration (such as the model credential) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// The listing page could not be rendered
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The rendered page could not be turned into fragments
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
