//! Error types for the extractor module

use thiserror::Error;

/// Error type for card extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A configured CSS selector did not parse
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// The selector as configured
        selector: String,
        /// Parser message
        message: String,
    },
}
