//! Error types for the fetcher module

use thiserror::Error;

/// Error type for page fetching
#[derive(Debug, Error)]
pub enum FetchError {
    /// No usable Chrome/Chromium binary
    #[error("Browser not found: {0}")]
    BrowserNotFound(String),

    /// The browser could not be configured or started
    #[error("Browser launch error: {0}")]
    Launch(String),

    /// Opening the page or navigating to it failed
    #[error("Navigation error for {url}: {message}")]
    Navigation {
        /// URL being rendered
        url: String,
        /// Underlying cause
        message: String,
    },

    /// The rendered document could not be read back
    #[error("Content capture error: {0}")]
    Capture(String),

    /// Built without browser support
    #[error("Operation not supported: {0}")]
    Unsupported(String),
}
