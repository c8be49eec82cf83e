//! # Gather - City Event Scraper and Ingestion Pipeline
//!
//! This crate renders a city's event listing page in a headless browser,
//! pulls the raw event cards out of the HTML, asks a Gemini model to turn
//! each card into a structured event record, and POSTs the records to an
//! ingestion API.
//!
//! ## Features
//!
//! - Headless Chrome page rendering with guaranteed browser teardown
//! - Configurable CSS card selectors
//! - Gemini-backed structuring with a fixed category vocabulary
//! - Per-run quota counting attempts, with per-item failure isolation
//! - Async API with Tokio
//! - Structured logging with `tracing`
//!
//! ## Example
//!
//! ```rust,no_run
//! use gather::config::GatherConfig;
//! use gather::pipeline::Pipeline;
//! use gather::structuring::GeminiOracle;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatherConfig::builder().quota(3).build();
//!     let url = config.listing_url("Delhi")?;
//!
//!     // Credential is read from GOOGLE_API_KEY
//!     let oracle = GeminiOracle::from_env(config.model.clone());
//!     let pipeline = Pipeline::from_config(&config, oracle);
//!     let report = pipeline.run(&url, 2).await?;
//!
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod gemini;
pub mod pipeline;
pub mod structuring;
pub mod submission;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
