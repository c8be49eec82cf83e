//! # Run Configuration Module
//!
//! Everything a single scrape-and-ingest run needs besides the city itself,
//! assembled with a builder.
//!
//! ## Key Components
//!
//! - `GatherConfig`: listing site, ingestion endpoint, quota, model, browser
//!   options and card selectors
//! - `GatherConfigBuilder`: builder pattern implementation for easier configuration

use url::Url;

use crate::error::{Error, Result};
use crate::extractor::CardSelectors;
use crate::fetcher::FetcherConfig;
use crate::structuring::DEFAULT_MODEL;
use crate::submission::DEFAULT_ENDPOINT;

/// Default listing site
pub const DEFAULT_SITE: &str = "https://allevents.in";

/// Default number of fragments attempted per run
pub const DEFAULT_QUOTA: usize = 5;

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct GatherConfig {
    /// Base URL of the listing site
    pub site: String,

    /// Ingestion API endpoint events are POSTed to
    pub endpoint: String,

    /// Maximum number of fragments attempted, successful or not
    pub quota: usize,

    /// Gemini model used for structuring
    pub model: String,

    /// Headless browser options
    pub fetcher: FetcherConfig,

    /// Where event cards live in the listing page
    pub selectors: CardSelectors,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            quota: DEFAULT_QUOTA,
            model: DEFAULT_MODEL.to_string(),
            fetcher: FetcherConfig::default(),
            selectors: CardSelectors::default(),
        }
    }
}

impl GatherConfig {
    /// Create a new builder
    pub fn builder() -> GatherConfigBuilder {
        GatherConfigBuilder::new()
    }

    /// Listing URL for a city: `{site}/{city}/all`, city lower-cased
    pub fn listing_url(&self, city_name: &str) -> Result<String> {
        let city = city_name.trim().to_lowercase();
        if city.is_empty() {
            return Err(Error::Configuration("city name must not be empty".to_string()));
        }

        let base = Url::parse(&format!("{}/", self.site.trim_end_matches('/')))
            .map_err(|e| Error::Configuration(format!("invalid site URL '{}': {}", self.site, e)))?;
        let url = base
            .join(&format!("{}/all", city))
            .map_err(|e| Error::Configuration(format!("invalid city '{}': {}", city_name, e)))?;

        Ok(url.to_string())
    }
}

/// Builder for GatherConfig
#[derive(Debug, Default)]
pub struct GatherConfigBuilder {
    config: GatherConfig,
}

impl GatherConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GatherConfig::default(),
        }
    }

    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.config.site = site.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn quota(mut self, quota: usize) -> Self {
        self.config.quota = quota;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn fetcher(mut self, fetcher: FetcherConfig) -> Self {
        self.config.fetcher = fetcher;
        self
    }

    pub fn selectors(mut self, selectors: CardSelectors) -> Self {
        self.config.selectors = selectors;
        self
    }

    /// Build the configuration
    pub fn build(self) -> GatherConfig {
        self.config
    }
}
