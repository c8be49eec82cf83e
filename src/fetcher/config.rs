//! Browser configuration for the page fetcher

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the headless browser session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Run without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// How long to wait after navigation for client-side rendering
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Explicit Chrome/Chromium binary; searched for when unset
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Additional Chrome arguments
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

pub fn default_headless() -> bool {
    true
}

pub fn default_settle_delay_ms() -> u64 {
    5_000
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            settle_delay_ms: default_settle_delay_ms(),
            chrome_executable: None,
            chrome_args: Vec::new(),
        }
    }
}

impl FetcherConfig {
    /// Create a new builder
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::new()
    }

    /// Get the settle delay as a Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Builder for FetcherConfig
#[derive(Debug, Default)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FetcherConfig::default(),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn settle_delay_ms(mut self, settle_delay_ms: u64) -> Self {
        self.config.settle_delay_ms = settle_delay_ms;
        self
    }

    pub fn chrome_executable(mut self, path: Option<PathBuf>) -> Self {
        self.config.chrome_executable = path;
        self
    }

    pub fn chrome_args(mut self, chrome_args: Vec<String>) -> Self {
        self.config.chrome_args = chrome_args;
        self
    }

    pub fn build(self) -> FetcherConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::default();
        assert!(config.headless);
        assert_eq!(config.settle_delay(), Duration::from_secs(5));
        assert!(config.chrome_executable.is_none());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: FetcherConfig = serde_json::from_str(r#"{"settle_delay_ms": 250}"#).unwrap();
        assert!(config.headless);
        assert_eq!(config.settle_delay_ms, 250);
        assert!(config.chrome_args.is_empty());
    }
}
