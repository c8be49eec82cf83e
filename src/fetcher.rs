//! # Page Fetcher Module
//!
//! Renders a dynamic listing page in a headless browser and hands back the
//! resulting HTML. Client-side rendering is given a fixed settle delay rather
//! than an explicit readiness signal, so a slow page can still come back
//! half-rendered.
//!
//! ## Key Components
//!
//! - `PageFetcher`: the seam the pipeline renders pages through
//! - `ChromeFetcher`: chromiumoxide-backed implementation
//! - `FetcherConfig`: browser launch options and the settle delay

mod chrome;
mod config;
mod error;

pub use chrome::ChromeFetcher;
pub use config::{FetcherConfig, FetcherConfigBuilder};
pub use error::FetchError;

/// A fully rendered HTML document
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    /// URL the document was rendered from
    pub url: String,

    /// Serialized DOM after the settle delay
    pub html: String,
}

impl HtmlDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Something that can turn a URL into rendered HTML
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Render `url` and return its document source
    async fn fetch(&self, url: &str) -> Result<HtmlDocument, FetchError>;
}
