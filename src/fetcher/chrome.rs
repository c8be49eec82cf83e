//! Chrome-backed page fetcher.
//!
//! Each fetch launches its own browser, renders one page and shuts the browser
//! down again before returning, so nothing downstream of the fetch can keep
//! the session alive.

use std::path::PathBuf;

#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
#[cfg(feature = "browser")]
use tracing::warn;

use super::{FetchError, FetcherConfig, HtmlDocument, PageFetcher};

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/opt/google/chrome/google-chrome",
];

/// Executable names looked up on `PATH` when no well-known path exists.
const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Renders pages with a headless Chrome/Chromium instance
#[derive(Debug, Clone, Default)]
pub struct ChromeFetcher {
    config: FetcherConfig,
}

impl ChromeFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Resolve the browser binary: configured path first, then well-known
    /// locations, then `PATH`.
    #[cfg_attr(not(feature = "browser"), allow(dead_code))]
    fn find_chrome(&self) -> Result<PathBuf, FetchError> {
        if let Some(path) = &self.config.chrome_executable {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(FetchError::BrowserNotFound(format!(
                "configured executable {} does not exist",
                path.display()
            )));
        }

        for path in CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                info!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in CHROME_COMMANDS {
            if let Ok(path) = which::which(cmd) {
                info!("Found Chrome in PATH: {}", path.display());
                return Ok(path);
            }
        }

        Err(FetchError::BrowserNotFound(
            "Chrome/Chromium not found. Install chromium or pass --chrome <path>".to_string(),
        ))
    }

    /// Launch flags for the session
    #[cfg_attr(not(feature = "browser"), allow(dead_code))]
    fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
        ];
        args.extend(self.config.chrome_args.iter().cloned());
        args
    }
}

impl PageFetcher for ChromeFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<HtmlDocument, FetchError> {
        #[cfg(feature = "browser")]
        {
            let session = BrowserSession::launch(self).await?;

            // The session is closed whatever render returns.
            let rendered = session.render(url, &self.config).await;
            session.close().await;

            let html = rendered?;
            debug!("Rendered {} bytes from {}", html.len(), url);
            Ok(HtmlDocument::new(url, html))
        }

        #[cfg(not(feature = "browser"))]
        {
            debug!("Refusing to fetch {} without browser support", url);
            Err(FetchError::Unsupported(
                "browser support not compiled. Rebuild with: cargo build --features browser"
                    .to_string(),
            ))
        }
    }
}

/// A launched browser plus the task pumping its CDP connection.
///
/// `close` is the normal release path. Dropping an unclosed session (for
/// example when the fetch future is cancelled) aborts the pump and lets
/// chromiumoxide kill the child process.
#[cfg(feature = "browser")]
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

#[cfg(feature = "browser")]
impl BrowserSession {
    async fn launch(fetcher: &ChromeFetcher) -> Result<Self, FetchError> {
        let chrome_path = fetcher.find_chrome()?;
        info!("Launching browser (headless={})", fetcher.config.headless);

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);
        // with_head means NOT headless
        if !fetcher.config.headless {
            builder = builder.with_head();
        }
        for arg in fetcher.launch_args() {
            builder = builder.arg(arg);
        }

        let config = builder
            .build()
            .map_err(|e| FetchError::Launch(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Launch(format!("Failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self { browser, handler })
    }

    async fn render(&self, url: &str, config: &FetcherConfig) -> Result<String, FetchError> {
        info!("Navigating to {}", url);
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| FetchError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        debug!("Waiting {:?} for dynamic content", config.settle_delay());
        tokio::time::sleep(config.settle_delay()).await;

        let content = page
            .content()
            .await
            .map_err(|e| FetchError::Capture(e.to_string()));

        if let Err(e) = page.close().await {
            debug!("Page close failed: {}", e);
        }
        content
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        debug!("Browser session closed");
    }
}

#[cfg(feature = "browser")]
impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
