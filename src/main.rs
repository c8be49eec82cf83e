//! # Gather CLI Application
//!
//! Runs the scrape-and-ingest pipeline once for one city:
//!
//! ```text
//! gather <CITY_NAME> <CITY_ID> [--quota N] [--endpoint URL] ...
//! ```
//!
//! The Gemini credential is read from `GOOGLE_API_KEY` (or `GEMINI_API_KEY`),
//! optionally loaded from a `.env` file in the working directory. The process
//! exits non-zero when the run aborts.

mod telemetry;

use std::path::PathBuf;

use clap::Parser;
use gather::config::{DEFAULT_QUOTA, DEFAULT_SITE, GatherConfig};
use gather::fetcher::FetcherConfig;
use gather::pipeline::Pipeline;
use gather::structuring::{API_KEY_VARS, DEFAULT_MODEL, GeminiOracle};
use gather::submission::DEFAULT_ENDPOINT;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape a city's event listings and ingest them as structured events", long_about = None)]
struct Cli {
    /// City name as it appears in the listing URL (e.g. "delhi")
    city_name: String,

    /// Numeric city identifier attached to every submitted event
    city_id: i64,

    /// Maximum number of events to attempt
    #[arg(short, long, default_value_t = DEFAULT_QUOTA)]
    quota: usize,

    /// Ingestion API endpoint
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Gemini model used for structuring
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Listing site base URL
    #[arg(long, default_value = DEFAULT_SITE)]
    site: String,

    /// Milliseconds to wait after navigation for client-side rendering
    #[arg(long, default_value_t = 5000)]
    settle_ms: u64,

    /// Path to the Chrome or Chromium executable
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Also write logs to gather.log in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> GatherConfig {
        let fetcher = FetcherConfig::builder()
            .headless(!self.headed)
            .settle_delay_ms(self.settle_ms)
            .chrome_executable(self.chrome.clone())
            .build();

        GatherConfig::builder()
            .site(self.site.clone())
            .endpoint(self.endpoint.clone())
            .quota(self.quota)
            .model(self.model.clone())
            .fetcher(fetcher)
            .build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();
    let _otel = telemetry::init_tracing_subscriber(cli.log_dir.as_deref())?;
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Could not load .env file: {}", e);
        }
    }

    let config = cli.config();
    let url = config.listing_url(&cli.city_name)?;

    let oracle = GeminiOracle::from_env(config.model.clone());
    if !oracle.has_credential() {
        warn!(
            "{} is not set; structuring will fail on the first event",
            API_KEY_VARS[0]
        );
    }
    let pipeline = Pipeline::from_config(&config, oracle);

    info!("Scraping events for {} (city {}) from {}", cli.city_name, cli.city_id, url);

    match pipeline.run(&url, cli.city_id).await {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        Err(e) => {
            error!("Scraping run aborted: {}", e);
            Err(e.into())
        }
    }
}
