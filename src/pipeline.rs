//! # Pipeline Orchestrator
//!
//! Sequences one run: fetch the listing page once, extract fragments once,
//! then structure and submit fragments one at a time until the quota is used
//! up or the fragments run out.
//!
//! The quota counts attempts, not successes. A fragment whose structuring or
//! submission fails still uses up one unit. Only configuration, fetch and
//! selector errors end a run early; every per-item failure is logged,
//! recorded in the `RunReport` and the loop moves on.

use std::fmt;

use tracing::{debug, error, info, instrument, warn};

use crate::config::GatherConfig;
use crate::error::{Error, Result};
use crate::extractor::{CardSelectors, RawEventFragment, extract_fragments};
use crate::fetcher::{ChromeFetcher, PageFetcher};
use crate::structuring::{GeminiOracle, Oracle, StructureError, Structurer};
use crate::submission::{EventSink, SubmissionClient, SubmissionOutcome};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    Extracting,
    ProcessingItem,
    Done,
    Aborted,
}

/// What happened to one attempted fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Structured and handed to the sink
    Submitted(SubmissionOutcome),

    /// The oracle call or reply parse failed; nothing was submitted
    StructuringFailed(String),
}

/// One attempted fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub title: String,
    pub outcome: ItemOutcome,
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Listing URL that was rendered
    pub url: String,

    /// Complete fragments found on the page
    pub found: usize,

    /// Quota configured for the run
    pub quota: usize,

    /// One entry per attempted fragment, in order
    pub items: Vec<ItemReport>,

    /// Terminal state
    pub state: RunState,
}

impl RunReport {
    /// Fragments that used up quota
    pub fn processed(&self) -> usize {
        self.items.len()
    }

    /// Fragments never looked at because the quota ran out
    pub fn untouched(&self) -> usize {
        self.found - self.items.len()
    }

    pub fn accepted(&self) -> usize {
        self.count(|outcome| matches!(outcome, ItemOutcome::Submitted(SubmissionOutcome::Accepted)))
    }

    pub fn rejected(&self) -> usize {
        self.count(|outcome| {
            matches!(outcome, ItemOutcome::Submitted(SubmissionOutcome::Rejected { .. }))
        })
    }

    pub fn connection_failures(&self) -> usize {
        self.count(|outcome| {
            matches!(outcome, ItemOutcome::Submitted(SubmissionOutcome::ConnectionFailed(_)))
        })
    }

    pub fn structuring_failures(&self) -> usize {
        self.count(|outcome| matches!(outcome, ItemOutcome::StructuringFailed(_)))
    }

    fn count(&self, predicate: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| predicate(&item.outcome)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} of {} events (quota {}): {} saved, {} rejected, {} connection errors, {} not structured",
            self.processed(),
            self.found,
            self.quota,
            self.accepted(),
            self.rejected(),
            self.connection_failures(),
            self.structuring_failures()
        )
    }
}

/// The fetch → extract → structure → submit pipeline
#[derive(Debug)]
pub struct Pipeline<F, O, S> {
    fetcher: F,
    structurer: Structurer<O>,
    sink: S,
    selectors: CardSelectors,
    quota: usize,
}

impl Pipeline<ChromeFetcher, GeminiOracle, SubmissionClient> {
    /// Production pipeline: Chrome, the given Gemini oracle and the HTTP
    /// ingestion API
    pub fn from_config(config: &GatherConfig, oracle: GeminiOracle) -> Self {
        Pipeline::new(
            ChromeFetcher::new(config.fetcher.clone()),
            Structurer::new(oracle),
            SubmissionClient::new(config.endpoint.clone()),
        )
        .with_quota(config.quota)
        .with_selectors(config.selectors.clone())
    }
}

impl<F, O, S> Pipeline<F, O, S>
where
    F: PageFetcher,
    O: Oracle,
    S: EventSink,
{
    pub fn new(fetcher: F, structurer: Structurer<O>, sink: S) -> Self {
        Self {
            fetcher,
            structurer,
            sink,
            selectors: CardSelectors::default(),
            quota: crate::config::DEFAULT_QUOTA,
        }
    }

    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    pub fn with_selectors(mut self, selectors: CardSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Run the pipeline once against `url`, tagging every record with `city_id`
    #[instrument(skip(self), fields(quota = self.quota))]
    pub async fn run(&self, url: &str, city_id: i64) -> Result<RunReport> {
        let mut state = RunState::Idle;

        transition(&mut state, RunState::Fetching);
        let document = match self.fetcher.fetch(url).await {
            Ok(document) => document,
            Err(e) => {
                transition(&mut state, RunState::Aborted);
                error!("Could not render {}: {}", url, e);
                return Err(Error::Fetch(e));
            }
        };

        transition(&mut state, RunState::Extracting);
        let fragments = match extract_fragments(&document, &self.selectors) {
            Ok(fragments) => fragments,
            Err(e) => {
                transition(&mut state, RunState::Aborted);
                error!("Could not extract events: {}", e);
                return Err(Error::Extract(e));
            }
        };

        info!(
            "Found {} events. Processing up to {} events...",
            fragments.len(),
            self.quota
        );

        let mut report = RunReport {
            url: url.to_string(),
            found: fragments.len(),
            quota: self.quota,
            items: Vec::new(),
            state,
        };

        for fragment in &fragments {
            if report.processed() >= self.quota {
                break;
            }
            transition(&mut state, RunState::ProcessingItem);

            match self.process(fragment, city_id).await {
                Ok(item) => report.items.push(item),
                Err(e) => {
                    transition(&mut state, RunState::Aborted);
                    error!("Run aborted: {}", e);
                    return Err(e);
                }
            }

            if report.processed() >= self.quota {
                info!("Processed {} events. Stopping.", self.quota);
                break;
            }
        }

        transition(&mut state, RunState::Done);
        report.state = state;
        Ok(report)
    }

    /// Structure and submit one fragment. Only a fatal error is returned as
    /// `Err`; per-item failures come back inside the `ItemReport`.
    async fn process(&self, fragment: &RawEventFragment, city_id: i64) -> Result<ItemReport> {
        info!("Processing: {}...", fragment.title);

        let outcome = match self.structurer.structure(&fragment.flatten()).await {
            Ok(event) => {
                let record = event.with_city(city_id);
                let outcome = self.sink.submit(&record).await;
                match &outcome {
                    SubmissionOutcome::Accepted => {
                        info!("Success: Saved event '{}'", record.event.title)
                    }
                    SubmissionOutcome::Rejected { status, body } => warn!(
                        "Could not save event '{}'. Status: {}, Response: {}",
                        record.event.title, status, body
                    ),
                    SubmissionOutcome::ConnectionFailed(cause) => {
                        warn!("API connection error: {}", cause)
                    }
                }
                ItemOutcome::Submitted(outcome)
            }
            Err(StructureError::Extraction(failure)) => {
                warn!("Error processing '{}' with AI: {}", fragment.title, failure);
                ItemOutcome::StructuringFailed(failure.to_string())
            }
            Err(e @ StructureError::Configuration(_)) => return Err(e.into()),
        };

        Ok(ItemReport {
            title: fragment.title.clone(),
            outcome,
        })
    }
}

fn transition(state: &mut RunState, next: RunState) {
    if *state != next {
        debug!("Run state {:?} -> {:?}", state, next);
        *state = next;
    }
}
