//! # Test doubles
//!
//! In-memory stand-ins for the three external collaborators so the pipeline
//! can be driven without a browser, a model or an ingestion API.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::fetcher::{FetchError, HtmlDocument, PageFetcher};
use crate::structuring::Oracle;
use crate::submission::{EventSink, SubmissionOutcome, SubmissionRecord};

/// Oracle answering from a queue of canned replies.
///
/// Once the queue is empty every prompt fails with `Error::Other`.
#[derive(Debug, Clone, Default)]
pub struct MockOracle {
    replies: Arc<Mutex<VecDeque<Result<String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().await.push_back(Ok(reply.into()));
    }

    pub async fn push_error(&self, error: Error) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Every prompt received so far
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

impl Oracle for MockOracle {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().await.push(prompt.to_string());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other("no mock reply queued".to_string())))
    }
}

/// Fetcher serving a fixed document, or failing
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    html: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            calls: Arc::default(),
        }
    }

    /// A fetcher whose every fetch fails with a navigation error
    pub fn failing() -> Self {
        Self {
            html: None,
            calls: Arc::default(),
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<HtmlDocument, FetchError> {
        self.calls.lock().await.push(url.to_string());
        match &self.html {
            Some(html) => Ok(HtmlDocument::new(url, html.clone())),
            None => Err(FetchError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
        }
    }
}

/// Sink recording every record and answering from a queue of outcomes.
///
/// Once the queue is empty every submission is `Accepted`.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    outcomes: Arc<Mutex<VecDeque<SubmissionOutcome>>>,
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_outcome(&self, outcome: SubmissionOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    pub async fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().await.clone()
    }
}

impl EventSink for RecordingSink {
    async fn submit(&self, record: &SubmissionRecord) -> SubmissionOutcome {
        self.records.lock().await.push(record.clone());
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or(SubmissionOutcome::Accepted)
    }
}

/// Listing page with `count` complete event cards titled `Event 1..=count`
pub fn listing_html(count: usize) -> String {
    let cards: String = (1..=count)
        .map(|i| {
            format!(
                r#"<li class="event-card"><h3>Event {i}</h3><div class="date">Sat, {i} Aug</div>
                   <div class="subtitle">Venue {i}</div></li>"#
            )
        })
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", cards)
}

/// A well-formed oracle reply for `title`
pub fn event_reply(title: &str) -> String {
    serde_json::json!({
        "title": title,
        "category": "ENTERTAINMENT",
        "date": "2026-08-01",
        "location": "Venue",
        "description": "",
        "imageUrl": ""
    })
    .to_string()
}
