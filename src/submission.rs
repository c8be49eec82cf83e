//! # Submission Module
//!
//! Sends structured events to the ingestion API. Every outcome, including
//! transport failure, is reported as a value; nothing here aborts a run.

use std::fmt;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::structuring::StructuredEvent;

/// Default ingestion endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/api/events";

/// The exact payload posted to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(flatten)]
    pub event: StructuredEvent,

    pub city_id: i64,
}

impl StructuredEvent {
    /// Attach the destination city, producing the submission payload.
    ///
    /// A `cityId` the oracle returned itself is replaced.
    pub fn with_city(mut self, city_id: i64) -> SubmissionRecord {
        self.extra.remove("cityId");
        SubmissionRecord {
            event: self,
            city_id,
        }
    }
}

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The sink answered 201
    Accepted,

    /// The sink answered with anything else
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The request never got an HTTP answer
    ConnectionFailed(String),
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted)
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionOutcome::Accepted => write!(f, "accepted"),
            SubmissionOutcome::Rejected { status, body } => {
                write!(f, "rejected (status {}): {}", status, body)
            }
            SubmissionOutcome::ConnectionFailed(cause) => write!(f, "connection failed: {}", cause),
        }
    }
}

/// Somewhere structured events are delivered to
#[allow(async_fn_in_trait)]
pub trait EventSink {
    /// Deliver one record, exactly once
    async fn submit(&self, record: &SubmissionRecord) -> SubmissionOutcome;
}

/// HTTP client for the ingestion API
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    client: Client,
    endpoint: String,
}

impl Default for SubmissionClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl SubmissionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl EventSink for SubmissionClient {
    #[instrument(skip(self, record), fields(title = %record.event.title, city_id = record.city_id))]
    async fn submit(&self, record: &SubmissionRecord) -> SubmissionOutcome {
        let response = match self.client.post(&self.endpoint).json(record).send().await {
            Ok(response) => response,
            Err(e) => return SubmissionOutcome::ConnectionFailed(e.to_string()),
        };

        let status = response.status();
        debug!("Ingestion API answered {}", status);
        if status == StatusCode::CREATED {
            return SubmissionOutcome::Accepted;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Could not read ingestion API response body: {}", e);
                format!("<unreadable response body: {}>", e)
            }
        };
        SubmissionOutcome::Rejected {
            status: status.as_u16(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structuring::EventCategory;
    use mockito::{Matcher, Server};

    fn record() -> SubmissionRecord {
        StructuredEvent {
            title: "Jazz Night".to_string(),
            category: EventCategory::Cultural,
            date: "2026-07-12".to_string(),
            location: "Blue Frog".to_string(),
            description: String::new(),
            image_url: String::new(),
            extra: Default::default(),
        }
        .with_city(2)
    }

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_value(record()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "title": "Jazz Night",
                "category": "CULTURAL",
                "date": "2026-07-12",
                "location": "Blue Frog",
                "description": "",
                "imageUrl": "",
                "cityId": 2
            })
        );
    }

    #[test]
    fn test_extra_oracle_keys_reach_payload() {
        let mut event: StructuredEvent = serde_json::from_str(
            r#"{"title": "Jazz Night", "category": "CULTURAL", "date": null,
                "location": "Blue Frog", "time": "7pm", "cityId": 99}"#,
        )
        .unwrap();
        event.description = "Live quartet.".to_string();

        let json = serde_json::to_value(event.with_city(2)).unwrap();

        assert_eq!(json["time"], "7pm");
        assert_eq!(json["date"], "");
        assert_eq!(json["cityId"], 2);
        assert_eq!(json["description"], "Live quartet.");
    }

    #[tokio::test]
    async fn test_created_is_accepted() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/events")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "title": "Jazz Night",
                "cityId": 2
            })))
            .with_status(201)
            .with_body(r#"{"message": "Event created successfully"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = SubmissionClient::new(format!("{}/api/events", server.url()));
        assert_eq!(client.submit(&record()).await, SubmissionOutcome::Accepted);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_other_success_status_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/events")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let client = SubmissionClient::new(format!("{}/api/events", server.url()));
        assert_eq!(
            client.submit(&record()).await,
            SubmissionOutcome::Rejected {
                status: 200,
                body: "ok".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_bad_request_is_rejected_with_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/events")
            .with_status(400)
            .with_body(r#"{"error": "Missing required event fields."}"#)
            .create_async()
            .await;

        let client = SubmissionClient::new(format!("{}/api/events", server.url()));
        let outcome = client.submit(&record()).await;

        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected { status: 400, ref body } if body.contains("Missing required")
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = SubmissionClient::new(format!("http://127.0.0.1:{}/api/events", port));
        let outcome = client.submit(&record()).await;

        assert!(matches!(outcome, SubmissionOutcome::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_truncated_body_is_reported_in_rejection() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.ends_with(b"}") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 100\r\n\r\nshort")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = SubmissionClient::new(format!("http://{}/api/events", addr));
        let outcome = client.submit(&record()).await;

        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected { status: 400, ref body } if body.starts_with("<unreadable response body")
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_repeat_submission_is_not_deduplicated() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/events")
            .with_status(201)
            .expect(2)
            .create_async()
            .await;

        let client = SubmissionClient::new(format!("{}/api/events", server.url()));
        let record = record();
        assert!(client.submit(&record).await.is_accepted());
        assert!(client.submit(&record).await.is_accepted());

        mock.assert_async().await;
    }
}
