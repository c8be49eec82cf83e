//! # AI Structuring Module
//!
//! Converts the flattened text of one raw fragment into a `StructuredEvent` by
//! asking a generative model for a JSON object.
//!
//! ## Key Components
//!
//! - `Oracle`: the text-to-text model seam, with `GeminiOracle` as the real one
//! - `Structurer`: prompt building, one oracle call, fence stripping, JSON parse
//! - `StructuredEvent` / `EventCategory`: the record the oracle is asked for
//!
//! The reply is checked only for JSON shape. A wrong category string or a
//! badly formatted date is passed through as-is; the ingestion API is the
//! authority on those.

mod error;
mod event;
mod oracle;
mod prompt;

pub use error::{ExtractionFailure, StructureError};
pub use event::{EventCategory, StructuredEvent};
pub use oracle::{API_KEY_VARS, DEFAULT_MODEL, GeminiOracle, Oracle};
pub use prompt::build_prompt;

use chrono::Datelike;
use tracing::{debug, instrument, trace};

use crate::error::Error;

/// Turns raw fragment text into structured events with one oracle call each
#[derive(Debug, Clone)]
pub struct Structurer<O> {
    oracle: O,
    year: Option<i32>,
}

impl<O: Oracle> Structurer<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle, year: None }
    }

    /// Pin the year assumed for dates without one (defaults to the current year)
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Structure one fragment's flattened text
    ///
    /// # Arguments
    ///
    /// * `raw_text` - Output of `RawEventFragment::flatten`
    ///
    /// # Returns
    ///
    /// The parsed event, a per-item `ExtractionFailure`, or a fatal
    /// configuration error
    #[instrument(skip_all, level = "debug")]
    pub async fn structure(&self, raw_text: &str) -> Result<StructuredEvent, StructureError> {
        let year = self.year.unwrap_or_else(|| chrono::Local::now().year());
        let prompt = build_prompt(raw_text, year);
        trace!("Prompt: {}", prompt);

        let reply = match self.oracle.generate(&prompt).await {
            Ok(reply) => reply,
            Err(Error::Configuration(message)) => {
                return Err(StructureError::Configuration(message));
            }
            Err(e) => return Err(ExtractionFailure::Oracle(e).into()),
        };

        debug!("Parsing oracle reply of {} chars", reply.len());
        Ok(parse_reply(&reply)?)
    }
}

/// Remove Markdown code-fence markers around a JSON reply
pub fn strip_code_fences(reply: &str) -> String {
    reply
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a raw oracle reply, fenced or not, into an event
pub fn parse_reply(reply: &str) -> Result<StructuredEvent, ExtractionFailure> {
    let cleaned = strip_code_fences(reply);
    serde_json::from_str(&cleaned).map_err(|source| ExtractionFailure::Parse {
        source,
        reply: reply.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockOracle;
    use mockito::Server;

    const REPLY: &str = r#"{"title": "Jazz Night", "category": "CULTURAL", "date": "2026-07-12",
        "location": "Blue Frog", "description": "A night of live jazz.",
        "imageUrl": "https://cdn.example.com/jazz.jpg"}"#;

    #[test]
    fn test_fenced_and_unfenced_replies_parse_identically() {
        let fenced = format!("```json\n{}\n```", REPLY);
        let bare_fence = format!("```\n{}\n```", REPLY);

        let plain = parse_reply(REPLY).unwrap();
        assert_eq!(parse_reply(&fenced).unwrap(), plain);
        assert_eq!(parse_reply(&bare_fence).unwrap(), plain);
        assert_eq!(plain.category, EventCategory::Cultural);
    }

    #[test]
    fn test_non_json_reply_is_extraction_failure() {
        let result = parse_reply("Sorry, I can't help with that.");
        assert!(matches!(result, Err(ExtractionFailure::Parse { .. })));
    }

    #[test]
    fn test_unvalidated_values_pass_through() {
        let reply = r#"{"title": "X", "category": "Music", "date": "next friday",
            "location": "Y", "description": "", "imageUrl": ""}"#;
        let event = parse_reply(reply).unwrap();

        assert_eq!(event.category, EventCategory::Unlisted("Music".to_string()));
        assert_eq!(event.date, "next friday");
    }

    #[tokio::test]
    async fn test_structure_sends_prompt_with_raw_text() {
        let oracle = MockOracle::new();
        oracle.push_reply(REPLY).await;
        let structurer = Structurer::new(oracle.clone()).with_year(2026);

        let event = structurer.structure("Title: Jazz Night").await.unwrap();
        assert_eq!(event.title, "Jazz Night");

        let prompts = oracle.prompts().await;
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Title: Jazz Night"));
        assert!(prompts[0].contains("2026"));
    }

    #[tokio::test]
    async fn test_oracle_error_is_extraction_failure() {
        let oracle = MockOracle::new();
        oracle
            .push_error(Error::Api {
                status_code: 503,
                message: "overloaded".to_string(),
            })
            .await;
        let structurer = Structurer::new(oracle);

        let result = structurer.structure("Title: X").await;
        assert!(matches!(
            result,
            Err(StructureError::Extraction(ExtractionFailure::Oracle(_)))
        ));
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let structurer = Structurer::new(GeminiOracle::new(None, DEFAULT_MODEL));

        let result = structurer.structure("Title: X").await;
        assert!(matches!(result, Err(StructureError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_gemini_oracle_round_trip() {
        let mut server = Server::new_async().await;
        let body = serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"text": format!("```json\n{}\n```", REPLY)}
            ]}}]
        });
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "k".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await;

        let options = crate::gemini::HttpOptions {
            base_url: server.url(),
            ..Default::default()
        };
        let client = crate::gemini::Client::with_options("k", options);
        let structurer = Structurer::new(GeminiOracle::with_client(client, DEFAULT_MODEL));

        let event = structurer.structure("Title: Jazz Night").await.unwrap();
        assert_eq!(event.location, "Blue Frog");
        assert_eq!(event.image_url, "https://cdn.example.com/jazz.jpg");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_http_failure_is_single_attempt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let options = crate::gemini::HttpOptions {
            base_url: server.url(),
            ..Default::default()
        };
        let client = crate::gemini::Client::with_options("k", options);
        let structurer = Structurer::new(GeminiOracle::with_client(client, DEFAULT_MODEL));

        let result = structurer.structure("Title: X").await;
        assert!(matches!(result, Err(StructureError::Extraction(_))));

        mock.assert_async().await;
    }
}
