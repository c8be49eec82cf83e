//! Models service for content generation

use crate::error::Result;
use crate::gemini::http::HttpClient;
use crate::gemini::types::{Content, GenerateContentRequest, GenerateContentResponse};
use tracing::{debug, instrument};

/// Service for interacting with Gemini models
#[derive(Clone, Debug)]
pub struct ModelsService {
    /// HTTP client for making API requests
    http_client: HttpClient,
}

impl ModelsService {
    /// Create a new models service
    pub(crate) fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Generate content from a model
    #[instrument(skip(self, contents), level = "debug")]
    pub async fn generate_content(
        &self,
        model: impl Into<String> + std::fmt::Debug,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse> {
        let model = model.into();
        let request = GenerateContentRequest { contents };
        let path = format!("models/{}:generateContent", model);

        debug!("Generating content from model {}", model);
        self.http_client.post(&path, &request).await
    }
}
