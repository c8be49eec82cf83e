//! Client entry point for the Gemini API

use crate::gemini::http::HttpClient;
use crate::gemini::models::ModelsService;
use crate::gemini::types::HttpOptions;

/// Client for the Gemini Developer API
#[derive(Clone, Debug)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::with_api_key(api_key.into()),
        }
    }

    /// Create a new client with custom HTTP options
    pub fn with_options(api_key: impl Into<String>, options: HttpOptions) -> Self {
        Self {
            http_client: HttpClient::with_api_key_and_options(api_key.into(), options),
        }
    }

    /// Access the models service
    pub fn models(&self) -> ModelsService {
        ModelsService::new(self.http_client.clone())
    }
}
