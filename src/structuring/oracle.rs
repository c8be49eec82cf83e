//! The generative model behind structuring

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::gemini::{Client, Content};

/// Environment variables consulted for the Gemini credential, in order
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Default model for structuring
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// A text-in, text-out generative model
#[allow(async_fn_in_trait)]
pub trait Oracle {
    /// Send one prompt and return the model's raw text reply
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gemini-backed oracle.
///
/// The credential is only checked when the first prompt is sent, so a run
/// without a key fails on its first structuring call.
#[derive(Debug, Clone)]
pub struct GeminiOracle {
    client: Option<Client>,
    model: String,
}

impl GeminiOracle {
    /// Create an oracle from an optional API key
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: api_key.filter(|key| !key.trim().is_empty()).map(Client::with_api_key),
            model: model.into(),
        }
    }

    /// Create an oracle with the credential taken from the environment
    pub fn from_env(model: impl Into<String>) -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
        Self::new(api_key, model)
    }

    /// Create an oracle around an existing client
    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            model: model.into(),
        }
    }

    /// Whether an API key was found; without one the first prompt fails
    pub fn has_credential(&self) -> bool {
        self.client.is_some()
    }
}

impl Oracle for GeminiOracle {
    #[instrument(skip(self, prompt), fields(model = %self.model), level = "debug")]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let client = self.client.as_ref().ok_or_else(|| {
            Error::Configuration(format!(
                "{} not found. Set it in the environment or a .env file",
                API_KEY_VARS[0]
            ))
        })?;

        let content = Content::new().with_role("user").with_text(prompt);
        let response = client
            .models()
            .generate_content(&self.model, vec![content])
            .await?;

        if let Some(reason) = response.block_reason() {
            return Err(Error::UnexpectedResponse(format!(
                "prompt blocked: {}",
                reason
            )));
        }

        let text = response.text();
        debug!("Oracle replied with {} chars", text.len());
        Ok(text)
    }
}
