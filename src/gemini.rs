//! Gemini API client
//!
//! A small client for the Gemini Developer API covering what structuring
//! needs: a single `generateContent` call per prompt.

mod client;
mod http;
mod models;
mod types;

pub use client::Client;
pub use models::ModelsService;
pub use types::{
    Candidate, Content, GenerateContentResponse, HttpOptions, Part, PromptFeedback,
};
