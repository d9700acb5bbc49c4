//! Groq streaming completion binding.
//!
//! Groq exposes an OpenAI-compatible endpoint, so this wraps the OpenAI
//! binding with the Groq base URL. Kept as its own type so the provider
//! factory and error mapping stay per-provider.

use super::{CompletionClient, CompletionStream, OpenAiClient};
use crate::error::Result;
use async_trait::async_trait;

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Groq streaming completion client.
pub struct GroqClient {
    inner: OpenAiClient,
}

impl GroqClient {
    /// Create a client with a caller-supplied API key.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            inner: OpenAiClient::with_api_base(api_key, model, Some(GROQ_API_BASE)),
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn stream_completion(&self, prompt: &str) -> Result<CompletionStream> {
        self.inner.stream_completion(prompt).await
    }
}
