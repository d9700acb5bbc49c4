//! Gemini streaming completion binding.
//!
//! Streams `streamGenerateContent?alt=sse` over reqwest and extracts the
//! text parts from each `data:` event.

use super::{classify_provider_message, CompletionClient, CompletionStream};
use crate::error::{LekseError, Result};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::instrument;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini streaming completion client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    /// Create a client with a caller-supplied API key.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: API_BASE.to_string(),
        }
    }

    fn map_status(status: reqwest::StatusCode, body: &str) -> LekseError {
        match status.as_u16() {
            400 if body.to_lowercase().contains("api key") => LekseError::Auth(body.to_string()),
            401 => LekseError::Auth(body.to_string()),
            403 => LekseError::PermissionDenied(body.to_string()),
            429 => LekseError::RateLimited(body.to_string()),
            500..=599 => LekseError::ProviderUnavailable(body.to_string()),
            _ => classify_provider_message(body),
        }
    }

    /// Drain complete SSE lines from `buffer`, returning extracted text parts.
    ///
    /// Partial trailing lines stay in the buffer until the next chunk.
    fn drain_sse_lines(buffer: &mut String) -> Vec<String> {
        let mut fragments = Vec::new();

        while let Some(newline) = buffer.find('\n') {
            let line: String = buffer.drain(..=newline).collect();
            let line = line.trim();

            let Some(data) = line.strip_prefix("data: ") else {
                continue;
            };
            if data == "[DONE]" {
                continue;
            }

            let Ok(parsed) = serde_json::from_str::<serde_json::Value>(data) else {
                continue;
            };

            for part in parsed["candidates"][0]["content"]["parts"]
                .as_array()
                .into_iter()
                .flatten()
            {
                if let Some(text) = part["text"].as_str() {
                    if !text.is_empty() {
                        fragments.push(text.to_string());
                    }
                }
            }
        }

        fragments
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    #[instrument(skip(self, prompt))]
    async fn stream_completion(&self, prompt: &str) -> Result<CompletionStream> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.api_base, self.model
        );

        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LekseError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, &detail));
        }

        let mut bytes = response.bytes_stream();

        let stream = try_stream! {
            let mut buffer = String::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|e| LekseError::ProviderUnavailable(e.to_string()))?;
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                for fragment in Self::drain_sse_lines(&mut buffer) {
                    yield fragment;
                }
            }

            // Flush a final event that arrived without a trailing newline.
            if !buffer.ends_with('\n') {
                buffer.push('\n');
                for fragment in Self::drain_sse_lines(&mut buffer) {
                    yield fragment;
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
