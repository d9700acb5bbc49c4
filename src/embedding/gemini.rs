//! Gemini embeddings implementation.

use super::{Embedder, EmbeddingIntent};
use crate::error::{LekseError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini-based embedder using the embedContent endpoint.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    api_base: String,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

impl GeminiEmbedder {
    /// Create a new Gemini embedder with default model settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, "embedding-001", 768)
    }

    /// Create a new Gemini embedder with a custom model and dimensions.
    pub fn with_config(api_key: impl Into<String>, model: &str, dimensions: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.to_string(),
            dimensions,
            api_base: API_BASE.to_string(),
        }
    }

    fn task_type(intent: EmbeddingIntent) -> &'static str {
        match intent {
            EmbeddingIntent::Query => "RETRIEVAL_QUERY",
            EmbeddingIntent::Document => "RETRIEVAL_DOCUMENT",
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str, intent: EmbeddingIntent) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(LekseError::Embedding(
                "Cannot embed empty text".to_string(),
            ));
        }

        let url = format!(
            "{}/models/{}:embedContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let body = serde_json::json!({
            "content": { "role": "user", "parts": [{ "text": text }] },
            "taskType": Self::task_type(intent),
        });

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LekseError::Embedding(format!(
                "embedContent returned {}: {}",
                status, detail
            )));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| LekseError::Embedding(format!("Malformed embedding response: {}", e)))?;

        debug!("Generated {}-dim embedding", parsed.embedding.values.len());
        Ok(parsed.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = GeminiEmbedder::new("test-key");
        assert_eq!(embedder.dimensions(), 768);

        let embedder = GeminiEmbedder::with_config("test-key", "text-embedding-004", 1536);
        assert_eq!(embedder.dimensions(), 1536);
    }

    #[test]
    fn test_task_type_mapping() {
        assert_eq!(GeminiEmbedder::task_type(EmbeddingIntent::Query), "RETRIEVAL_QUERY");
        assert_eq!(
            GeminiEmbedder::task_type(EmbeddingIntent::Document),
            "RETRIEVAL_DOCUMENT"
        );
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let embedder = GeminiEmbedder::new("test-key");
        let err = embedder.embed("   ", EmbeddingIntent::Query).await.unwrap_err();
        assert!(matches!(err, LekseError::Embedding(_)));
    }
}
