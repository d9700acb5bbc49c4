//! Embedding generation for semantic retrieval.

mod gemini;

pub use gemini::GeminiEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// What the embedding will be used for.
///
/// Use `Query` for user questions and `Document` for indexed content; the
/// model optimizes the vector differently for each, and mixing them up
/// quietly degrades retrieval quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingIntent {
    Query,
    Document,
}

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    ///
    /// Fails with `Embedding` when the text is empty or the request is
    /// rejected (bad credentials, quota).
    async fn embed(&self, text: &str, intent: EmbeddingIntent) -> Result<Vec<f32>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}
