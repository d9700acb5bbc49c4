//! Vector store abstraction for Lekse.
//!
//! Vectors are partitioned into one namespace per video, so similarity
//! search is always scoped to a single video's content.

mod memory;
mod pinecone;

pub use memory::MemoryStore;
pub use pinecone::PineconeStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The kind of content a record was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// An overlapping word-window chunk (long context).
    TextChunk,
    /// A single subtitle segment (fine-grained timestamps).
    TranscriptSegment,
}

/// Metadata stored alongside each vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// The text this vector was computed from.
    pub text: String,
    /// Video this record belongs to (also the namespace).
    pub video_id: String,
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Record kind, used as a query filter.
    #[serde(rename = "type")]
    pub kind: RecordKind,
}

/// A vector record, owned by the store and idempotent by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    /// Deterministic id for a text chunk of a video.
    pub fn chunk_id(video_id: &str, index: usize) -> String {
        format!("{}_chunk_{}", video_id, index)
    }

    /// Deterministic id for a transcript segment of a video.
    pub fn segment_id(video_id: &str, index: usize) -> String {
        format!("{}_segment_{}", video_id, index)
    }
}

/// A similarity match with score.
#[derive(Debug, Clone)]
pub struct VectorMatch {
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    pub metadata: RecordMetadata,
}

/// Outcome of a namespace existence probe.
///
/// Transport failures surface as `Err`, not as `NotFound`, so a store
/// outage is never mistaken for "this video was never indexed".
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceProbe {
    Exists { vector_count: usize },
    NotFound,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Upsert records into a namespace. Idempotent by record id.
    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> Result<usize>;

    /// Query a namespace for the closest vectors, optionally filtered by kind.
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<RecordKind>,
    ) -> Result<Vec<VectorMatch>>;

    /// Probe whether a namespace has been indexed.
    async fn probe(&self, namespace: &str) -> Result<NamespaceProbe>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_record_ids_are_deterministic() {
        assert_eq!(VectorRecord::chunk_id("abc123", 4), "abc123_chunk_4");
        assert_eq!(VectorRecord::segment_id("abc123", 0), "abc123_segment_0");
    }

    #[test]
    fn test_record_kind_serializes_snake_case() {
        let json = serde_json::to_string(&RecordKind::TextChunk).unwrap();
        assert_eq!(json, r#""text_chunk""#);
        let json = serde_json::to_string(&RecordKind::TranscriptSegment).unwrap();
        assert_eq!(json, r#""transcript_segment""#);
    }
}
