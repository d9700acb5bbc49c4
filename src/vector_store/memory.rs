//! In-memory vector store implementation.
//!
//! Useful for testing and local development.

use super::{cosine_similarity, NamespaceProbe, RecordKind, VectorMatch, VectorRecord, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory namespaced vector store.
pub struct MemoryStore {
    namespaces: RwLock<HashMap<String, HashMap<String, VectorRecord>>>,
}

impl MemoryStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> Result<usize> {
        let mut namespaces = self.namespaces.write().unwrap();
        let ns = namespaces.entry(namespace.to_string()).or_default();
        for record in records {
            ns.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<RecordKind>,
    ) -> Result<Vec<VectorMatch>> {
        let namespaces = self.namespaces.read().unwrap();
        let Some(ns) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<VectorMatch> = ns
            .values()
            .filter(|r| filter.is_none_or(|kind| r.metadata.kind == kind))
            .map(|r| VectorMatch {
                id: r.id.clone(),
                score: cosine_similarity(vector, &r.values),
                metadata: r.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn probe(&self, namespace: &str) -> Result<NamespaceProbe> {
        let namespaces = self.namespaces.read().unwrap();
        match namespaces.get(namespace) {
            Some(ns) if !ns.is_empty() => Ok(NamespaceProbe::Exists {
                vector_count: ns.len(),
            }),
            _ => Ok(NamespaceProbe::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::RecordMetadata;

    fn record(id: &str, values: Vec<f32>, kind: RecordKind) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            values,
            metadata: RecordMetadata {
                text: format!("text for {}", id),
                video_id: "video1".to_string(),
                start_time: 0.0,
                end_time: 30.0,
                kind,
            },
        }
    }

    #[tokio::test]
    async fn test_upsert_query_probe() {
        let store = MemoryStore::new();

        assert_eq!(store.probe("video1").await.unwrap(), NamespaceProbe::NotFound);

        store
            .upsert(
                "video1",
                &[
                    record("a", vec![1.0, 0.0, 0.0], RecordKind::TextChunk),
                    record("b", vec![0.0, 1.0, 0.0], RecordKind::TranscriptSegment),
                ],
            )
            .await
            .unwrap();

        assert_eq!(
            store.probe("video1").await.unwrap(),
            NamespaceProbe::Exists { vector_count: 2 }
        );
        assert_eq!(store.probe("video2").await.unwrap(), NamespaceProbe::NotFound);

        let matches = store
            .query("video1", &[1.0, 0.0, 0.0], 10, None)
            .await
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "a");
        assert!(matches[0].score > matches[1].score);
    }

    #[tokio::test]
    async fn test_query_kind_filter() {
        let store = MemoryStore::new();
        store
            .upsert(
                "video1",
                &[
                    record("a", vec![1.0, 0.0, 0.0], RecordKind::TextChunk),
                    record("b", vec![1.0, 0.0, 0.0], RecordKind::TranscriptSegment),
                ],
            )
            .await
            .unwrap();

        let matches = store
            .query("video1", &[1.0, 0.0, 0.0], 10, Some(RecordKind::TextChunk))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "a");
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_by_id() {
        let store = MemoryStore::new();
        store
            .upsert("video1", &[record("a", vec![1.0, 0.0, 0.0], RecordKind::TextChunk)])
            .await
            .unwrap();
        store
            .upsert("video1", &[record("a", vec![0.0, 1.0, 0.0], RecordKind::TextChunk)])
            .await
            .unwrap();

        assert_eq!(
            store.probe("video1").await.unwrap(),
            NamespaceProbe::Exists { vector_count: 1 }
        );
    }

    #[tokio::test]
    async fn test_query_unknown_namespace_is_empty() {
        let store = MemoryStore::new();
        let matches = store.query("missing", &[1.0], 5, None).await.unwrap();
        assert!(matches.is_empty());
    }
}
