//! Pinecone vector store implementation.
//!
//! Thin binding over the Pinecone data-plane REST API: upsert, query, and
//! describe_index_stats (used as the namespace existence probe).

use super::{NamespaceProbe, RecordKind, RecordMetadata, VectorMatch, VectorRecord, VectorStore};
use crate::error::{LekseError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Pinecone-backed vector store.
pub struct PineconeStore {
    client: reqwest::Client,
    index_host: String,
    api_key: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    metadata: RecordMetadata,
}

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(default)]
    namespaces: HashMap<String, NamespaceStats>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceStats {
    #[serde(default)]
    vector_count: usize,
}

impl PineconeStore {
    pub fn new(index_host: impl Into<String>, api_key: impl Into<String>) -> Self {
        let index_host = index_host.into();
        Self {
            client: reqwest::Client::new(),
            index_host: index_host.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{}", self.index_host, path))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LekseError::VectorStore(format!(
                "{} returned {}: {}",
                path, status, detail
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert(&self, namespace: &str, records: &[VectorRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        // Pinecone caps upsert batches; send in slices.
        const BATCH_SIZE: usize = 100;
        for batch in records.chunks(BATCH_SIZE) {
            let body = serde_json::json!({
                "vectors": batch,
                "namespace": namespace,
            });
            self.post("/vectors/upsert", body).await?;
        }

        debug!("Upserted {} vectors into namespace {}", records.len(), namespace);
        Ok(records.len())
    }

    #[instrument(skip(self, vector))]
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<RecordKind>,
    ) -> Result<Vec<VectorMatch>> {
        let mut body = serde_json::json!({
            "vector": vector,
            "topK": top_k,
            "namespace": namespace,
            "includeMetadata": true,
        });

        if let Some(kind) = filter {
            body["filter"] = serde_json::json!({ "type": { "$eq": kind } });
        }

        let response = self.post("/query", body).await?;
        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| LekseError::VectorStore(format!("Malformed query response: {}", e)))?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| VectorMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn probe(&self, namespace: &str) -> Result<NamespaceProbe> {
        let response = self
            .post("/describe_index_stats", serde_json::json!({}))
            .await?;

        let parsed: StatsResponse = response
            .json()
            .await
            .map_err(|e| LekseError::VectorStore(format!("Malformed stats response: {}", e)))?;

        match parsed.namespaces.get(namespace) {
            Some(stats) if stats.vector_count > 0 => Ok(NamespaceProbe::Exists {
                vector_count: stats.vector_count,
            }),
            _ => Ok(NamespaceProbe::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_trailing_slash_trimmed() {
        let store = PineconeStore::new("https://idx.svc.pinecone.io/", "key");
        assert_eq!(store.index_host, "https://idx.svc.pinecone.io");
    }

    #[test]
    fn test_stats_response_parsing() {
        let parsed: StatsResponse = serde_json::from_str(
            r#"{ "namespaces": { "dpw9EHDh2bM": { "vectorCount": 42 } }, "dimension": 768 }"#,
        )
        .unwrap();
        assert_eq!(parsed.namespaces["dpw9EHDh2bM"].vector_count, 42);
    }

    #[test]
    fn test_query_match_parsing() {
        let parsed: QueryResponse = serde_json::from_str(
            r#"{
                "matches": [{
                    "id": "abc_chunk_0",
                    "score": 0.91,
                    "metadata": {
                        "text": "useState lets you add state",
                        "video_id": "abc",
                        "start_time": 135.0,
                        "end_time": 140.0,
                        "type": "text_chunk"
                    }
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.matches.len(), 1);
        assert_eq!(parsed.matches[0].metadata.kind, RecordKind::TextChunk);
    }
}
