//! Pipeline orchestrator for Lekse.
//!
//! Coordinates transcript fetching, indexing into the vector store, context
//! retrieval, and streaming answer generation.

use crate::chunking::chunk_transcript;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, EmbeddingIntent, GeminiEmbedder};
use crate::error::{LekseError, Result};
use crate::llm::{create_client, CompletionClient, CompletionStream, Provider};
use crate::notes::{resolve_note_references, NoteStore, SupabaseNoteStore};
use crate::rag::{build_prompt, format_retrieved, AnswerRequest, PromptParams};
use crate::transcript::{
    require_video_id, TranscriptService, TtlCache, YoutubeTranscriptSource,
};
use crate::vector_store::{
    MemoryStore, NamespaceProbe, PineconeStore, RecordKind, RecordMetadata, VectorMatch,
    VectorRecord, VectorStore,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Builds a completion client for a (provider, api key, model) triple.
pub type ClientFactory = Box<dyn Fn(Provider, &str, &str) -> Box<dyn CompletionClient> + Send + Sync>;

/// The main orchestrator for the Lekse pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    transcripts: TranscriptService,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    note_store: Option<Arc<dyn NoteStore>>,
    client_factory: ClientFactory,
}

/// Result of an indexing request.
#[derive(Debug, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The namespace was created and populated.
    Indexed {
        chunks_indexed: usize,
        segments_indexed: usize,
    },
    /// The namespace already holds vectors; nothing was written.
    AlreadyIndexed { vector_count: usize },
}

impl Orchestrator {
    /// Create a new orchestrator with default components.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedding_key = settings.embedding.resolve_api_key().ok_or_else(|| {
            LekseError::Config(
                "No embedding API key configured (set [embedding].api_key or GOOGLE_GEMINI_API)"
                    .to_string(),
            )
        })?;

        let embedder: Arc<dyn Embedder> = Arc::new(GeminiEmbedder::with_config(
            embedding_key,
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let vector_store: Arc<dyn VectorStore> = match settings.vector_store.provider.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "pinecone" => {
                let api_key = settings.vector_store.resolve_api_key().ok_or_else(|| {
                    LekseError::Config(
                        "No Pinecone API key configured (set [vector_store].api_key or PINECONE_API_KEY)"
                            .to_string(),
                    )
                })?;
                if settings.vector_store.index_host.is_empty() {
                    return Err(LekseError::Config(
                        "No Pinecone index host configured ([vector_store].index_host)".to_string(),
                    ));
                }
                Arc::new(PineconeStore::new(&settings.vector_store.index_host, api_key))
            }
            other => {
                return Err(LekseError::Config(format!(
                    "Unknown vector store provider: {}",
                    other
                )))
            }
        };

        let transcripts = TranscriptService::new(
            Arc::new(YoutubeTranscriptSource::new(
                settings.transcript.languages.clone(),
            )),
            Arc::new(TtlCache::new(settings.cache_ttl())),
        );

        let note_store: Option<Arc<dyn NoteStore>> = match (
            settings.notes.supabase_url.as_deref(),
            settings.notes.resolve_key(),
        ) {
            (Some(url), Some(key)) => Some(Arc::new(SupabaseNoteStore::new(url, key))),
            _ => None,
        };

        Ok(Self {
            settings,
            prompts,
            transcripts,
            embedder,
            vector_store,
            note_store,
            client_factory: Box::new(create_client),
        })
    }

    /// Create an orchestrator with custom components (used in tests).
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        transcripts: TranscriptService,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            prompts,
            transcripts,
            embedder,
            vector_store,
            note_store: None,
            client_factory: Box::new(create_client),
        }
    }

    /// Attach a note store for `@noteN` mention expansion.
    pub fn with_note_store(mut self, note_store: Arc<dyn NoteStore>) -> Self {
        self.note_store = Some(note_store);
        self
    }

    /// Replace the completion client factory (used in tests).
    pub fn with_client_factory(mut self, client_factory: ClientFactory) -> Self {
        self.client_factory = client_factory;
        self
    }

    /// Get the transcript service.
    pub fn transcripts(&self) -> &TranscriptService {
        &self.transcripts
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Index a video's transcript into its vector-store namespace.
    ///
    /// The existence probe short-circuits when the namespace already holds
    /// vectors. A probe transport failure propagates instead of being
    /// treated as "not yet indexed", so an outage cannot trigger a silent
    /// re-index. Two near-simultaneous first-time calls may both index;
    /// record ids are deterministic, so the duplicate work is harmless.
    #[instrument(skip(self))]
    pub async fn ensure_indexed(&self, video_id: &str) -> Result<IndexOutcome> {
        let video_id = require_video_id(video_id)?;

        match self.vector_store.probe(&video_id).await? {
            NamespaceProbe::Exists { vector_count } => {
                info!("Video {} already indexed ({} vectors)", video_id, vector_count);
                return Ok(IndexOutcome::AlreadyIndexed { vector_count });
            }
            NamespaceProbe::NotFound => {}
        }

        let segments = self.transcripts.get_transcript(&video_id).await?;
        let chunks = chunk_transcript(
            &segments,
            self.settings.chunking.size,
            self.settings.chunking.overlap,
        )?;

        info!(
            "Indexing {}: {} chunks, {} segments",
            video_id,
            chunks.len(),
            segments.len()
        );

        // Embed everything concurrently; fan-out grows with transcript
        // length. Failed embeddings are logged and skipped (best-effort).
        let chunk_embeddings = join_all(
            chunks
                .iter()
                .map(|c| self.embedder.embed(&c.text, EmbeddingIntent::Document)),
        )
        .await;

        let segment_embeddings = join_all(
            segments
                .iter()
                .map(|s| self.embedder.embed(&s.text, EmbeddingIntent::Document)),
        )
        .await;

        let mut records = Vec::new();

        for (chunk, embedding) in chunks.iter().zip(chunk_embeddings) {
            match embedding {
                Ok(values) => records.push(VectorRecord {
                    id: VectorRecord::chunk_id(&video_id, chunk.order),
                    values,
                    metadata: RecordMetadata {
                        text: chunk.text.clone(),
                        video_id: video_id.clone(),
                        start_time: chunk.start_seconds,
                        end_time: chunk.end_seconds,
                        kind: RecordKind::TextChunk,
                    },
                }),
                Err(e) => warn!("Skipping chunk {} of {}: {}", chunk.order, video_id, e),
            }
        }
        let chunks_indexed = records.len();

        for (i, (segment, embedding)) in segments.iter().zip(segment_embeddings).enumerate() {
            match embedding {
                Ok(values) => records.push(VectorRecord {
                    id: VectorRecord::segment_id(&video_id, i),
                    values,
                    metadata: RecordMetadata {
                        text: segment.text.clone(),
                        video_id: video_id.clone(),
                        start_time: segment.start,
                        end_time: segment.end(),
                        kind: RecordKind::TranscriptSegment,
                    },
                }),
                Err(e) => warn!("Skipping segment {} of {}: {}", i, video_id, e),
            }
        }
        let segments_indexed = records.len() - chunks_indexed;

        if records.is_empty() {
            return Err(LekseError::Embedding(format!(
                "All embeddings failed for {}",
                video_id
            )));
        }

        self.vector_store.upsert(&video_id, &records).await?;

        Ok(IndexOutcome::Indexed {
            chunks_indexed,
            segments_indexed,
        })
    }

    /// Retrieve the transcript chunks most relevant to a question.
    #[instrument(skip(self, question))]
    pub async fn retrieve_context(
        &self,
        video_id: &str,
        question: &str,
    ) -> Result<Vec<VectorMatch>> {
        let query_vector = self.embedder.embed(question, EmbeddingIntent::Query).await?;

        self.vector_store
            .query(
                video_id,
                &query_vector,
                self.settings.vector_store.top_k,
                Some(RecordKind::TextChunk),
            )
            .await
    }

    /// Answer a question about a video as an incremental text stream.
    ///
    /// Fetches the (cached) transcript, augments the caller context with
    /// retrieved passages when the video is indexed, builds the citation
    /// prompt, and dispatches to the requested provider with the
    /// caller-supplied API key.
    #[instrument(skip(self, request, api_key), fields(video_id = %request.video_id))]
    pub async fn answer_stream(
        &self,
        request: &AnswerRequest,
        api_key: &str,
    ) -> Result<CompletionStream> {
        if request.text.trim().is_empty() {
            return Err(LekseError::Validation("text must not be empty".to_string()));
        }
        if api_key.trim().is_empty() {
            return Err(LekseError::Auth("Missing API key".to_string()));
        }
        let video_id = require_video_id(&request.video_id)?;

        let segments = self.transcripts.get_transcript(&video_id).await?;
        let question = self.resolve_question(request, &video_id).await;

        // Retrieval is best-effort: an unindexed video or a store outage
        // must not block answering from the raw transcript.
        let mut context = request.context.clone().unwrap_or_default();
        match self.retrieve_context(&video_id, &question).await {
            Ok(matches) if !matches.is_empty() => {
                if !context.is_empty() {
                    context.push_str("\n\n");
                }
                context.push_str("Relevant passages:\n");
                context.push_str(&format_retrieved(&matches));
            }
            Ok(_) => {}
            Err(e) => warn!("Context retrieval failed for {}: {}", video_id, e),
        }

        let prompt = build_prompt(
            &self.prompts,
            &segments,
            &PromptParams {
                video_id: &video_id,
                question: Some(&question),
                user_context: (!context.is_empty()).then_some(context.as_str()),
                reference_timestamp: request.reference_timestamp,
                reference_description: request.reference_description.as_deref(),
                language: request.language.as_deref(),
            },
        );

        let provider = request.provider.unwrap_or(self.default_provider());
        let model = self.model_for(provider);
        let client = (self.client_factory)(provider, api_key, model);

        client.stream_completion(&prompt).await
    }

    /// Expand `@noteN` mentions in the question, best-effort.
    ///
    /// Requires a configured note store and a caller identity; lookup
    /// failures leave the mentions as written rather than failing the
    /// answer.
    async fn resolve_question(&self, request: &AnswerRequest, video_id: &str) -> String {
        if !request.text.contains("@note") {
            return request.text.clone();
        }
        let (Some(store), Some(user_id)) = (&self.note_store, request.user_id.as_deref()) else {
            return request.text.clone();
        };

        match store.notes_for(user_id, video_id).await {
            Ok(notes) if !notes.is_empty() => resolve_note_references(&request.text, &notes),
            Ok(_) => request.text.clone(),
            Err(e) => {
                warn!("Note lookup failed for {}: {}", video_id, e);
                request.text.clone()
            }
        }
    }

    fn default_provider(&self) -> Provider {
        self.settings
            .providers
            .default
            .parse()
            .unwrap_or(Provider::Gemini)
    }

    /// Configured model name for a provider.
    pub fn model_for(&self, provider: Provider) -> &str {
        match provider {
            Provider::Gemini => &self.settings.providers.gemini_model,
            Provider::OpenAi => &self.settings.providers.openai_model,
            Provider::Groq => &self.settings.providers.groq_model,
        }
    }
}
