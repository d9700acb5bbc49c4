//! Configuration settings for Lekse.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub transcript: TranscriptSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub providers: ProviderSettings,
    pub notes: NotesSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.lekse".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8750,
        }
    }
}

/// Transcript fetching and caching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// How long a fetched transcript stays cached, in seconds.
    pub cache_ttl_seconds: u64,
    /// Preferred caption languages, in priority order.
    pub languages: Vec<String>,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 600, // 10 minutes
            languages: vec!["en".to_string()],
        }
    }
}

/// Word-window chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Words per chunk.
    pub size: usize,
    /// Words shared between consecutive chunks. Must be less than `size`.
    pub overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            size: 50,
            overlap: 10,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Server-held Gemini API key. Falls back to GOOGLE_GEMINI_API env var.
    pub api_key: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "embedding-001".to_string(),
            dimensions: 768,
            api_key: None,
        }
    }
}

impl EmbeddingSettings {
    /// Resolve the embedding API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GOOGLE_GEMINI_API").ok())
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (pinecone, memory).
    pub provider: String,
    /// Pinecone index host, e.g. "https://my-index-abc123.svc.us-east-1.pinecone.io".
    pub index_host: String,
    /// Pinecone API key. Falls back to PINECONE_API_KEY env var.
    pub api_key: Option<String>,
    /// Number of matches to retrieve per query.
    pub top_k: usize,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "pinecone".to_string(),
            index_host: String::new(),
            api_key: None,
            top_k: 5,
        }
    }
}

impl VectorStoreSettings {
    /// Resolve the vector store API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("PINECONE_API_KEY").ok())
    }
}

/// Default model names per completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Default provider when the request omits one.
    pub default: String,
    /// Gemini model for streaming answers.
    pub gemini_model: String,
    /// OpenAI model for streaming answers.
    pub openai_model: String,
    /// Groq model for streaming answers.
    pub groq_model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            default: "gemini".to_string(),
            gemini_model: "gemini-2.0-flash-001".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            groq_model: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

/// Notes store settings (Supabase REST).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct NotesSettings {
    /// Supabase project URL, e.g. "https://abc.supabase.co".
    pub supabase_url: Option<String>,
    /// Supabase anon/service key. Falls back to SUPABASE_KEY env var.
    pub supabase_key: Option<String>,
}

impl NotesSettings {
    /// Resolve the Supabase key from config or environment.
    pub fn resolve_key(&self) -> Option<String> {
        self.supabase_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("SUPABASE_KEY").ok())
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LekseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lekse")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Transcript cache TTL as a Duration.
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.transcript.cache_ttl_seconds)
    }
}
