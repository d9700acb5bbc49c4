//! Configuration management for Lekse.

mod prompts;
mod settings;

pub use prompts::{ChatPrompts, Prompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, NotesSettings, PromptSettings,
    ProviderSettings, ServerSettings, Settings, TranscriptSettings, VectorStoreSettings,
};
