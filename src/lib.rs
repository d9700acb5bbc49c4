//! Lekse - YouTube Study Assistant
//!
//! A server and CLI for studying YouTube videos with an AI assistant.
//!
//! The name "Lekse" comes from the Norwegian word for "lesson" or "homework."
//!
//! # Overview
//!
//! Lekse allows you to:
//! - Fetch YouTube transcripts with a short-lived in-process cache
//! - Index transcripts into a per-video vector namespace for retrieval
//! - Ask questions and stream AI answers that cite exact video moments
//! - Parse those citations back out as seekable timestamp links
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt management
//! - `transcript` - Transcript fetching and caching
//! - `chunking` - Word-window chunking with timestamp ranges
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `llm` - Multi-provider streaming completion clients
//! - `rag` - Prompt assembly over transcript and retrieved context
//! - `citation` - Timestamp citation link parsing
//! - `notes` - User note storage and `@noteN` reference expansion
//! - `orchestrator` - Pipeline coordination
//! - `server` - HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use lekse::config::Settings;
//! use lekse::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let outcome = orchestrator.ensure_indexed("dQw4w9WgXcQ").await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod citation;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod notes;
pub mod orchestrator;
pub mod rag;
pub mod server;
pub mod transcript;
pub mod vector_store;

pub use error::{LekseError, Result};
