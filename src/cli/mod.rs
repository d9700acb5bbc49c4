//! CLI module for Lekse.

pub mod commands;
mod output;

pub use output::{format_timestamp, Output};

use clap::{Parser, Subcommand};

/// Lekse - YouTube Study Assistant
///
/// A server and CLI for studying YouTube videos: fetch transcripts, index
/// them for retrieval, and stream LLM answers with clickable timestamps.
/// The name "Lekse" comes from the Norwegian word for "lesson."
#[derive(Parser, Debug)]
#[command(name = "lekse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch and print a video's transcript
    Transcript {
        /// YouTube URL or video ID
        video: String,
    },

    /// Index a video's transcript into the vector store
    Index {
        /// YouTube URL or video ID
        video: String,
    },

    /// Ask a question about a video and stream the answer
    Ask {
        /// YouTube URL or video ID
        video: String,

        /// The question to ask
        question: String,

        /// LLM provider (gemini, openai, groq)
        #[arg(long, default_value = "gemini")]
        provider: String,

        /// Provider API key (falls back to LEKSE_API_KEY)
        #[arg(long, env = "LEKSE_API_KEY")]
        api_key: String,

        /// Extra context for the question
        #[arg(long)]
        context: Option<String>,
    },
}
